pub mod attachment;
pub mod form;
pub mod job;
pub mod loaders;
pub mod progress;

pub use attachment::{all_url_has_value, AttachmentDescriptor};
pub use form::{PartitionMode, RemoteOption, SubmitForm, ThinkWorkflowRequest};
pub use job::SubmitJob;
pub use loaders::{load_all_toml_files, load_toml_to_submit_job};
pub use progress::{StatusSink, UploadProgressEvent};
