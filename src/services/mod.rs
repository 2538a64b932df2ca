pub mod extractor;
pub mod upload_service;
pub mod vault_reader;

pub use upload_service::AttachmentUploader;
pub use vault_reader::VaultReader;
