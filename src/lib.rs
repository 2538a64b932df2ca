//! # Note To Think Submit
//!
//! 一个把 Markdown 笔记（含附件）提交到 Think 文档生成后端的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 唯一持有 HTTP 连接的模块，只暴露后端能力
//! - `BackendClient` - 附件上传 / 频道列表 / 提示词列表 / think 工作流
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单篇笔记的某个环节
//! - `extractor` - 从 Markdown 文本中提取附件引用
//! - `VaultReader` - 按库内相对路径读取笔记和附件
//! - `AttachmentUploader` - 整批附件的并发上传（软失败）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一篇笔记"的完整提交流程
//! - `SubmitCtx` - 上下文封装（note_path + job_index）
//! - `SubmitFlow` - 流程编排（读取 → 校验 → 上传 → 工作流）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量任务处理器，加载任务并汇总统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::BackendClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AttachmentDescriptor, PartitionMode, SubmitForm, SubmitJob};
pub use orchestrator::App;
pub use services::{AttachmentUploader, VaultReader};
pub use workflow::{SubmitCtx, SubmitFlow, SubmitOutcome};
