//! 提交任务上下文
//!
//! 封装"我正在提交哪篇笔记"这一信息

use std::fmt::Display;

/// 提交任务上下文
///
/// 包含处理单个提交任务所需的所有上下文信息
#[derive(Debug, Clone)]
pub struct SubmitCtx {
    /// 笔记在库内的相对路径
    pub note_path: String,

    /// 任务索引（仅用于日志显示）
    pub job_index: usize,

    /// 文档标题
    pub doc_title: String,

    /// 笔记所在目录（库内相对路径）
    pub doc_root: String,
}

impl SubmitCtx {
    /// 创建新的提交上下文
    pub fn new(note_path: String, job_index: usize, doc_title: String, doc_root: String) -> Self {
        Self {
            note_path,
            job_index,
            doc_title,
            doc_root,
        }
    }
}

impl Display for SubmitCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[笔记 {} 标题#{}]", self.note_path, self.doc_title)
    }
}
