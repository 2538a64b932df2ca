use serde::{Deserialize, Serialize};

use crate::models::form::PartitionMode;

fn default_chunk_size() -> u32 {
    1000
}

fn default_true() -> bool {
    true
}

/// 提交任务
///
/// 一个 TOML 任务文件描述一次"笔记 → think"提交：
/// 指定笔记路径和表单选项，标题缺省时取笔记文件名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJob {
    /// 笔记在库内的相对路径
    pub note_path: String,
    /// 文档标题（缺省时取笔记文件名）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_title: Option<String>,
    /// 频道ID
    #[serde(deserialize_with = "crate::models::form::deserialize_id")]
    pub channel_id: String,
    /// 提示词ID
    #[serde(deserialize_with = "crate::models::form::deserialize_id")]
    pub prompt_id: String,
    /// 分块策略
    #[serde(default)]
    pub partitioned_mode: PartitionMode,
    /// 字数分块大小
    #[serde(default = "default_chunk_size")]
    pub partitioned_chunk_size: u32,
    /// 是否构建向量知识库
    #[serde(default = "default_true")]
    pub if_create_vector_db: bool,
    /// 是否运行文章摘要流程
    #[serde(default)]
    pub if_run_doc_intro_workflow: bool,
    /// 任务文件自身的路径，加载后填充
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl SubmitJob {
    /// 获取展示用的任务名称（任务文件名，缺省时用笔记路径）
    pub fn display_name(&self) -> &str {
        self.file_path.as_deref().unwrap_or(&self.note_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_job() {
        let job: SubmitJob = toml::from_str(
            r#"
            note_path = "notes/demo.md"
            channel_id = "3"
            prompt_id = 12
            "#,
        )
        .unwrap();

        assert_eq!(job.note_path, "notes/demo.md");
        assert_eq!(job.channel_id, "3");
        // 整数形式的 id 也解析为字符串
        assert_eq!(job.prompt_id, "12");
        assert_eq!(job.partitioned_mode, PartitionMode::ByParagraph);
        assert_eq!(job.partitioned_chunk_size, 1000);
        assert!(job.if_create_vector_db);
        assert!(!job.if_run_doc_intro_workflow);
    }

    #[test]
    fn test_parse_full_job() {
        let job: SubmitJob = toml::from_str(
            r#"
            note_path = "notes/demo.md"
            doc_title = "自定义标题"
            channel_id = "3"
            prompt_id = "12"
            partitioned_mode = "按字数"
            partitioned_chunk_size = 500
            if_create_vector_db = false
            if_run_doc_intro_workflow = true
            "#,
        )
        .unwrap();

        assert_eq!(job.doc_title.as_deref(), Some("自定义标题"));
        assert_eq!(job.partitioned_mode, PartitionMode::ByWordCount);
        assert_eq!(job.partitioned_chunk_size, 500);
        assert!(!job.if_create_vector_db);
        assert!(job.if_run_doc_intro_workflow);
    }
}
