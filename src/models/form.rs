use serde::{Deserialize, Serialize};

use crate::error::{AppResult, BusinessError};

/// 分块策略枚举
///
/// 枚举值与后端工作流使用的中文标识一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitionMode {
    /// 按段落
    #[serde(rename = "按段落")]
    ByParagraph,
    /// 按标题段落
    #[serde(rename = "按标题段落")]
    ByHeadingParagraph,
    /// 按字数
    #[serde(rename = "按字数")]
    ByWordCount,
    /// 不分块
    #[serde(rename = "不分块")]
    NoPartition,
}

impl PartitionMode {
    /// 获取后端工作流识别的标识
    pub fn wire_name(self) -> &'static str {
        match self {
            PartitionMode::ByParagraph => "按段落",
            PartitionMode::ByHeadingParagraph => "按标题段落",
            PartitionMode::ByWordCount => "按字数",
            PartitionMode::NoPartition => "不分块",
        }
    }

    /// 尝试从字符串解析分块策略（精确匹配）
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "按段落" => Some(PartitionMode::ByParagraph),
            "按标题段落" => Some(PartitionMode::ByHeadingParagraph),
            "按字数" => Some(PartitionMode::ByWordCount),
            "不分块" => Some(PartitionMode::NoPartition),
            _ => None,
        }
    }
}

impl Default for PartitionMode {
    fn default() -> Self {
        PartitionMode::ByParagraph
    }
}

impl std::fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// 远端元数据选项（频道、提示词）
///
/// 远端接口的 id 字段可能是数字也可能是字符串，统一解析为字符串
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOption {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
}

// Helper function to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// 提交表单
///
/// 显式类型化的请求模型，字段含义与后端工作流的参数一一对应，
/// 与线上载荷的整数编码解耦（见 `to_wire_request`）
#[derive(Debug, Clone)]
pub struct SubmitForm {
    /// 文档标题
    pub doc_title: String,
    /// 文档内容（markdown 原文）
    pub doc_content: String,
    /// 频道ID
    pub channel_id: String,
    /// 提示词ID
    pub prompt_id: String,
    /// 分块策略
    pub partitioned_mode: PartitionMode,
    /// 字数分块大小（仅"按字数"模式使用）
    pub partitioned_chunk_size: u32,
    /// 向量标记ID（内容摘要，幂等标识）
    pub vector_uuid: String,
    /// 是否构建向量知识库
    pub if_create_vector_db: bool,
    /// 是否运行文章摘要流程
    pub if_run_doc_intro_workflow: bool,
    /// 已上传附件的URL列表
    pub documents: Vec<String>,
}

impl SubmitForm {
    /// 校验表单
    ///
    /// 规则与前端 schema 保持一致：标题/内容至少 3 个字符，
    /// 频道和提示词必须存在且为数字，字数分块大小必须大于 0
    pub fn validate(&self) -> AppResult<()> {
        let title_len = self.doc_title.chars().count();
        if title_len < 3 {
            return Err(BusinessError::TitleTooShort { len: title_len }.into());
        }

        let content_len = self.doc_content.chars().count();
        if content_len < 3 {
            return Err(BusinessError::ContentTooShort { len: content_len }.into());
        }

        if self.channel_id.trim().is_empty() {
            return Err(BusinessError::EmptyChannelId.into());
        }
        if self.channel_id.trim().parse::<i64>().is_err() {
            return Err(BusinessError::InvalidChannelId {
                value: self.channel_id.clone(),
            }
            .into());
        }

        if self.prompt_id.trim().is_empty() {
            return Err(BusinessError::EmptyPromptId.into());
        }
        if self.prompt_id.trim().parse::<i64>().is_err() {
            return Err(BusinessError::InvalidPromptId {
                value: self.prompt_id.clone(),
            }
            .into());
        }

        if self.partitioned_mode == PartitionMode::ByWordCount && self.partitioned_chunk_size == 0 {
            return Err(BusinessError::InvalidChunkSize {
                size: self.partitioned_chunk_size,
            }
            .into());
        }

        Ok(())
    }

    /// 转换为线上载荷
    ///
    /// ID 和布尔开关按后端要求编码为整数；
    /// knowledge_is_required 由 if_create_vector_db 派生
    pub fn to_wire_request(&self) -> AppResult<ThinkWorkflowRequest> {
        let channel_id = self.channel_id.trim().parse::<i64>().map_err(|_| {
            crate::error::AppError::Business(BusinessError::InvalidChannelId {
                value: self.channel_id.clone(),
            })
        })?;
        let prompt_id = self.prompt_id.trim().parse::<i64>().map_err(|_| {
            crate::error::AppError::Business(BusinessError::InvalidPromptId {
                value: self.prompt_id.clone(),
            })
        })?;

        let if_create_vector_db = i64::from(self.if_create_vector_db);

        Ok(ThinkWorkflowRequest {
            doc_title: self.doc_title.clone(),
            doc_content: self.doc_content.clone(),
            channel_id,
            prompt_id,
            partitioned_mode: self.partitioned_mode,
            partitioned_chunk_size: self.partitioned_chunk_size,
            vector_uuid: self.vector_uuid.clone(),
            if_create_vector_db,
            if_run_doc_intro_workflow: i64::from(self.if_run_doc_intro_workflow),
            knowledge_is_required: if_create_vector_db,
            documents: self.documents.clone(),
        })
    }
}

/// 工作流触发请求（线上载荷结构）
#[derive(Debug, Clone, Serialize)]
pub struct ThinkWorkflowRequest {
    pub doc_title: String,
    pub doc_content: String,
    pub channel_id: i64,
    pub prompt_id: i64,
    pub partitioned_mode: PartitionMode,
    pub partitioned_chunk_size: u32,
    pub vector_uuid: String,
    pub if_create_vector_db: i64,
    pub if_run_doc_intro_workflow: i64,
    pub knowledge_is_required: i64,
    pub documents: Vec<String>,
}

impl ThinkWorkflowRequest {
    /// 用于日志展示的请求预览（doc_content 体积大，不输出）
    pub fn preview(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.remove("doc_content");
        }
        value
    }
}
