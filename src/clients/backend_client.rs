/// 后端 API 客户端
///
/// 封装所有与 FoldSpace 后端相关的调用逻辑：
/// 附件上传、频道/提示词元数据、think 工作流触发
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, UploadError, WorkflowError};
use crate::models::{RemoteOption, ThinkWorkflowRequest};

/// 附件上传接口
const UPLOAD_ENDPOINT: &str = "/bff/v1/apps/obsidian/attachments/upload";
/// 频道列表接口
const CHANNELS_ENDPOINT: &str = "/bff/v1/apps/block-cutter/channels/";
/// 提示词列表接口
const PROMPTS_ENDPOINT: &str =
    "/bff/v1/apps/block-cutter/get-studio-obsidian-to-think-generate-prompt-list/";
/// 工作流触发接口
const WORKFLOW_ENDPOINT: &str = "/bff/v1/apps/dify/tasks/do-obsidian-to-think-workflow";

/// 上传接口返回的单个条目
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedEntry {
    pub url: String,
}

/// 工作流响应外层结构
#[derive(Debug, Deserialize)]
struct ThinkWorkflowResponse {
    outputs: ThinkWorkflowOutputs,
}

/// 工作流响应的 outputs 字段，text 内嵌一层 JSON 字符串
#[derive(Debug, Deserialize)]
struct ThinkWorkflowOutputs {
    text: String,
}

/// text 字段内嵌 JSON 解析后的结果
#[derive(Debug, Deserialize)]
struct ThinkWorkflowResult {
    doc_url: String,
}

/// 后端 API 客户端
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// 从配置创建客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_base_url(&config.base_url, config.request_timeout_secs)
    }

    /// 使用指定基础URL创建客户端
    ///
    /// 超时与后端工作流执行时长保持一致（默认 5 分钟）
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Other(format!("HTTP客户端初始化失败: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 上传单个附件
    ///
    /// # 参数
    /// - `file_name`: 显示文件名
    /// - `bytes`: 文件二进制内容
    ///
    /// # 返回
    /// 返回上传结果的第一个条目（单文件上传预期恰好一个）
    pub async fn upload_attachment(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AppResult<UploadedEntry> {
        let url = format!("{}{}", self.base_url, UPLOAD_ENDPOINT);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("files", part);

        debug!("上传附件: {} => {}", file_name, url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::upload_failed(file_name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::BadStatus {
                file_name: file_name.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let entries: Vec<UploadedEntry> = response
            .json()
            .await
            .map_err(|e| AppError::upload_failed(file_name, e))?;

        entries
            .into_iter()
            .next()
            .ok_or_else(|| {
                UploadError::EmptyResponse {
                    file_name: file_name.to_string(),
                }
                .into()
            })
    }

    /// 获取频道列表
    pub async fn get_channels(&self) -> AppResult<Vec<RemoteOption>> {
        self.get_options(CHANNELS_ENDPOINT).await
    }

    /// 获取提示词列表
    pub async fn get_prompts(&self) -> AppResult<Vec<RemoteOption>> {
        self.get_options(PROMPTS_ENDPOINT).await
    }

    /// 触发 think 工作流
    ///
    /// 响应的 outputs.text 字段本身是一个 JSON 字符串，内含 doc_url，
    /// 两层都做显式解析，结构缺失时返回 WorkflowError 而不是空URL
    pub async fn run_think_workflow(&self, request: &ThinkWorkflowRequest) -> AppResult<String> {
        let url = format!("{}{}", self.base_url, WORKFLOW_ENDPOINT);

        debug!("触发工作流: {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                AppError::Workflow(WorkflowError::RequestFailed {
                    source: Box::new(e),
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WorkflowError::BadStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let payload: ThinkWorkflowResponse = response
            .json()
            .await
            .map_err(|e| AppError::workflow_malformed(format!("outputs.text 缺失: {}", e)))?;

        let result: ThinkWorkflowResult = serde_json::from_str(&payload.outputs.text)
            .map_err(|e| AppError::workflow_malformed(format!("内嵌 JSON 无法解析: {}", e)))?;

        if result.doc_url.trim().is_empty() {
            return Err(AppError::workflow_malformed("doc_url 为空"));
        }

        Ok(result.doc_url)
    }

    /// 获取 {id, name} 元数据列表的通用实现
    async fn get_options(&self, endpoint: &str) -> AppResult<Vec<RemoteOption>> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        response.json().await.map_err(|e| {
            ApiError::JsonParseFailed {
                source: Box::new(e),
            }
            .into()
        })
    }
}
