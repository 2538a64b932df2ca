use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 附件读取错误（单个附件级别）
    Read(ReadError),
    /// 附件上传错误（单个附件级别）
    Upload(UploadError),
    /// 工作流调用错误
    Workflow(WorkflowError),
    /// 后端 API 调用错误
    Api(ApiError),
    /// 文件操作错误
    File(FileError),
    /// 业务逻辑错误（表单校验等）
    Business(BusinessError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Read(e) => write!(f, "读取错误: {}", e),
            AppError::Upload(e) => write!(f, "上传错误: {}", e),
            AppError::Workflow(e) => write!(f, "工作流错误: {}", e),
            AppError::Api(e) => write!(f, "API错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Business(e) => write!(f, "业务错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Read(e) => Some(e),
            AppError::Upload(e) => Some(e),
            AppError::Workflow(e) => Some(e),
            AppError::Api(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Business(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 附件读取错误
///
/// 单个附件级别的软失败，在上传批次内被捕获，不会中断兄弟任务
#[derive(Debug)]
pub enum ReadError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 路径不是普通文件
    NotAFile {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::NotFound { path } => write!(f, "附件不存在: {}", path),
            ReadError::NotAFile { path } => write!(f, "路径不是普通文件: {}", path),
            ReadError::ReadFailed { path, source } => {
                write!(f, "读取附件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::ReadFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 附件上传错误
#[derive(Debug)]
pub enum UploadError {
    /// 网络请求失败
    RequestFailed {
        file_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 上传接口返回错误状态码
    BadStatus {
        file_name: String,
        status: u16,
    },
    /// 上传接口返回空结果
    EmptyResponse {
        file_name: String,
    },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::RequestFailed { file_name, source } => {
                write!(f, "上传请求失败 ({}): {}", file_name, source)
            }
            UploadError::BadStatus { file_name, status } => {
                write!(f, "上传接口返回错误状态 ({}): HTTP {}", file_name, status)
            }
            UploadError::EmptyResponse { file_name } => {
                write!(f, "上传接口返回空结果: {}", file_name)
            }
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 工作流调用错误
#[derive(Debug)]
pub enum WorkflowError {
    /// 网络请求失败
    RequestFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 工作流接口返回错误状态码
    BadStatus {
        status: u16,
    },
    /// 响应结构不符合预期（outputs.text 双层 JSON 结构缺失或无法解析）
    MalformedResponse {
        detail: String,
    },
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::RequestFailed { source } => {
                write!(f, "工作流请求失败: {}", source)
            }
            WorkflowError::BadStatus { status } => {
                write!(f, "工作流接口返回错误状态: HTTP {}", status)
            }
            WorkflowError::MalformedResponse { detail } => {
                write!(f, "工作流响应结构不符合预期: {}", detail)
            }
        }
    }
}

impl std::error::Error for WorkflowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkflowError::RequestFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 后端 API 调用错误（频道、提示词等元数据接口）
#[derive(Debug)]
pub enum ApiError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误状态码
    BadStatus {
        endpoint: String,
        status: u16,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "API请求失败 ({}): {}", endpoint, source)
            }
            ApiError::BadStatus { endpoint, status } => {
                write!(f, "API返回错误状态 ({}): HTTP {}", endpoint, status)
            }
            ApiError::JsonParseFailed { source } => {
                write!(f, "JSON解析失败: {}", source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } | ApiError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 文件操作错误（任务文件、笔记文件加载）
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 业务逻辑错误（表单校验）
#[derive(Debug)]
pub enum BusinessError {
    /// 标题太短
    TitleTooShort {
        len: usize,
    },
    /// 内容太短
    ContentTooShort {
        len: usize,
    },
    /// 频道ID为空
    EmptyChannelId,
    /// 提示词ID为空
    EmptyPromptId,
    /// 频道ID无法解析为数字
    InvalidChannelId {
        value: String,
    },
    /// 提示词ID无法解析为数字
    InvalidPromptId {
        value: String,
    },
    /// 频道不在远端频道列表中
    UnknownChannel {
        id: String,
    },
    /// 提示词不在远端提示词列表中
    UnknownPrompt {
        id: String,
    },
    /// 字数分块大小无效
    InvalidChunkSize {
        size: u32,
    },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::TitleTooShort { len } => {
                write!(f, "标题必须至少 3 个字符 (当前: {})", len)
            }
            BusinessError::ContentTooShort { len } => {
                write!(f, "内容必须至少 3 个字符 (当前: {})", len)
            }
            BusinessError::EmptyChannelId => write!(f, "频道必须存在"),
            BusinessError::EmptyPromptId => write!(f, "提示词必须存在"),
            BusinessError::InvalidChannelId { value } => {
                write!(f, "频道ID无法解析为数字: {}", value)
            }
            BusinessError::InvalidPromptId { value } => {
                write!(f, "提示词ID无法解析为数字: {}", value)
            }
            BusinessError::UnknownChannel { id } => {
                write!(f, "频道 {} 不在远端频道列表中", id)
            }
            BusinessError::UnknownPrompt { id } => {
                write!(f, "提示词 {} 不在远端提示词列表中", id)
            }
            BusinessError::InvalidChunkSize { size } => {
                write!(f, "字数分块大小必须大于 0 (当前: {})", size)
            }
        }
    }
}

impl std::error::Error for BusinessError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<ReadError> for AppError {
    fn from(err: ReadError) -> Self {
        AppError::Read(err)
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        AppError::Upload(err)
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        AppError::Workflow(err)
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Api(err)
    }
}

impl From<FileError> for AppError {
    fn from(err: FileError) -> Self {
        AppError::File(err)
    }
}

impl From<BusinessError> for AppError {
    fn from(err: BusinessError) -> Self {
        AppError::Business(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建附件读取失败错误
    pub fn read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Read(ReadError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建上传请求失败错误
    pub fn upload_failed(
        file_name: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Upload(UploadError::RequestFailed {
            file_name: file_name.into(),
            source: Box::new(source),
        })
    }

    /// 创建工作流响应结构错误
    pub fn workflow_malformed(detail: impl Into<String>) -> Self {
        AppError::Workflow(WorkflowError::MalformedResponse {
            detail: detail.into(),
        })
    }

    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
