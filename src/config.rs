/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端服务基础URL
    pub base_url: String,
    /// 笔记库（vault）根目录
    pub vault_root: String,
    /// 提交任务 TOML 文件存放目录
    pub jobs_folder: String,
    /// 同时上传的附件数量上限
    pub max_concurrent_uploads: usize,
    /// 单次请求超时（秒），与后端工作流的 5 分钟超时保持一致
    pub request_timeout_secs: u64,
    /// 是否将读取路径规范化为 Windows 分隔符
    pub normalize_for_windows: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // 内网环境使用 http://openapi.inner.foldspace.cn
            base_url: "http://127.0.0.1:8000".to_string(),
            vault_root: "vault".to_string(),
            jobs_folder: "submit_jobs".to_string(),
            max_concurrent_uploads: 4,
            request_timeout_secs: 300,
            normalize_for_windows: false,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            vault_root: std::env::var("VAULT_ROOT").unwrap_or(default.vault_root),
            jobs_folder: std::env::var("JOBS_FOLDER").unwrap_or(default.jobs_folder),
            max_concurrent_uploads: std::env::var("MAX_CONCURRENT_UPLOADS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_uploads),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            normalize_for_windows: std::env::var("NORMALIZE_FOR_WINDOWS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.normalize_for_windows),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
