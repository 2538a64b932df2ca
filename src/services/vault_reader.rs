//! 笔记库读取服务 - 业务能力层
//!
//! 只负责"按库内相对路径读文件"能力，不关心上传流程

use std::path::PathBuf;

use crate::error::{AppResult, ReadError};

/// 笔记库读取器
///
/// 职责：
/// - 将附件的库内相对路径解析为实际读取路径
/// - 读取单个文件的二进制内容
/// - 不出现 Vec<AttachmentDescriptor>，不关心批次
pub struct VaultReader {
    vault_root: PathBuf,
    normalize_for_windows: bool,
}

impl VaultReader {
    /// 创建笔记库读取器
    pub fn new(vault_root: impl Into<PathBuf>, normalize_for_windows: bool) -> Self {
        Self {
            vault_root: vault_root.into(),
            normalize_for_windows,
        }
    }

    /// 将库内相对路径解析为实际读取路径
    ///
    /// 去掉前导分隔符并做百分号解码；
    /// normalize_for_windows 开启时将分隔符替换为反斜杠
    pub fn resolve(&self, resource_path: &str) -> PathBuf {
        let stripped = remove_leading_slash(resource_path);
        let decoded = match urlencoding::decode(stripped) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => stripped.to_string(),
        };

        let read_path = if self.normalize_for_windows {
            linux_path_to_win_path(&decoded)
        } else {
            decoded
        };

        self.vault_root.join(read_path)
    }

    /// 读取文件的二进制内容
    ///
    /// # 返回
    /// 路径不存在、不是普通文件或读取出错时返回 ReadError
    pub async fn read_binary(&self, resource_path: &str) -> AppResult<Vec<u8>> {
        let full_path = self.resolve(resource_path);
        let display_path = full_path.to_string_lossy().to_string();

        let metadata = match tokio::fs::metadata(&full_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReadError::NotFound { path: display_path }.into());
            }
            Err(e) => {
                return Err(ReadError::ReadFailed {
                    path: display_path,
                    source: Box::new(e),
                }
                .into());
            }
        };

        if !metadata.is_file() {
            return Err(ReadError::NotAFile { path: display_path }.into());
        }

        tokio::fs::read(&full_path).await.map_err(|e| {
            ReadError::ReadFailed {
                path: display_path,
                source: Box::new(e),
            }
            .into()
        })
    }

    /// 读取笔记正文
    pub async fn read_note(&self, note_path: &str) -> AppResult<String> {
        let bytes = self.read_binary(note_path).await?;
        String::from_utf8(bytes).map_err(|e| {
            ReadError::ReadFailed {
                path: note_path.to_string(),
                source: Box::new(e),
            }
            .into()
        })
    }
}

/// 去掉路径的前导分隔符
pub fn remove_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// 将正斜杠路径转换为 Windows 反斜杠路径
pub fn linux_path_to_win_path(linux_path: &str) -> String {
    linux_path.replace('/', "\\")
}

/// 取笔记路径的最后一段（去掉扩展名）作为标题
pub fn note_title(note_path: &str) -> String {
    let base = note_path.rsplit('/').next().unwrap_or(note_path);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

/// 取笔记所在目录（库内相对路径）
pub fn doc_root_of(note_path: &str) -> String {
    match note_path.rsplit_once('/') {
        Some((root, _)) => root.to_string(),
        None => String::new(),
    }
}
