use serde::{Deserialize, Serialize};

/// 附件描述符
///
/// 跟踪单个附件的本地路径、显示名称和（上传成功后的）远端URL。
/// 由提取器创建，上传器以函数式方式产出新值，不做原地修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    /// 相对于笔记库根目录的路径
    pub path: String,
    /// 显示文件名（路径最后一段，已做百分号解码）
    pub file_name: String,
    /// 文件内容，仅在上传过程中临时填充
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    /// 上传成功后的远端URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AttachmentDescriptor {
    /// 创建尚未上传的附件描述符
    pub fn new(path: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_name: file_name.into(),
            data: None,
            url: None,
        }
    }

    /// 产出携带远端URL的新描述符（上传成功后调用）
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            file_name: self.file_name.clone(),
            data: None,
            url: Some(url.into()),
        }
    }

    /// 是否已经上传成功（URL 非空且非纯空白）
    pub fn is_uploaded(&self) -> bool {
        self.url
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false)
    }
}

/// 判断列表中的所有附件是否都已携带有效URL
///
/// 空列表返回 false；任意一项缺失URL、URL为空或仅为空白都返回 false。
/// 用于"已全部上传则跳过"的幂等判断。
pub fn all_url_has_value(attachments: &[AttachmentDescriptor]) -> bool {
    if attachments.is_empty() {
        return false;
    }

    attachments.iter().all(|item| item.is_uploaded())
}
