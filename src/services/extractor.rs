//! 附件提取服务 - 业务能力层
//!
//! 负责从 markdown 文本中提取本地附件引用。
//! 纯函数，不产生副作用；格式异常的 markdown 只会得到更少或零个匹配。

use regex::Regex;

use crate::models::AttachmentDescriptor;

/// 图片引用模式：`![...](path)` 或 `<img src="path">`
const IMAGE_PATTERN: &str = r#"!\[.*?\]\((.*?)\)|<img src="(.*?)""#;

/// 通用链接引用模式：`[...](path)`
const LINK_PATTERN: &str = r"\[.*?\]\((.*?)\)";

/// 可上传的文档类型后缀白名单（大写比较）
static DOC_EXTENSIONS: phf::Set<&'static str> = phf::phf_set! {
    "TXT",
    "MD",
    "MARKDOWN",
    "PDF",
    "HTML",
    "XLSX",
    "XLS",
    "DOCX",
    "CSV",
    "EML",
    "MSG",
    "PPTX",
    "PPT",
    "XML",
    "EPUB",
};

/// 从 markdown 文本中提取附件路径
///
/// 两次独立扫描：先图片引用，再通用链接引用，按出现顺序收集，
/// 同一路径被两种模式命中时会重复出现。
/// 仅保留后缀在文档白名单内、且不是网络URL的非空路径。
pub fn extract_attachment_paths(markdown_text: &str) -> Vec<String> {
    let mut attachment_paths = Vec::new();

    // 提取图片路径
    attachment_paths.extend(capture_paths(markdown_text, IMAGE_PATTERN));

    // 提取链接路径
    attachment_paths.extend(capture_paths(markdown_text, LINK_PATTERN));

    attachment_paths
        .into_iter()
        .filter(|path| !path.is_empty())
        .filter(|path| has_document_extension(path))
        .filter(|path| !is_network_url(path))
        .collect()
}

/// 从 markdown 文本构建附件描述符列表
///
/// # 参数
/// - `markdown_text`: 笔记原文
/// - `doc_root`: 笔记所在目录（库内相对路径），用于拼接附件路径
///
/// # 返回
/// 返回附件描述符列表，data 和 url 均为空
pub fn extract_attachments(markdown_text: &str, doc_root: &str) -> Vec<AttachmentDescriptor> {
    extract_attachment_paths(markdown_text)
        .into_iter()
        .map(|path| {
            let file_name = file_name_from_path(&path);
            let resource_path = if doc_root.is_empty() {
                path
            } else {
                format!("{}/{}", doc_root, path)
            };
            AttachmentDescriptor::new(resource_path, file_name)
        })
        .collect()
}

/// 取路径最后一段并做百分号解码，作为显示文件名
pub fn file_name_from_path(path: &str) -> String {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match urlencoding::decode(last_segment) {
        Ok(decoded) => decoded.into_owned(),
        // 解码失败时保留原始段，提取过程不失败
        Err(_) => last_segment.to_string(),
    }
}

// ========== markdown 清理辅助函数 ==========

/// 移除所有图片引用
pub fn remove_images(markdown_text: &str) -> String {
    replace_pattern(markdown_text, r"!\[([^\]]*)\]\(([^)]*)\)")
}

/// 移除所有链接引用
pub fn remove_links(markdown_text: &str) -> String {
    replace_pattern(markdown_text, r"\[([^\]]+)\]\(([^)]+)\)")
}

/// 移除指向常见文件类型的链接
pub fn remove_file_links(markdown_text: &str) -> String {
    replace_pattern(
        markdown_text,
        r"\[([^\]]*)\]\(([^)]*\.(pdf|docx?|xlsx?|pptx?|zip|rar|txt))\)",
    )
}

/// 移除全部附件引用（文件链接 → 图片 → 链接）
pub fn remove_all_attachments(markdown_text: &str) -> String {
    remove_links(&remove_images(&remove_file_links(markdown_text)))
}

// ========== 内部辅助函数 ==========

/// 扫描文本并收集每个匹配中第一个命中的捕获组
fn capture_paths(text: &str, pattern: &str) -> Vec<String> {
    let mut paths = Vec::new();

    if let Ok(re) = Regex::new(pattern) {
        for caps in re.captures_iter(text) {
            let captured = caps
                .iter()
                .skip(1)
                .flatten()
                .next()
                .map(|m| m.as_str().to_string());
            if let Some(path) = captured {
                paths.push(path);
            }
        }
    }

    paths
}

/// 后缀（大小写不敏感）是否在文档类型白名单内
fn has_document_extension(path: &str) -> bool {
    let suffix = path.rsplit('.').next().unwrap_or(path);
    DOC_EXTENSIONS.contains(suffix.to_uppercase().as_str())
}

/// 是否为网络URL（以已知协议前缀开头）
fn is_network_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

fn replace_pattern(text: &str, pattern: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_no_references() {
        assert!(extract_attachment_paths("纯文本，没有任何引用").is_empty());
        assert!(extract_attachment_paths("").is_empty());
    }

    #[test]
    fn test_extract_filters_image_extensions() {
        let text = "![alt](img/a.png)\n[doc](docs/b.pdf)";
        let paths = extract_attachment_paths(text);

        // png 不在文档白名单内被过滤，pdf 保留
        assert_eq!(paths, vec!["docs/b.pdf".to_string()]);
    }

    #[test]
    fn test_extract_rejects_network_urls() {
        let text = "[remote](http://example.com/a.pdf)\n[secure](https://example.com/b.pdf)\n[local](docs/c.pdf)";
        let paths = extract_attachment_paths(text);

        assert_eq!(paths, vec!["docs/c.pdf".to_string()]);
    }

    #[test]
    fn test_extract_img_tag() {
        let text = r#"<img src="docs/scan.pdf">"#;
        let paths = extract_attachment_paths(text);

        assert_eq!(paths, vec!["docs/scan.pdf".to_string()]);
    }

    #[test]
    fn test_extract_duplicates_kept() {
        // 文档类型的图片引用会被图片扫描和链接扫描各命中一次
        let text = "![scan](docs/scan.pdf)";
        let paths = extract_attachment_paths(text);

        assert_eq!(
            paths,
            vec!["docs/scan.pdf".to_string(), "docs/scan.pdf".to_string()]
        );
    }

    #[test]
    fn test_extract_empty_capture_dropped() {
        let text = "[空链接]()";
        assert!(extract_attachment_paths(text).is_empty());
    }

    #[test]
    fn test_file_name_percent_decoded() {
        assert_eq!(
            file_name_from_path("folder/file%20name.txt"),
            "file name.txt"
        );
        assert_eq!(file_name_from_path("a.pdf"), "a.pdf");
    }

    #[test]
    fn test_extract_attachments_builds_descriptors() {
        let text = "[doc](docs/file%20name.txt)";
        let attachments = extract_attachments(text, "notes/2024");

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].path, "notes/2024/docs/file%20name.txt");
        assert_eq!(attachments[0].file_name, "file name.txt");
        assert!(attachments[0].url.is_none());
        assert!(attachments[0].data.is_none());
    }

    #[test]
    fn test_remove_all_attachments() {
        let text = "开头 ![图](img/a.png) 中间 [文件](docs/b.pdf) 结尾 [链接](http://x.cn)";
        let cleaned = remove_all_attachments(text);

        assert!(!cleaned.contains("img/a.png"));
        assert!(!cleaned.contains("docs/b.pdf"));
        assert!(!cleaned.contains("http://x.cn"));
        assert!(cleaned.contains("开头"));
        assert!(cleaned.contains("结尾"));
    }
}
