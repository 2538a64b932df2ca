//! 附件上传服务 - 业务能力层
//!
//! 负责整批附件的"读取 → 上传"管线：
//! 所有附件并发执行，Semaphore 限制同时在途的请求数，
//! join_all 按输入顺序合并结果，与完成顺序无关。
//! 单个附件失败只记录状态、不中断批次，批次本身永不失败。

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::clients::BackendClient;
use crate::models::{AttachmentDescriptor, StatusSink};
use crate::services::vault_reader::VaultReader;

/// 附件上传器
pub struct AttachmentUploader<'a> {
    client: &'a BackendClient,
    reader: &'a VaultReader,
    max_concurrent: usize,
}

impl<'a> AttachmentUploader<'a> {
    /// 创建附件上传器
    ///
    /// # 参数
    /// - `max_concurrent`: 同时上传的附件数量上限
    pub fn new(client: &'a BackendClient, reader: &'a VaultReader, max_concurrent: usize) -> Self {
        Self {
            client,
            reader,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// 上传整批附件
    ///
    /// # 返回
    /// 返回与输入等长、同序的新列表：
    /// 成功的条目携带远端URL，软失败的条目保持原样（url 为空）
    pub async fn upload_all(
        &self,
        attachments: Vec<AttachmentDescriptor>,
        sink: &StatusSink,
    ) -> Vec<AttachmentDescriptor> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        let tasks = attachments.into_iter().map(|attachment| {
            let semaphore = semaphore.clone();
            let sink = sink.clone();
            async move {
                let _permit = semaphore.acquire_owned().await.ok();
                self.upload_one(attachment, &sink).await
            }
        });

        join_all(tasks).await
    }

    /// 上传单个附件
    ///
    /// 读取失败或上传失败都是软失败：发送失败状态并原样返回描述符
    async fn upload_one(
        &self,
        attachment: AttachmentDescriptor,
        sink: &StatusSink,
    ) -> AttachmentDescriptor {
        sink.emit(format!("开始上传附件 {} 中...", attachment.file_name));

        let read_path = self.reader.resolve(&attachment.path);
        debug!("读取路径: {}", read_path.display());
        sink.emit(format!("{} 读取中.....", attachment.path));

        let bytes = match self.reader.read_binary(&attachment.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("附件读取失败: {}", e);
                sink.emit(format!("{} 读取失败: {}", attachment.path, e));
                return attachment;
            }
        };

        sink.emit(format!("{} 读取完成 {}字节", attachment.path, bytes.len()));
        sink.emit(format!(
            "开始上传文件: {} size:{}",
            attachment.file_name,
            bytes.len()
        ));

        match self
            .client
            .upload_attachment(&attachment.file_name, bytes)
            .await
        {
            Ok(entry) => {
                sink.emit(format!("上传进度: 100% {}", attachment.file_name));
                sink.emit(format!(
                    "上传附件 {} 完成 {}",
                    attachment.file_name, entry.url
                ));
                attachment.with_url(entry.url)
            }
            Err(e) => {
                warn!("附件上传失败: {}", e);
                sink.emit(format!("上传附件 {} 失败: {}", attachment.file_name, e));
                attachment
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_file(dir: &std::path::Path, name: &str, content: &[u8]) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(content).unwrap();
    }

    #[tokio::test]
    async fn test_upload_all_one_read_failure_is_soft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bff/v1/apps/obsidian/attachments/upload"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"url": "http://files/ok"}])),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.pdf", b"aaa");
        write_file(dir.path(), "c.pdf", b"ccc");

        let client = BackendClient::with_base_url(&server.uri(), 5).unwrap();
        let reader = VaultReader::new(dir.path(), false);
        let uploader = AttachmentUploader::new(&client, &reader, 2);

        let attachments = vec![
            AttachmentDescriptor::new("a.pdf", "a.pdf"),
            AttachmentDescriptor::new("missing.pdf", "missing.pdf"),
            AttachmentDescriptor::new("c.pdf", "c.pdf"),
        ];

        let (sink, mut rx) = StatusSink::channel();
        let result = uploader.upload_all(attachments, &sink).await;
        drop(sink);

        // 与输入等长、同序
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].file_name, "a.pdf");
        assert_eq!(result[1].file_name, "missing.pdf");
        assert_eq!(result[2].file_name, "c.pdf");

        // 恰好一个软失败
        assert!(result[0].is_uploaded());
        assert!(!result[1].is_uploaded());
        assert!(result[2].is_uploaded());

        // 失败状态已经通过通道上报
        let mut messages = Vec::new();
        while let Some(event) = rx.recv().await {
            messages.push(event.message);
        }
        assert!(messages.iter().any(|m| m.contains("读取失败")));
    }

    #[tokio::test]
    async fn test_upload_all_remote_failure_keeps_siblings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bff/v1/apps/obsidian/attachments/upload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.pdf", b"aaa");

        let client = BackendClient::with_base_url(&server.uri(), 5).unwrap();
        let reader = VaultReader::new(dir.path(), false);
        let uploader = AttachmentUploader::new(&client, &reader, 1);

        let (sink, mut rx) = StatusSink::channel();
        let result = uploader
            .upload_all(vec![AttachmentDescriptor::new("a.pdf", "a.pdf")], &sink)
            .await;
        drop(sink);

        assert_eq!(result.len(), 1);
        assert!(!result[0].is_uploaded());

        let mut messages = Vec::new();
        while let Some(event) = rx.recv().await {
            messages.push(event.message);
        }
        assert!(messages.iter().any(|m| m.contains("失败")));
    }
}
