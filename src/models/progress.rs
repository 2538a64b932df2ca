//! 上传进度事件与状态通道
//!
//! 上传过程中的每个步骤转换都会向状态通道发送一条人类可读的消息。
//! 通道由调用方创建并持有接收端，发送端可在多个并发任务间克隆，
//! 消息只消费一次、不做保留。

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// 上传进度事件
///
/// 瞬态状态字符串，被调用方的回调消费后即丢弃
#[derive(Debug, Clone)]
pub struct UploadProgressEvent {
    pub message: String,
}

/// 状态消息发送端
///
/// 职责：
/// - 在多个并发上传任务间安全共享（克隆即可）
/// - 接收端关闭后 emit 静默丢弃，不影响上传流程
#[derive(Clone)]
pub struct StatusSink {
    tx: UnboundedSender<UploadProgressEvent>,
}

impl StatusSink {
    /// 创建状态通道，返回发送端和调用方持有的接收端
    pub fn channel() -> (Self, UnboundedReceiver<UploadProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// 发送一条状态消息
    pub fn emit(&self, message: impl Into<String>) {
        // 接收端可能已关闭，发送失败直接忽略
        let _ = self.tx.send(UploadProgressEvent {
            message: message.into(),
        });
    }
}
