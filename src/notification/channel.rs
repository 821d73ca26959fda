//! 通知渠道 trait 定义

use async_trait::async_trait;

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（未配置或消息为空）
    Skipped(String),
    /// 发送失败（已吞掉，仅用于日志）
    Failed(String),
}

/// 通知渠道 trait
///
/// `push` 不返回错误：任何失败都体现在 `SendResult::Failed` 中。
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 推送一条通知
    async fn push(&self, title: &str, message: &str) -> SendResult;
}
