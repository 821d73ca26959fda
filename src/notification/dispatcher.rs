//! 通知分发器 - 去重、摘要、截断并推送
//!
//! 处理顺序：
//! 1. 空消息直接丢弃
//! 2. 以渲染后的消息做去重（不是摘要后的内容）
//! 3. 有摘要源且摘要可用时，用摘要替换正文（保留事件标记）
//! 4. 截断到 `max_chars` 后推送

use super::channel::{NotificationChannel, SendResult};
use super::deduplicator::NotificationDeduplicator;
use super::event::NotificationEvent;
use super::summarizer::TextSummarizer;
use crate::config::NotifyConfig;
use crate::text::{escape_markdown, truncate};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// 通知分发器
pub struct NotificationDispatcher {
    config: NotifyConfig,
    channel: Arc<dyn NotificationChannel>,
    summarizer: Option<Arc<dyn TextSummarizer>>,
    /// 进程内共享的去重缓存；锁只在两个 await 点之间短暂持有
    dedup: Mutex<NotificationDeduplicator>,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl NotificationDispatcher {
    /// 创建新的分发器
    pub fn new(config: NotifyConfig, channel: Arc<dyn NotificationChannel>) -> Self {
        let dedup = NotificationDeduplicator::new(config.dedup_window_secs);
        Self {
            config,
            channel,
            summarizer: None,
            dedup: Mutex::new(dedup),
            dry_run: false,
        }
    }

    /// 设置摘要器
    pub fn with_summarizer(mut self, summarizer: Arc<dyn TextSummarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    /// 发送一个通知事件
    pub async fn send(&self, event: NotificationEvent) -> SendResult {
        if event.message.is_empty() {
            return SendResult::Skipped("empty message".to_string());
        }

        if !self.should_send(&event) {
            return SendResult::Skipped("duplicate".to_string());
        }

        let mut final_message = event.message.clone();
        if let (Some(source), Some(summarizer)) = (&event.summarize_source, &self.summarizer) {
            let summary = summarizer.summarize(source).await;
            if !summary.is_empty() {
                debug!(session_id = %event.session_id, "Using summarized message body");
                final_message = format!("{} {}", event.event_type.marker(), escape_markdown(&summary));
            }
        }
        let final_message = truncate(&final_message, self.config.max_chars);

        if self.dry_run {
            info!(
                session_id = %event.session_id,
                event_type = %event.event_type,
                title = %self.config.title,
                message = %final_message,
                "[DRY-RUN] Would push notification"
            );
            return SendResult::Skipped("dry-run".to_string());
        }

        let result = self.channel.push(&self.config.title, &final_message).await;
        info!(
            channel = self.channel.name(),
            session_id = %event.session_id,
            event_type = %event.event_type,
            result = ?result,
            "Notification dispatched"
        );
        result
    }

    fn should_send(&self, event: &NotificationEvent) -> bool {
        // 锁中毒说明此前有处理器 panic；缓存内容仍然可用
        let mut dedup = match self.dedup.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        dedup.should_send(&event.session_id, event.event_type.as_str(), &event.message)
    }
}
