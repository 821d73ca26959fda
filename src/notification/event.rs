//! 通知事件结构
//!
//! 每个宿主事件生成一个 `NotificationEvent`，发送后即丢弃。

use serde::{Deserialize, Serialize};

/// session id 不可用时使用的占位值
pub const UNKNOWN_SESSION: &str = "-";

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEventType {
    /// 一轮对话正常结束
    TurnComplete,
    /// 一轮对话以错误结束
    TurnError,
    /// agent 通过 ask 工具等待用户回答
    AskWaiting,
    /// 自动重试耗尽
    RetryFailed,
}

impl NotificationEventType {
    /// 去重键和日志使用的标签
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TurnComplete => "turn_complete",
            Self::TurnError => "turn_error",
            Self::AskWaiting => "ask_waiting",
            Self::RetryFailed => "retry_failed",
        }
    }

    /// 消息开头的 emoji 标记
    pub fn marker(&self) -> &'static str {
        match self {
            Self::TurnComplete => "✅",
            Self::TurnError | Self::RetryFailed => "❌",
            Self::AskWaiting => "❓",
        }
    }
}

impl std::fmt::Display for NotificationEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 待发送的通知事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub session_id: String,
    pub event_type: NotificationEventType,
    /// 渲染后的消息正文（去重基于此字段）
    pub message: String,
    /// 用于生成摘要的原始长文本
    pub summarize_source: Option<String>,
}

impl NotificationEvent {
    /// 创建新的事件；空 session id 会替换为占位值
    pub fn new(
        session_id: impl Into<String>,
        event_type: NotificationEventType,
        message: impl Into<String>,
    ) -> Self {
        let session_id = session_id.into();
        Self {
            session_id: if session_id.is_empty() {
                UNKNOWN_SESSION.to_string()
            } else {
                session_id
            },
            event_type,
            message: message.into(),
            summarize_source: None,
        }
    }

    /// 附加摘要源文本（空字符串视为无）
    pub fn with_summarize_source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.summarize_source = if source.is_empty() { None } else { Some(source) };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_id_uses_placeholder() {
        let event = NotificationEvent::new("", NotificationEventType::TurnError, "❌ Agent turn failed");
        assert_eq!(event.session_id, UNKNOWN_SESSION);
    }

    #[test]
    fn test_empty_summarize_source_is_none() {
        let event = NotificationEvent::new("s1", NotificationEventType::TurnComplete, "✅ x")
            .with_summarize_source("");
        assert!(event.summarize_source.is_none());

        let event = event.with_summarize_source("full text");
        assert_eq!(event.summarize_source.as_deref(), Some("full text"));
    }

    #[test]
    fn test_event_type_labels() {
        assert_eq!(NotificationEventType::RetryFailed.to_string(), "retry_failed");
        assert_eq!(NotificationEventType::AskWaiting.marker(), "❓");
        assert_eq!(
            serde_json::to_string(&NotificationEventType::TurnComplete).unwrap(),
            "\"turn_complete\""
        );
    }
}
