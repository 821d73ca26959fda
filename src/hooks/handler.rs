//! 通知处理器 - 把宿主事件转换为通知
//!
//! 事件分类规则：
//! - `turn_end` + assistant + `stopReason == "error"` => TurnError
//! - `turn_end` + assistant + 其他 => TurnComplete
//! - `tool_call` + `toolName == "ask"` => AskWaiting
//! - `auto_retry_end` + `success == false` => RetryFailed
//!
//! 动态文本都先做 Markdown 转义，固定文案不转义。

use super::types::{AutoRetryEndEvent, ToolCallEvent, TurnEndEvent};
use super::{HostEventHandler, SessionContext};
use crate::config::NotifyConfig;
use crate::notification::event::{NotificationEvent, NotificationEventType, UNKNOWN_SESSION};
use crate::notification::extract::{extract_ask_question, extract_assistant_text};
use crate::notification::NotificationDispatcher;
use crate::text::{escape_markdown, normalize, preview};
use async_trait::async_trait;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

const TURN_FAILED: &str = "❌ Agent turn failed";
const TURN_COMPLETED: &str = "✅ Agent turn completed";
const WAITING_FOR_INPUT: &str = "❓ Waiting for input";
const RETRY_FAILED: &str = "❌ Retry failed";

/// 宿主事件 -> 通知分发器
pub struct NotifyHooks {
    dispatcher: Arc<NotificationDispatcher>,
}

impl NotifyHooks {
    pub fn new(dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// 在独立任务中构建并发送通知，任务 panic 只记录日志
    async fn guarded<F>(&self, hook: &'static str, session_id: String, build: F)
    where
        F: FnOnce(&NotifyConfig, &str) -> Option<NotificationEvent> + Send + 'static,
    {
        let dispatcher = Arc::clone(&self.dispatcher);
        let task = tokio::spawn(async move {
            match build(dispatcher.config(), &session_id) {
                Some(notification) => Some(dispatcher.send(notification).await),
                None => None,
            }
        });

        match task.await {
            Ok(Some(result)) => debug!(hook, result = ?result, "Hook handled"),
            Ok(None) => debug!(hook, "Hook ignored"),
            Err(e) => warn!(hook, error = %e, "Hook handler aborted"),
        }
    }
}

#[async_trait]
impl HostEventHandler for NotifyHooks {
    async fn on_turn_end(&self, event: TurnEndEvent, ctx: &dyn SessionContext) {
        let session_id = resolve_session_id(ctx);
        self.guarded("turn_end", session_id, move |config, sid| {
            build_turn_end(config, &event, sid)
        })
        .await;
    }

    async fn on_tool_call(&self, event: ToolCallEvent, ctx: &dyn SessionContext) {
        let session_id = resolve_session_id(ctx);
        self.guarded("tool_call", session_id, move |config, sid| {
            build_tool_call(config, &event, sid)
        })
        .await;
    }

    async fn on_auto_retry_end(&self, event: AutoRetryEndEvent, ctx: &dyn SessionContext) {
        let session_id = resolve_session_id(ctx);
        self.guarded("auto_retry_end", session_id, move |config, sid| {
            build_auto_retry_end(config, &event, sid)
        })
        .await;
    }
}

/// 读取 session id；访问器 panic 或返回空值时使用占位值
fn resolve_session_id(ctx: &dyn SessionContext) -> String {
    std::panic::catch_unwind(AssertUnwindSafe(|| ctx.session_id()))
        .ok()
        .flatten()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| UNKNOWN_SESSION.to_string())
}

/// `turn_end` 事件 -> TurnError / TurnComplete
pub fn build_turn_end(
    config: &NotifyConfig,
    event: &TurnEndEvent,
    session_id: &str,
) -> Option<NotificationEvent> {
    if event.role() != Some("assistant") {
        return None;
    }

    if event.stop_reason() == Some("error") {
        if !config.notify_error {
            return None;
        }
        return Some(NotificationEvent::new(
            session_id,
            NotificationEventType::TurnError,
            TURN_FAILED,
        ));
    }

    if !config.notify_complete {
        return None;
    }
    let kind = NotificationEventType::TurnComplete;
    let assistant_text = extract_assistant_text(&event.message);
    if assistant_text.is_empty() {
        return Some(NotificationEvent::new(session_id, kind, TURN_COMPLETED));
    }

    let body = escape_markdown(&preview(&assistant_text, config.head, config.tail));
    Some(
        NotificationEvent::new(session_id, kind, format!("{} {}", kind.marker(), body))
            .with_summarize_source(assistant_text),
    )
}

/// `tool_call` 事件 -> AskWaiting（仅 ask 工具）
pub fn build_tool_call(
    config: &NotifyConfig,
    event: &ToolCallEvent,
    session_id: &str,
) -> Option<NotificationEvent> {
    if !config.notify_question || event.tool_name != "ask" {
        return None;
    }

    let kind = NotificationEventType::AskWaiting;
    let question = extract_ask_question(&event.input);
    let message = if question.is_empty() {
        WAITING_FOR_INPUT.to_string()
    } else {
        format!(
            "{} {}",
            kind.marker(),
            escape_markdown(&preview(&question, config.head, config.tail))
        )
    };
    Some(NotificationEvent::new(session_id, kind, message))
}

/// `auto_retry_end` 事件 -> RetryFailed（仅失败时）
pub fn build_auto_retry_end(
    config: &NotifyConfig,
    event: &AutoRetryEndEvent,
    session_id: &str,
) -> Option<NotificationEvent> {
    if !config.notify_error || event.success {
        return None;
    }

    let reason = normalize(event.final_error_text());
    let message = if reason.is_empty() {
        RETRY_FAILED.to_string()
    } else {
        format!(
            "{}: {}",
            RETRY_FAILED,
            escape_markdown(&preview(&reason, config.head, config.tail))
        )
    };
    Some(NotificationEvent::new(
        session_id,
        NotificationEventType::RetryFailed,
        message,
    ))
}
