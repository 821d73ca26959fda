//! JSON Lines 事件总线
//!
//! 进程外宿主把事件逐行写入 stdin（格式见 [`HostEnvelope`]），
//! 总线解析后按顺序分发给所有已注册的处理器。无法解析的行直接跳过。

use super::types::{AutoRetryEndEvent, HostEnvelope, HostEventKind, ToolCallEvent, TurnEndEvent};
use super::{EventBus, HostEventHandler, StaticSession};
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// JSON Lines 事件总线
#[derive(Default)]
pub struct JsonLinesBus {
    handlers: Vec<Arc<dyn HostEventHandler>>,
}

impl JsonLinesBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已注册的处理器数量
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// 读取直到 EOF，返回成功分发的事件数
    pub async fn run<R>(&self, mut reader: R) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();
        let mut delivered = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    debug!(error = %e, "Skipping non UTF-8 event line");
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<HostEnvelope>(line) {
                Ok(envelope) => {
                    if self.deliver(envelope).await {
                        delivered += 1;
                    }
                }
                Err(e) => debug!(error = %e, "Skipping unparsable event line"),
            }
        }

        info!(delivered, "Event stream closed");
        Ok(delivered)
    }

    /// 分发一个事件；载荷结构无法识别时返回 false
    pub async fn deliver(&self, envelope: HostEnvelope) -> bool {
        let ctx = StaticSession(envelope.session_id);
        match envelope.kind {
            HostEventKind::TurnEnd => match parse::<TurnEndEvent>(envelope.event) {
                Some(event) => {
                    for handler in &self.handlers {
                        handler.on_turn_end(event.clone(), &ctx).await;
                    }
                    true
                }
                None => false,
            },
            HostEventKind::ToolCall => match parse::<ToolCallEvent>(envelope.event) {
                Some(event) => {
                    for handler in &self.handlers {
                        handler.on_tool_call(event.clone(), &ctx).await;
                    }
                    true
                }
                None => false,
            },
            HostEventKind::AutoRetryEnd => match parse::<AutoRetryEndEvent>(envelope.event) {
                Some(event) => {
                    for handler in &self.handlers {
                        handler.on_auto_retry_end(event.clone(), &ctx).await;
                    }
                    true
                }
                None => false,
            },
        }
    }
}

impl EventBus for JsonLinesBus {
    fn subscribe(&mut self, handler: Arc<dyn HostEventHandler>) {
        self.handlers.push(handler);
    }
}

fn parse<T: serde::de::DeserializeOwned>(payload: Value) -> Option<T> {
    let payload = if payload.is_null() {
        Value::Object(Default::default())
    } else {
        payload
    };
    serde_json::from_value(payload)
        .map_err(|e| debug!(error = %e, "Ignoring malformed event payload"))
        .ok()
}
