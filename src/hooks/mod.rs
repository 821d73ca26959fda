//! 宿主事件适配层
//!
//! 宿主通过 [`EventBus`] 注册 [`HostEventHandler`]，每个事件对应一个处理方法。
//! 处理方法不返回错误，也不会把 panic 传播回宿主。

pub mod bus;
pub mod handler;
pub mod types;

pub use bus::JsonLinesBus;
pub use handler::{build_auto_retry_end, build_tool_call, build_turn_end, NotifyHooks};
pub use types::{AutoRetryEndEvent, HostEnvelope, HostEventKind, ToolCallEvent, TurnEndEvent};

use async_trait::async_trait;
use std::sync::Arc;

/// 宿主提供的会话上下文
pub trait SessionContext: Send + Sync {
    /// 当前 session id（不可用时为 None）
    fn session_id(&self) -> Option<String>;
}

/// 固定 session id 的上下文
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub Option<String>);

impl SessionContext for StaticSession {
    fn session_id(&self) -> Option<String> {
        self.0.clone()
    }
}

/// 宿主事件处理器
#[async_trait]
pub trait HostEventHandler: Send + Sync {
    async fn on_turn_end(&self, event: TurnEndEvent, ctx: &dyn SessionContext);

    async fn on_tool_call(&self, event: ToolCallEvent, ctx: &dyn SessionContext);

    async fn on_auto_retry_end(&self, event: AutoRetryEndEvent, ctx: &dyn SessionContext);
}

/// 宿主事件总线能力
pub trait EventBus {
    /// 注册处理器
    fn subscribe(&mut self, handler: Arc<dyn HostEventHandler>);
}
