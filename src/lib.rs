//! OMP Gotify Notify - 把 coding agent 的生命周期事件推送到 Gotify

pub mod cli;
pub mod config;
pub mod hooks;
pub mod notification;
pub mod text;

pub use config::{NotifyConfig, SummarizerConfig};
pub use hooks::{
    AutoRetryEndEvent, EventBus, HostEnvelope, HostEventHandler, HostEventKind, JsonLinesBus,
    NotifyHooks, SessionContext, StaticSession, ToolCallEvent, TurnEndEvent,
};
pub use notification::{
    GotifyChannel, GotifyConfig, LlmSummarizer, NotificationChannel, NotificationDispatcher,
    NotificationEvent, NotificationEventType, SendResult, TextSummarizer,
};
