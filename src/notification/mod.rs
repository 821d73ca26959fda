//! 通知管线 - 提取、去重、摘要、推送
//!
//! # 使用示例
//! ```ignore
//! use omp_gotify_notify::config::NotifyConfig;
//! use omp_gotify_notify::notification::{GotifyChannel, GotifyConfig, NotificationDispatcher};
//!
//! let config = NotifyConfig::load();
//! let channel = GotifyChannel::new(GotifyConfig {
//!     base_url: config.gotify_url.clone(),
//!     token: config.gotify_token.clone(),
//! })?;
//! let dispatcher = NotificationDispatcher::new(config, Arc::new(channel));
//! ```

pub mod channel;
pub mod deduplicator;
pub mod dispatcher;
pub mod event;
pub mod extract;
pub mod gotify;
pub mod summarizer;

pub use channel::{NotificationChannel, SendResult};
pub use deduplicator::NotificationDeduplicator;
pub use dispatcher::NotificationDispatcher;
pub use event::{NotificationEvent, NotificationEventType};
pub use gotify::{GotifyChannel, GotifyConfig};
pub use summarizer::{LlmSummarizer, TextSummarizer};
