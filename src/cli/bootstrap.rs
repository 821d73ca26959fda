//! 根据配置组装通知管线

use crate::config::NotifyConfig;
use crate::hooks::{EventBus, JsonLinesBus, NotifyHooks};
use crate::notification::{
    GotifyChannel, GotifyConfig, LlmSummarizer, NotificationDispatcher,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// 创建分发器；摘要器初始化失败只会禁用摘要
pub fn build_dispatcher(config: NotifyConfig, dry_run: bool) -> Result<NotificationDispatcher> {
    let channel = GotifyChannel::new(GotifyConfig {
        base_url: config.gotify_url.clone(),
        token: config.gotify_token.clone(),
    })?;
    if !channel.is_configured() {
        warn!("GOTIFY_URL or Gotify token not set, notifications will be skipped");
    }

    let summarizer = config.summarizer.clone();
    let mut dispatcher = NotificationDispatcher::new(config, Arc::new(channel)).with_dry_run(dry_run);

    if let Some(summarizer_config) = summarizer {
        let model = summarizer_config.model.clone();
        match LlmSummarizer::new(summarizer_config) {
            Ok(summarizer) => {
                info!(model = %model, "Summarizer enabled");
                dispatcher = dispatcher.with_summarizer(Arc::new(summarizer));
            }
            Err(e) => warn!(error = %e, "Summarizer disabled"),
        }
    }

    Ok(dispatcher)
}

/// 创建已注册通知处理器的事件总线
pub fn build_bus(config: NotifyConfig, dry_run: bool) -> Result<JsonLinesBus> {
    let dispatcher = Arc::new(build_dispatcher(config, dry_run)?);
    let mut bus = JsonLinesBus::new();
    bus.subscribe(Arc::new(NotifyHooks::new(dispatcher)));
    Ok(bus)
}
