//! Gotify 客户端模块
//!
//! 通过 `POST <base>/message` 推送通知，认证头为 `X-Gotify-Key`。

use super::channel::{NotificationChannel, SendResult};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// 推送优先级（固定值）
pub const GOTIFY_PRIORITY: u8 = 5;

/// 单次推送超时（秒）
pub const GOTIFY_TIMEOUT_SECS: u64 = 10;

/// Gotify 客户端配置
#[derive(Debug, Clone, Default)]
pub struct GotifyConfig {
    /// Gotify base URL（不带结尾 `/`）
    pub base_url: String,
    /// 应用 token
    pub token: String,
}

/// 推送请求载荷
#[derive(Debug, Serialize)]
pub struct GotifyMessage<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub priority: u8,
}

/// Gotify 推送渠道
#[derive(Debug, Clone)]
pub struct GotifyChannel {
    client: Client,
    config: GotifyConfig,
}

impl GotifyChannel {
    /// 创建新的 Gotify 渠道
    pub fn new(config: GotifyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(GOTIFY_TIMEOUT_SECS))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// 是否已配置地址和 token
    pub fn is_configured(&self) -> bool {
        !self.config.base_url.is_empty() && !self.config.token.is_empty()
    }

    async fn post_message(&self, title: &str, message: &str) -> Result<()> {
        let url = format!("{}/message", self.config.base_url);
        let payload = GotifyMessage {
            title,
            message,
            priority: GOTIFY_PRIORITY,
        };

        let response = self
            .client
            .post(&url)
            .header("X-Gotify-Key", &self.config.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Gotify returned {}", status));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for GotifyChannel {
    fn name(&self) -> &str {
        "gotify"
    }

    async fn push(&self, title: &str, message: &str) -> SendResult {
        if !self.is_configured() {
            return SendResult::Skipped("gotify not configured".to_string());
        }
        if message.is_empty() {
            return SendResult::Skipped("empty message".to_string());
        }

        match self.post_message(title, message).await {
            Ok(()) => {
                debug!(title = %title, chars = message.chars().count(), "Gotify push sent");
                SendResult::Sent
            }
            Err(e) => {
                warn!(error = %e, "Gotify push failed");
                SendResult::Failed(e.to_string())
            }
        }
    }
}
