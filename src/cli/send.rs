//! Send / Summarize 命令 - 诊断用的直接推送和摘要

use super::output::format_send_result;
use crate::config::NotifyConfig;
use crate::notification::{
    GotifyChannel, GotifyConfig, LlmSummarizer, NotificationChannel, TextSummarizer,
};
use crate::text::truncate;
use anyhow::Result;
use clap::Args;
use tokio::io::AsyncReadExt;

/// Send 命令参数
#[derive(Args)]
pub struct SendArgs {
    /// 消息内容
    pub message: String,

    /// 通知标题（默认使用 OMP_NOTIFY_TITLE）
    #[arg(long, short)]
    pub title: Option<String>,
}

/// 处理 send 命令：绕过去重直接推送
pub async fn handle_send(args: SendArgs) -> Result<()> {
    let config = NotifyConfig::load();
    let channel = GotifyChannel::new(GotifyConfig {
        base_url: config.gotify_url.clone(),
        token: config.gotify_token.clone(),
    })?;

    let title = args.title.unwrap_or_else(|| config.title.clone());
    let message = truncate(&args.message, config.max_chars);
    let result = channel.push(&title, &message).await;
    println!("{}", format_send_result(&result));
    Ok(())
}

/// 处理 summarize 命令：从 stdin 读取文本并输出摘要
pub async fn handle_summarize() -> Result<()> {
    let config = NotifyConfig::load();
    let Some(summarizer_config) = config.summarizer else {
        eprintln!("Summarizer not configured (GOTIFY_NOTIFY_SUMMARIZER_MODEL / _ENDPOINT / _API_KEY)");
        println!();
        return Ok(());
    };

    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;

    let summarizer = LlmSummarizer::new(summarizer_config)?;
    println!("{}", summarizer.summarize(&text).await);
    Ok(())
}
