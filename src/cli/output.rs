//! Output formatting for CLI commands

use crate::config::NotifyConfig;
use crate::notification::SendResult;
use serde::Serialize;

/// Format output as JSON or plain text based on --json flag
pub fn format_output<T: Serialize>(data: &T, json: bool) -> String {
    if json {
        serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
    } else {
        serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string())
    }
}

/// 配置的可读文本形式（调用方负责先遮盖密钥）
pub fn format_config_text(config: &NotifyConfig) -> String {
    let mut lines = vec![
        format!("gotify_url:        {}", or_unset(&config.gotify_url)),
        format!("gotify_token:      {}", or_unset(&config.gotify_token)),
        format!("title:             {}", config.title),
        format!("max_chars:         {}", config.max_chars),
        format!("preview:           head={} tail={}", config.head, config.tail),
        format!(
            "events:            complete={} error={} question={}",
            config.notify_complete, config.notify_error, config.notify_question
        ),
        format!("dedup_window_secs: {}", config.dedup_window_secs),
    ];

    match &config.summarizer {
        Some(s) => {
            lines.push(format!("summarizer:        {} @ {}", s.model, s.endpoint));
            lines.push(format!("  api_key:         {}", s.api_key));
            lines.push(format!("  timeout_secs:    {}", s.timeout_secs));
            lines.push(format!("  max_input_chars: {}", s.max_input_chars));
        }
        None => lines.push("summarizer:        disabled".to_string()),
    }

    lines.join("\n")
}

/// 推送结果的单行描述
pub fn format_send_result(result: &SendResult) -> String {
    match result {
        SendResult::Sent => "sent".to_string(),
        SendResult::Skipped(reason) => format!("skipped: {}", reason),
        SendResult::Failed(reason) => format!("failed: {}", reason),
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}
