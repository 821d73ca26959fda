//! LLM 摘要客户端
//!
//! 把较长的 assistant 输出压缩成一句话。依次尝试两种 API 形态：
//! 1. `<endpoint>/chat/completions`
//! 2. `<endpoint>/responses`
//!
//! 任何失败（网络错误、超时、非 2xx、响应不是 JSON 对象、内容为空）都只会得到空字符串。

use super::extract::extract_response_text;
use crate::config::SummarizerConfig;
use crate::text::{normalize, truncate};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// 摘要结果的最大字符数
pub const MAX_SUMMARY_CHARS: i64 = 200;

/// 请求的最大输出 tokens
pub const SUMMARY_MAX_TOKENS: u32 = 80;

const CHAT_COMPLETIONS_SUFFIX: &str = "/chat/completions";
const RESPONSES_SUFFIX: &str = "/responses";

/// 摘要器 trait
#[async_trait]
pub trait TextSummarizer: Send + Sync {
    /// 生成一句话摘要；不可用时返回空字符串
    async fn summarize(&self, text: &str) -> String;
}

/// Chat Completions 请求体
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Responses 请求体
#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<ResponsesInput<'a>>,
    reasoning: Reasoning,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct ResponsesInput<'a> {
    role: &'a str,
    content: Vec<InputText<'a>>,
}

#[derive(Serialize)]
struct InputText<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct Reasoning {
    effort: &'static str,
}

/// OpenAI 兼容的 LLM 摘要客户端
#[derive(Debug, Clone)]
pub struct LlmSummarizer {
    client: Client,
    config: SummarizerConfig,
}

impl LlmSummarizer {
    /// 创建摘要客户端
    pub fn new(config: SummarizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| anyhow!("Cannot create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// 构造摘要 prompt
    pub fn build_prompt(text: &str) -> String {
        format!(
            "You are a concise summarizer. Output plain text only.\n\
             Use the same language as the input text.\n\
             Summarize this in ONE short sentence (max 80 chars). \
             No markdown, no quotes, just plain text:\n\n{}",
            text
        )
    }

    fn chat_completions_url(&self) -> String {
        endpoint_join(&self.config.endpoint, CHAT_COMPLETIONS_SUFFIX)
    }

    fn responses_url(&self) -> String {
        endpoint_join(&self.config.endpoint, RESPONSES_SUFFIX)
    }

    async fn try_chat_completions(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: SUMMARY_MAX_TOKENS,
        };
        let payload = self.post_json(&self.chat_completions_url(), &request).await?;
        Ok(extract_response_text(&payload))
    }

    async fn try_responses(&self, prompt: &str) -> Result<String> {
        let request = ResponsesRequest {
            model: &self.config.model,
            input: vec![ResponsesInput {
                role: "user",
                content: vec![InputText {
                    kind: "input_text",
                    text: prompt,
                }],
            }],
            reasoning: Reasoning { effort: "low" },
            max_output_tokens: SUMMARY_MAX_TOKENS,
        };
        let payload = self.post_json(&self.responses_url(), &request).await?;
        Ok(extract_response_text(&payload))
    }

    /// POST JSON 并解析响应体；超时由 client 统一控制
    async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<Value> {
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "request to {} failed after {}ms: {}",
                    url,
                    start.elapsed().as_millis(),
                    e
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{} returned {}", url, status));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("invalid JSON from {}: {}", url, e))?;
        if !payload.is_object() {
            return Err(anyhow!("unexpected response shape from {}", url));
        }

        debug!(url = %url, elapsed_ms = start.elapsed().as_millis(), "Summarizer request completed");
        Ok(payload)
    }
}

#[async_trait]
impl TextSummarizer for LlmSummarizer {
    async fn summarize(&self, text: &str) -> String {
        let clipped = truncate(&normalize(text), self.config.max_input_chars);
        if clipped.is_empty() {
            return String::new();
        }
        let prompt = Self::build_prompt(&clipped);

        match self.try_chat_completions(&prompt).await {
            Ok(out) if !out.is_empty() => return truncate(&out, MAX_SUMMARY_CHARS),
            Ok(_) => debug!("chat/completions returned no text, trying responses"),
            Err(e) => debug!(error = %e, "chat/completions failed, trying responses"),
        }

        match self.try_responses(&prompt).await {
            Ok(out) if !out.is_empty() => truncate(&out, MAX_SUMMARY_CHARS),
            Ok(_) => {
                debug!("responses returned no text");
                String::new()
            }
            Err(e) => {
                warn!(error = %e, "Summarizer unavailable, using preview");
                String::new()
            }
        }
    }
}

/// 在 base 后追加 suffix（已存在时不重复追加）
pub fn endpoint_join(base: &str, suffix: &str) -> String {
    if base.is_empty() {
        return String::new();
    }
    if base.ends_with(suffix) {
        base.to_string()
    } else {
        format!("{}{}", base, suffix)
    }
}
