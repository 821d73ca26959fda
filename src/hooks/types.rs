//! 宿主事件类型定义
//!
//! 宿主负责事件结构，这里只声明用到的字段；其余字段忽略，缺失字段取默认值。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 订阅的宿主事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostEventKind {
    TurnEnd,
    ToolCall,
    AutoRetryEnd,
}

impl std::str::FromStr for HostEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "turn_end" => Ok(Self::TurnEnd),
            "tool_call" => Ok(Self::ToolCall),
            "auto_retry_end" => Ok(Self::AutoRetryEnd),
            other => Err(format!("unknown host event: {}", other)),
        }
    }
}

/// `turn_end`：一轮对话结束
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnEndEvent {
    /// `{ role, stopReason, content: [...] }`
    #[serde(default)]
    pub message: Value,
}

impl TurnEndEvent {
    pub fn role(&self) -> Option<&str> {
        self.message.get("role").and_then(|r| r.as_str())
    }

    pub fn stop_reason(&self) -> Option<&str> {
        self.message.get("stopReason").and_then(|r| r.as_str())
    }
}

/// `tool_call`：agent 调用工具
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallEvent {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub input: Value,
}

/// `auto_retry_end`：自动重试结束
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRetryEndEvent {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub final_error: Value,
}

impl AutoRetryEndEvent {
    /// 最终错误信息（非字符串视为无）
    pub fn final_error_text(&self) -> &str {
        self.final_error.as_str().unwrap_or("")
    }
}

/// 进程外宿主使用的事件信封，每行一个 JSON 对象
///
/// ```text
/// {"type":"turn_end","sessionId":"abc","event":{"message":{...}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEnvelope {
    #[serde(rename = "type")]
    pub kind: HostEventKind,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub event: Value,
}
