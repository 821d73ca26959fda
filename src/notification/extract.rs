//! 从宿主事件载荷中提取可读文本
//!
//! 载荷结构不受本模块控制，所有提取函数对缺失或畸形字段都返回空字符串。

use crate::text::normalize;
use serde_json::Value;

/// 提取 assistant 消息中所有 `text` 块的内容，按顺序用空格连接
pub fn extract_assistant_text(message: &Value) -> String {
    if message.get("role").and_then(|r| r.as_str()) != Some("assistant") {
        return String::new();
    }
    let Some(blocks) = message.get("content").and_then(|c| c.as_array()) else {
        return String::new();
    };

    let parts: Vec<String> = blocks
        .iter()
        .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
        .map(normalize)
        .filter(|text| !text.is_empty())
        .collect();

    normalize(&parts.join(" "))
}

/// 提取 ask 工具输入中的第一个问题（`question`，缺失时退回 `header`）
pub fn extract_ask_question(input: &Value) -> String {
    let Some(first) = input
        .get("questions")
        .and_then(|q| q.as_array())
        .and_then(|q| q.first())
    else {
        return String::new();
    };

    let picked = [first.get("question"), first.get("header")]
        .into_iter()
        .flatten()
        .find(|v| is_truthy(v));
    match picked {
        Some(Value::String(s)) => normalize(s),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

/// 从 LLM API 响应中提取文本
///
/// 优先级：`output_text` > `output[].content[].text` > `choices[].message.content`
pub fn extract_response_text(payload: &Value) -> String {
    if let Some(text) = non_blank_str(payload.get("output_text")) {
        return normalize(text);
    }

    if let Some(items) = payload.get("output").and_then(|o| o.as_array()) {
        let found = items
            .iter()
            .filter_map(|item| item.get("content").and_then(|c| c.as_array()))
            .flatten()
            .find_map(|part| non_blank_str(part.get("text")));
        if let Some(text) = found {
            return normalize(text);
        }
    }

    if let Some(choices) = payload.get("choices").and_then(|c| c.as_array()) {
        let found = choices.iter().find_map(|choice| {
            non_blank_str(choice.get("message").and_then(|m| m.get("content")))
        });
        if let Some(text) = found {
            return normalize(text);
        }
    }

    String::new()
}

/// `question` 只要是非空值就优先，即使全是空白
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}
