//! 通知配置
//!
//! 配置读取优先级：
//! 1. 环境变量
//! 2. 配置文件 `~/.config/omp-gotify-notify/config.json`（JSON 对象，键名与环境变量相同）
//!
//! 任何解析失败都回退到默认值，不会报错。

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_TITLE: &str = "OMP";
pub const DEFAULT_MAX_CHARS: i64 = 280;
pub const DEFAULT_HEAD: i64 = 50;
pub const DEFAULT_TAIL: i64 = 50;
pub const DEFAULT_DEDUP_WINDOW_SEC: i64 = 15;
pub const DEFAULT_SUMMARIZER_TIMEOUT_SEC: i64 = 120;
pub const DEFAULT_SUMMARIZER_MAX_INPUT_CHARS: i64 = 5000;

/// Gotify token 的候选来源，按顺序取第一个非空值
const GOTIFY_TOKEN_KEYS: &[&str] = &[
    "GOTIFY_TOKEN_FOR_OMP",
    "GOTIFY_TOKEN_FOR_OPENCODE",
    "GOTIFY_TOKEN_FOR_CODEX",
];

/// 摘要服务配置（模型、地址、密钥三者齐全才启用）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarizerConfig {
    pub model: String,
    /// 不带结尾 `/` 的 base URL
    pub endpoint: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub max_input_chars: i64,
}

/// 全局通知配置，启动时加载一次，之后只读
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotifyConfig {
    /// Gotify base URL，不带结尾 `/`
    pub gotify_url: String,
    pub gotify_token: String,
    pub title: String,
    pub max_chars: i64,
    pub head: i64,
    pub tail: i64,
    pub notify_complete: bool,
    pub notify_error: bool,
    pub notify_question: bool,
    pub dedup_window_secs: i64,
    pub summarizer: Option<SummarizerConfig>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl NotifyConfig {
    /// 从环境变量和配置文件加载
    pub fn load() -> Self {
        let file_values = default_config_path()
            .map(|path| {
                load_config_file(&path).unwrap_or_else(|e| {
                    debug!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                    HashMap::new()
                })
            })
            .unwrap_or_default();

        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .or_else(|| file_values.get(key).cloned())
        })
    }

    /// 从任意 key/value 来源构建配置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();
        let get_int = |key: &str, default: i64| parse_int(&get(key)).unwrap_or(default);
        let get_bool = |key: &str, default: bool| parse_bool(&get(key)).unwrap_or(default);

        let gotify_token = GOTIFY_TOKEN_KEYS
            .iter()
            .map(|&key| get(key))
            .find(|v| !v.is_empty())
            .unwrap_or_default();

        let title = match get("OMP_NOTIFY_TITLE") {
            t if t.is_empty() => DEFAULT_TITLE.to_string(),
            t => t,
        };

        let model = get("GOTIFY_NOTIFY_SUMMARIZER_MODEL");
        let endpoint = normalize_base(&get("GOTIFY_NOTIFY_SUMMARIZER_ENDPOINT"));
        let api_key = get("GOTIFY_NOTIFY_SUMMARIZER_API_KEY");
        let summarizer = if model.is_empty() || endpoint.is_empty() || api_key.is_empty() {
            None
        } else {
            Some(SummarizerConfig {
                model,
                endpoint,
                api_key,
                timeout_secs: get_int(
                    "OMP_NOTIFY_SUMMARIZER_TIMEOUT_SEC",
                    DEFAULT_SUMMARIZER_TIMEOUT_SEC,
                )
                .max(1) as u64,
                max_input_chars: get_int(
                    "OMP_NOTIFY_SUMMARIZER_MAX_INPUT_CHARS",
                    DEFAULT_SUMMARIZER_MAX_INPUT_CHARS,
                )
                .max(1),
            })
        };

        Self {
            gotify_url: normalize_base(&get("GOTIFY_URL")),
            gotify_token,
            title,
            max_chars: get_int("OMP_NOTIFY_MAX_CHARS", DEFAULT_MAX_CHARS).max(1),
            head: get_int("OMP_NOTIFY_HEAD", DEFAULT_HEAD).max(0),
            tail: get_int("OMP_NOTIFY_TAIL", DEFAULT_TAIL).max(0),
            notify_complete: get_bool("OMP_NOTIFY_COMPLETE", true),
            notify_error: get_bool("OMP_NOTIFY_ERROR", true),
            notify_question: get_bool("OMP_NOTIFY_QUESTION", true),
            dedup_window_secs: get_int("OMP_NOTIFY_DEDUP_WINDOW_SEC", DEFAULT_DEDUP_WINDOW_SEC)
                .max(0),
            summarizer,
        }
    }

    /// 用于展示的副本，token 和 API key 被遮盖
    pub fn masked(&self) -> Self {
        let mut out = self.clone();
        out.gotify_token = mask_secret(&out.gotify_token);
        if let Some(s) = out.summarizer.as_mut() {
            s.api_key = mask_secret(&s.api_key);
        }
        out
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/omp-gotify-notify/config.json"))
}

/// 读取 JSON 配置文件；字符串、数字和布尔值都按字符串收集
pub fn load_config_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("config file is not a JSON object: {}", path.display()))?;

    let values: HashMap<String, String> = object
        .iter()
        .filter_map(|(k, v)| {
            let s = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((k.clone(), s))
        })
        .collect();

    debug!(path = %path.display(), keys = values.len(), "Loaded config file");
    Ok(values)
}

/// 去掉结尾的单个 `/`
pub fn normalize_base(url: &str) -> String {
    let url = url.trim();
    url.strip_suffix('/').unwrap_or(url).to_string()
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

/// 空值返回 None（使用默认值）；`1/true/yes/on` 为 true，其余非空值为 false
fn parse_bool(raw: &str) -> Option<bool> {
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_lowercase();
    Some(matches!(lower.as_str(), "1" | "true" | "yes" | "on"))
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}
