//! 通知去重器 - 防止短时间内发送重复通知
//!
//! 去重键为 `(session_id, event_kind, 渲染后的完整消息)`。
//! 消息内容有任何变化都会绕过去重。
//!
//! ## 去重策略
//! 1. 时间戳精度为秒（Unix 时间）
//! 2. 窗口 <= 0 时关闭去重
//! 3. 每次记录新发送时顺带清理过期记录，没有后台清理任务

use std::collections::HashMap;
use tracing::debug;

/// 键分隔符，不会出现在 session id 或事件类型中
const KEY_SEPARATOR: char = '\u{1f}';

/// 通知去重器
#[derive(Debug)]
pub struct NotificationDeduplicator {
    /// 最近发送的通知: key -> 发送时间（秒）
    recent: HashMap<String, i64>,
    /// 去重窗口（秒）
    window_secs: i64,
}

impl NotificationDeduplicator {
    /// 创建去重器
    pub fn new(window_secs: i64) -> Self {
        Self {
            recent: HashMap::new(),
            window_secs,
        }
    }

    /// 检查是否应该发送通知（使用当前时间）
    ///
    /// 返回 `true` 表示应该发送，`false` 表示应该去重跳过
    pub fn should_send(&mut self, session_id: &str, event_kind: &str, message: &str) -> bool {
        self.should_send_at(session_id, event_kind, message, chrono::Utc::now().timestamp())
    }

    /// 以指定时间戳检查是否应该发送
    ///
    /// # 去重规则
    /// - 同一 key 在窗口内再次出现会被跳过，且不刷新时间戳
    /// - 不同 session、不同事件类型或不同消息互不影响
    /// - 窗口过期后可以重新发送
    pub fn should_send_at(
        &mut self,
        session_id: &str,
        event_kind: &str,
        message: &str,
        now: i64,
    ) -> bool {
        if self.window_secs <= 0 {
            return true;
        }

        let key = Self::key(session_id, event_kind, message);
        if let Some(&last) = self.recent.get(&key) {
            if now - last < self.window_secs {
                debug!(
                    session_id = %session_id,
                    event_kind = %event_kind,
                    elapsed_secs = now - last,
                    "Notification deduplicated"
                );
                return false;
            }
        }

        self.recent.insert(key, now);
        self.cleanup_expired(now);
        true
    }

    /// 当前缓存的记录数
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    fn key(session_id: &str, event_kind: &str, message: &str) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            session_id,
            event_kind,
            message,
            sep = KEY_SEPARATOR
        )
    }

    /// 清理过期记录
    fn cleanup_expired(&mut self, now: i64) {
        let window = self.window_secs;
        self.recent.retain(|_, ts| now - *ts <= window);
    }
}
