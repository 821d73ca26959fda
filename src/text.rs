//! 文本整形工具模块
//!
//! 所有长度均按字符（`char`）计算，而不是字节。

/// 截断时使用的省略标记
pub const ELLIPSIS: &str = "...";

/// Markdown 保留字符，出现时需要加反斜杠转义
const MARKDOWN_RESERVED: &[char] = &[
    '\\', '`', '*', '_', '~', '[', ']', '(', ')', '#', '+', '-', '.', '!', '>', '|', '{', '}',
];

/// 合并连续空白为单个空格并去除首尾空白
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 截断到 `limit` 个字符以内
///
/// - `limit <= 0` 或文本已足够短：原样返回
/// - `limit <= 3`：硬截断，不加省略号
/// - 其他：保留 `limit - 3` 个字符并追加 `...`
pub fn truncate(text: &str, limit: i64) -> String {
    let len = text.chars().count() as i64;
    if limit <= 0 || len <= limit {
        return text.to_string();
    }
    if limit <= 3 {
        return take_chars(text, limit as usize);
    }
    format!("{}{}", take_chars(text, (limit - 3) as usize), ELLIPSIS)
}

/// 生成首尾预览：`前 head 个字符 + ... + 后 tail 个字符`
///
/// 文本先经过 [`normalize`]；负数的 head/tail 按 0 处理。
pub fn preview(text: &str, head: i64, tail: i64) -> String {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return normalized;
    }
    let head = head.max(0) as usize;
    let tail = tail.max(0) as usize;

    let len = normalized.chars().count();
    if len <= head.saturating_add(tail).saturating_add(ELLIPSIS.len()) {
        return normalized;
    }
    if head == 0 {
        return last_chars(&normalized, tail);
    }
    if tail == 0 {
        return take_chars(&normalized, head);
    }
    format!(
        "{}{}{}",
        take_chars(&normalized, head),
        ELLIPSIS,
        last_chars(&normalized, tail)
    )
}

/// 转义 Markdown 保留字符，避免 agent 输出被客户端当作格式解析
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

fn last_chars(text: &str, n: usize) -> String {
    let len = text.chars().count();
    text.chars().skip(len.saturating_sub(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  hello \n\t world  "), "hello world");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n "), "");
    }

    #[test]
    fn test_truncate_fits() {
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello", 0), "hello");
        assert_eq!(truncate("hello", -1), "hello");
    }

    #[test]
    fn test_truncate_small_limit_has_no_ellipsis() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("hello", 1), "h");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 4), "h...");
    }

    #[test]
    fn test_truncate_never_exceeds_limit() {
        let text = "✅ 任务已完成，所有测试通过 and more text here";
        for limit in 1..40 {
            let out = truncate(text, limit);
            assert!(out.chars().count() as i64 <= limit, "limit {}", limit);
            if limit <= 3 {
                assert!(!out.ends_with(ELLIPSIS));
            }
        }
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("  short   text ", 5, 5), "short text");
        // 恰好等于 head + tail + 3
        assert_eq!(preview("abcdefghijk", 4, 4), "abcdefghijk");
    }

    #[test]
    fn test_preview_head_and_tail() {
        assert_eq!(preview("abcdefghijklmnop", 3, 2), "abc...op");
    }

    #[test]
    fn test_preview_zero_head_or_tail() {
        assert_eq!(preview("abcdefghijklmnop", 0, 4), "mnop");
        assert_eq!(preview("abcdefghijklmnop", 4, 0), "abcd");
        assert_eq!(preview("abcdefghijklmnop", -5, 4), "mnop");
    }

    #[test]
    fn test_preview_huge_budget_returns_normalized() {
        assert_eq!(preview(" hello   world ", i64::MAX, i64::MAX), "hello world");
        assert_eq!(preview("hello world", i64::MAX, 0), "hello world");
    }

    #[test]
    fn test_preview_never_longer_than_normalized() {
        let text = "one two three four five six seven eight nine ten";
        let normalized_len = normalize(text).chars().count();
        for head in 0..12 {
            for tail in 0..12 {
                assert!(preview(text, head, tail).chars().count() <= normalized_len);
            }
        }
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a_b*c"), "a\\_b\\*c");
        assert_eq!(escape_markdown("v1.2-rc!"), "v1\\.2\\-rc\\!");
        assert_eq!(escape_markdown("[x](y)"), "\\[x\\]\\(y\\)");
        assert_eq!(escape_markdown("\\"), "\\\\");
        assert_eq!(escape_markdown("plain 文本 ✅"), "plain 文本 ✅");
    }

    #[test]
    fn test_escape_markdown_covers_reserved_set() {
        let reserved = "\\`*_~[]()#+-.!>|{}";
        let escaped = escape_markdown(reserved);
        let expected: String = reserved.chars().flat_map(|c| ['\\', c]).collect();
        assert_eq!(escaped, expected);
    }
}
