//! Hook 命令 - 处理单个宿主事件
//!
//! 事件载荷（`event` 对象）通过 stdin 传入。

use super::bootstrap::build_bus;
use crate::config::NotifyConfig;
use crate::hooks::{HostEnvelope, HostEventKind};
use anyhow::{anyhow, Result};
use clap::Args;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Hook 命令参数
#[derive(Args)]
pub struct HookArgs {
    /// 事件类型: turn_end, tool_call, auto_retry_end
    #[arg(long)]
    pub event: String,

    /// 宿主 session id
    #[arg(long)]
    pub session_id: Option<String>,

    /// 只打印不推送
    #[arg(long)]
    pub dry_run: bool,
}

/// 解析 hook 输入为事件信封；空输入视为空对象
pub fn parse_hook_input(kind: HostEventKind, session_id: Option<String>, raw: &str) -> Result<HostEnvelope> {
    let event = if raw.trim().is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(raw).map_err(|e| anyhow!("invalid event payload: {}", e))?
    };
    Ok(HostEnvelope {
        kind,
        session_id,
        event,
    })
}

/// 解析原始 stdin 字节；非 UTF-8 输入和畸形 JSON 一样视为载荷错误
pub fn decode_hook_input(kind: HostEventKind, session_id: Option<String>, raw: &[u8]) -> Result<HostEnvelope> {
    let text = std::str::from_utf8(raw).map_err(|e| anyhow!("event payload is not UTF-8: {}", e))?;
    parse_hook_input(kind, session_id, text)
}

/// 处理 hook 命令
pub async fn handle_hook(args: HookArgs) -> Result<()> {
    let kind: HostEventKind = args.event.parse().map_err(|e: String| anyhow!(e))?;

    let mut raw = Vec::new();
    tokio::io::stdin().read_to_end(&mut raw).await?;

    let envelope = match decode_hook_input(kind, args.session_id, &raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "Ignoring hook input");
            return Ok(());
        }
    };

    let bus = build_bus(NotifyConfig::load(), args.dry_run)?;
    bus.deliver(envelope).await;
    Ok(())
}
