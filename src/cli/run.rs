//! Run 命令 - 从 stdin 读取 JSON Lines 事件流

use super::bootstrap::build_bus;
use crate::config::NotifyConfig;
use anyhow::Result;
use clap::Args;
use tokio::io::BufReader;

/// Run 命令参数
#[derive(Args)]
pub struct RunArgs {
    /// 只打印不推送
    #[arg(long)]
    pub dry_run: bool,
}

/// 处理 run 命令，直到 stdin 关闭
pub async fn handle_run(args: RunArgs) -> Result<()> {
    let bus = build_bus(NotifyConfig::load(), args.dry_run)?;
    bus.run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}
