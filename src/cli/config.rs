//! Config 命令 - 打印生效配置（密钥已遮盖）

use super::output::{format_config_text, format_output};
use crate::config::{default_config_path, NotifyConfig};
use anyhow::Result;
use clap::Args;

/// Config 命令参数
#[derive(Args)]
pub struct ConfigArgs {
    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 处理 config 命令
pub fn handle_config(args: ConfigArgs) -> Result<()> {
    let config = NotifyConfig::load().masked();
    if args.json {
        println!("{}", format_output(&config, true));
    } else {
        if let Some(path) = default_config_path() {
            println!("config_file:       {}", path.display());
        }
        println!("{}", format_config_text(&config));
    }
    Ok(())
}
