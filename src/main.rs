//! OMP Gotify Notify CLI
//!
//! 接收 coding agent 的事件并推送 Gotify 通知

use anyhow::Result;
use clap::{Parser, Subcommand};
use omp_gotify_notify::cli::{
    handle_config, handle_hook, handle_run, handle_send, handle_summarize, ConfigArgs, HookArgs,
    RunArgs, SendArgs,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "omp-notify")]
#[command(about = "OMP Gotify Notify - 把 agent 事件推送到 Gotify")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 从 stdin 读取 JSON Lines 事件流并推送通知
    Run(RunArgs),
    /// 处理单个宿主事件（载荷从 stdin 读取）
    Hook(HookArgs),
    /// 直接推送一条消息（诊断用）
    Send(SendArgs),
    /// 从 stdin 读取文本并输出一句话摘要
    Summarize,
    /// 打印生效配置
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化 tracing 日志系统
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug omp-notify run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("omp_gotify_notify=info,omp_notify=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => handle_run(args).await?,
        Commands::Hook(args) => handle_hook(args).await?,
        Commands::Send(args) => handle_send(args).await?,
        Commands::Summarize => handle_summarize().await?,
        Commands::Config(args) => handle_config(args)?,
    }

    Ok(())
}
