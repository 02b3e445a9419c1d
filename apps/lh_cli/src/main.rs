// apps/lh_cli/src/main.rs

//! LagHydro 命令行界面
//!
//! 单元中心拉格朗日流体力学求解器的命令行工具，
//! 内置标准验证算例（Sod / Noh / Sedov / 匀速平移）。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// LagHydro 拉格朗日流体力学求解器命令行工具
#[derive(Parser)]
#[command(name = "lh_cli")]
#[command(author = "LagHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cell-centered Lagrangian hydrodynamics solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行内置验证算例
    Run(commands::run::RunArgs),
    /// 打印算例网格统计信息
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
