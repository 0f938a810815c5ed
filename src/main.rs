//! # irssg-runner - VASP 计算的 IRSSG 驱动工具
//!
//! 从 OUTCAR / WAVECAR 读取计算元数据，校验 k 点与能带范围，
//! 在计算目录中调用 irssg 可执行文件并收集其输出。
//!
//! ## 子命令
//! - `run`          - 在单个计算目录中运行 irssg
//! - `info`         - 显示 OUTCAR / WAVECAR 中的计算信息
//! - `validate`     - 检查输入文件
//! - `batch`        - 在多个计算目录中并行运行 irssg
//! - `space-groups` - 列出可用的空间群数据
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── runner/    (范围校验、进程执行、结果汇总)
//!   │     ├── parsers/   (OUTCAR / WAVECAR 解析)
//!   │     ├── batch/     (批量目录收集与并行执行)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod runner;
mod utils;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match commands::run(cli.command, cli.verbose) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            std::process::exit(commands::EXIT_FAILURE);
        }
    }
}

/// 日志输出到 stderr，`RUST_LOG` 优先
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("irssg_runner=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
