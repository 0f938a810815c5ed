//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，返回进程退出码。
//!
//! ## 退出码
//! - 0: 成功
//! - 1: 错误（包括 irssg 非零退出、超时）
//! - 130: 只有 irssg 被 SIGINT 终止时由这里返回；
//!   终端 Ctrl-C 会同时终止本程序，此时 130 来自 shell（128 + SIGINT）
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `runner/`, `parsers/`, `utils/`
//! - 子模块: run, info, batch, space_groups

pub mod batch;
pub mod info;
pub mod run;
pub mod space_groups;

use crate::cli::Commands;
use crate::error::Result;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INTERRUPTED: i32 = 130;

/// SIGINT
const SIGINT: i32 = 2;

/// 执行命令
pub fn run(cmd: Commands, verbose: bool) -> Result<i32> {
    match cmd {
        Commands::Run(args) => run::execute(args, verbose),
        Commands::Info(args) => info::execute(args),
        Commands::Validate(args) => info::validate(args, verbose),
        Commands::Batch(args) => batch::execute(args, verbose),
        Commands::SpaceGroups(args) => space_groups::execute(args),
    }
}

/// 被 SIGINT 终止视为用户中断
pub(crate) fn is_interrupted(signal: Option<i32>) -> bool {
    signal == Some(SIGINT)
}
