//! # info / validate 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use super::common::FileArgs;
use clap::Args;
use std::path::PathBuf;

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Working directory containing VASP output files
    #[arg(short = 'w', long, default_value = ".")]
    pub work_dir: PathBuf,

    #[command(flatten)]
    pub files: FileArgs,
}

/// validate 子命令参数
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Working directory containing VASP output files
    #[arg(short = 'w', long, default_value = ".")]
    pub work_dir: PathBuf,

    #[command(flatten)]
    pub files: FileArgs,
}
