//! # run 子命令 CLI 定义
//!
//! 在一个 VASP 工作目录中运行 irssg
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use super::common::{ExecArgs, FileArgs, RangeArgs};
use clap::Args;
use std::path::PathBuf;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Working directory containing VASP output files
    #[arg(short = 'w', long, default_value = ".")]
    pub work_dir: PathBuf,

    #[command(flatten)]
    pub files: FileArgs,

    #[command(flatten)]
    pub range: RangeArgs,

    #[command(flatten)]
    pub exec: ExecArgs,

    /// Write IRSSG output to this file instead of the terminal
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only validate input files and ranges, do not run IRSSG
    #[arg(long, default_value_t = false)]
    pub validate_only: bool,
}
