//! # batch 子命令 CLI 定义
//!
//! 在根目录下所有包含 OUTCAR 的目录中运行 irssg
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use super::common::{ExecArgs, FileArgs, RangeArgs};
use clap::Args;
use std::path::PathBuf;

/// batch 子命令参数
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Root directory containing VASP calculation folders
    pub root: PathBuf,

    /// Search subdirectories recursively
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = all CPUs)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    #[command(flatten)]
    pub files: FileArgs,

    #[command(flatten)]
    pub range: RangeArgs,

    #[command(flatten)]
    pub exec: ExecArgs,

    /// File name for IRSSG output inside each working directory (failed runs get a `.failed` suffix)
    #[arg(long, default_value = "irssg.out")]
    pub output_name: String,

    /// Skip directories that already contain output from a successful run
    #[arg(long, default_value_t = false)]
    pub skip_existing: bool,

    /// CSV summary of all runs
    #[arg(long, default_value = "irssg_summary.csv")]
    pub summary: PathBuf,
}
