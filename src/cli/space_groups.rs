//! # space-groups 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/space_groups.rs`

use clap::Args;
use std::path::PathBuf;

/// space-groups 子命令参数
#[derive(Args, Debug)]
pub struct SpaceGroupsArgs {
    /// IRSSG reference data directory
    #[arg(long, env = "IRSSG_DATA")]
    pub data_dir: Option<PathBuf>,

    /// Check whether data for this space group number is available
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=230))]
    pub check: Option<u32>,
}
