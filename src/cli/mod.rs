//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `run`: 读取 OUTCAR/WAVECAR，校验范围并运行 irssg
//! - `info`: 显示计算元数据
//! - `validate`: 检查输入文件
//! - `batch`: 在多个计算目录中批量运行
//! - `space-groups`: 列出/检查空间群参考数据
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, run, info, batch, space_groups

pub mod batch;
pub mod common;
pub mod info;
pub mod run;
pub mod space_groups;

use clap::{Parser, Subcommand};

/// irssg-runner - VASP 输出接入与 IRSSG 调度
#[derive(Parser)]
#[command(name = "irssg-runner")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Read VASP OUTCAR/WAVECAR metadata and run IRSSG over a k-point/band range",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output and debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Validate the requested range and run IRSSG in a VASP working directory
    Run(run::RunArgs),

    /// Show calculation metadata read from OUTCAR and WAVECAR
    Info(info::InfoArgs),

    /// Check that OUTCAR and WAVECAR exist and are readable
    Validate(info::ValidateArgs),

    /// Run IRSSG in every VASP working directory under a root directory
    Batch(batch::BatchArgs),

    /// List or check the available space-group reference data
    SpaceGroups(space_groups::SpaceGroupsArgs),
}
