//! # 子命令共用参数
//!
//! 输入文件名、k 点/能带范围与 irssg 执行参数在多个子命令中复用，
//! 通过 `#[command(flatten)]` 嵌入。
//!
//! ## 依赖关系
//! - 被 `cli/run.rs`, `cli/info.rs`, `cli/batch.rs` 使用

use crate::models::RangeSpec;
use crate::runner::InputPaths;
use clap::Args;
use std::path::PathBuf;

/// OUTCAR / WAVECAR 文件名
#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// Path to OUTCAR, relative to the working directory
    #[arg(long, default_value = "OUTCAR")]
    pub outcar: PathBuf,

    /// Path to WAVECAR, relative to the working directory
    #[arg(long, default_value = "WAVECAR")]
    pub wavecar: PathBuf,
}

impl FileArgs {
    pub fn to_inputs(&self) -> InputPaths {
        InputPaths::new(self.outcar.clone(), self.wavecar.clone())
    }
}

/// k 点 / 能带范围
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// K-point range to process (1-based, inclusive)
    #[arg(short = 'k', long = "k-points", num_args = 2, value_names = ["START", "END"])]
    pub k_points: Option<Vec<usize>>,

    /// Band range to process (1-based, inclusive)
    #[arg(short = 'b', long, num_args = 2, value_names = ["START", "END"])]
    pub bands: Option<Vec<usize>>,
}

impl RangeArgs {
    pub fn to_spec(&self) -> RangeSpec {
        RangeSpec::new(pair(&self.k_points), pair(&self.bands))
    }
}

fn pair(values: &Option<Vec<usize>>) -> Option<(usize, usize)> {
    match values.as_deref() {
        Some([start, end]) => Some((*start, *end)),
        _ => None,
    }
}

/// irssg 执行参数
#[derive(Args, Debug, Clone)]
pub struct ExecArgs {
    /// Path to the IRSSG executable (searched in PATH when omitted)
    #[arg(long, env = "IRSSG_PATH")]
    pub irssg_path: Option<PathBuf>,

    /// Wall-clock timeout for one IRSSG run, in seconds
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}
