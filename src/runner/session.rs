//! # 工作目录会话
//!
//! 每个工作目录打开一次：校验输入 → 读取 OUTCAR（必需）→ 读取 WAVECAR
//! 文件头（尽力而为）→ 交叉核对。之后元数据只读，范围校验与执行都基于它。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/`, `runner/range.rs`, `runner/process.rs`

use super::process::ProcessRunner;
use super::range::validate_range;
use crate::error::{IrssgError, Result};
use crate::models::{
    CalculationMetadata, ExecutionRequest, ExecutionResult, RangeSpec, WavecarHeader,
};
use crate::parsers::{parse_outcar, read_wavecar_header};

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 输入文件检查时读取的字节数
const PROBE_BYTES: usize = 100;

/// 晶格比较容差 (Å)
const LATTICE_TOLERANCE: f64 = 1e-4;

/// OUTCAR / WAVECAR 路径，相对路径按工作目录解析
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub outcar: PathBuf,
    pub wavecar: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        InputPaths {
            outcar: PathBuf::from("OUTCAR"),
            wavecar: PathBuf::from("WAVECAR"),
        }
    }
}

impl InputPaths {
    pub fn new(outcar: impl Into<PathBuf>, wavecar: impl Into<PathBuf>) -> Self {
        InputPaths {
            outcar: outcar.into(),
            wavecar: wavecar.into(),
        }
    }

    pub fn outcar_in(&self, work_dir: &Path) -> PathBuf {
        work_dir.join(&self.outcar)
    }

    pub fn wavecar_in(&self, work_dir: &Path) -> PathBuf {
        work_dir.join(&self.wavecar)
    }
}

/// 检查 OUTCAR 与 WAVECAR 存在且可读
pub fn validate_inputs(work_dir: &Path, inputs: &InputPaths) -> Result<()> {
    if !work_dir.is_dir() {
        return Err(IrssgError::DirectoryNotFound {
            path: work_dir.display().to_string(),
        });
    }

    for path in [inputs.outcar_in(work_dir), inputs.wavecar_in(work_dir)] {
        if !path.is_file() {
            return Err(IrssgError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        probe_readable(&path)?;
    }

    Ok(())
}

fn probe_readable(path: &Path) -> Result<()> {
    let read_err = |e| IrssgError::FileReadError {
        path: path.display().to_string(),
        source: e,
    };
    let file = File::open(path).map_err(read_err)?;
    let mut buf = Vec::with_capacity(PROBE_BYTES);
    file.take(PROBE_BYTES as u64)
        .read_to_end(&mut buf)
        .map_err(read_err)?;
    Ok(())
}

/// 单个工作目录的会话
#[derive(Debug, Clone)]
pub struct Session {
    work_dir: PathBuf,
    metadata: CalculationMetadata,
    wavecar: Option<WavecarHeader>,
}

impl Session {
    /// 打开工作目录并读取元数据
    pub fn open(work_dir: &Path, inputs: &InputPaths) -> Result<Self> {
        if !work_dir.is_dir() {
            return Err(IrssgError::DirectoryNotFound {
                path: work_dir.display().to_string(),
            });
        }

        let outcar = parse_outcar(&inputs.outcar_in(work_dir))?;

        let wavecar_path = inputs.wavecar_in(work_dir);
        let wavecar = if wavecar_path.exists() {
            read_wavecar_header(&wavecar_path)
        } else {
            tracing::warn!(
                "WAVECAR not found at {}, using OUTCAR metadata only",
                wavecar_path.display()
            );
            None
        };

        let mut session = Session::from_metadata(work_dir, reconcile(outcar, wavecar.as_ref()));
        session.wavecar = wavecar;
        Ok(session)
    }

    /// 直接用已有元数据创建会话
    pub fn from_metadata(work_dir: impl Into<PathBuf>, metadata: CalculationMetadata) -> Self {
        Session {
            work_dir: work_dir.into(),
            metadata,
            wavecar: None,
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn metadata(&self) -> &CalculationMetadata {
        &self.metadata
    }

    pub fn wavecar(&self) -> Option<&WavecarHeader> {
        self.wavecar.as_ref()
    }

    /// 校验范围
    pub fn request(&self, spec: &RangeSpec) -> Result<ExecutionRequest> {
        validate_range(spec, &self.metadata)
    }

    /// 在本工作目录执行 irssg
    pub fn execute(&self, runner: &ProcessRunner, request: &ExecutionRequest) -> ExecutionResult {
        runner.run(request, &self.work_dir)
    }
}

/// 以 OUTCAR 为准合并 WAVECAR 信息
fn reconcile(mut outcar: CalculationMetadata, wavecar: Option<&WavecarHeader>) -> CalculationMetadata {
    let wave = match wavecar {
        Some(h) => h.to_metadata(),
        None => return outcar,
    };

    outcar.num_k = merge_count("k-point count", "NKPTS", outcar.num_k, wave.num_k);
    outcar.num_bands = merge_count("band count", "NBANDS", outcar.num_bands, wave.num_bands);

    if outcar.nspin != wave.nspin {
        tracing::warn!(
            "spin count differs: OUTCAR ISPIN = {}, WAVECAR = {}; using OUTCAR",
            outcar.nspin,
            wave.nspin
        );
    }

    match (outcar.lattice_vectors, wave.lattice_vectors) {
        (Some(ours), Some(theirs)) => {
            if !ours.approx_eq(&theirs, LATTICE_TOLERANCE) {
                tracing::warn!("lattice vectors in OUTCAR and WAVECAR differ; using OUTCAR");
            }
        }
        (None, theirs) => outcar.lattice_vectors = theirs,
        (Some(_), None) => {}
    }

    outcar
}

/// OUTCAR 缺失（为 0）时取 WAVECAR 的值，否则保留 OUTCAR 并在不一致时告警
fn merge_count(what: &str, key: &str, outcar: usize, wavecar: usize) -> usize {
    if outcar == 0 {
        return wavecar;
    }
    if outcar != wavecar {
        tracing::warn!(
            "{} differs: OUTCAR {} = {}, WAVECAR = {}; using OUTCAR",
            what,
            key,
            outcar,
            wavecar
        );
    }
    outcar
}
