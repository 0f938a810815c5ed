//! # VASP WAVECAR 文件头解析器
//!
//! WAVECAR 是定长记录的直接访问文件，所有头字段都以 `f64` 存储：
//!
//! ```text
//! record 1 (offset 0)      : nrecl  nspin  nprec
//! record 2 (offset nrecl)  : nkpts  nbands  ecut  a1 a2 a3  b1 b2 b3  c1 c2 c3
//! ```
//!
//! 字节序按小端处理（x86-64 / aarch64 Linux 上的 VASP 输出）。任何无法校验的
//! 字段都会让整个头被丢弃，不做猜测。读取失败只记录警告并返回 `None`，
//! 因为大部分流程仅凭 OUTCAR 就能继续。
//!
//! ## 依赖关系
//! - 被 `runner/session.rs`, `commands/info.rs` 使用
//! - 使用 `models/metadata.rs`

use crate::models::{Lattice, WavecarHeader, WavecarPrecision};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use thiserror::Error;

/// 第一条记录的有效字节数
pub const RECORD1_LEN: usize = 3 * 8;

/// 第二条记录的有效字节数
pub const RECORD2_LEN: usize = 12 * 8;

/// 能完整表示为 f64 的最大整数
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// WAVECAR 头格式错误
#[derive(Error, Debug)]
pub enum WavecarFormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file too short: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("field {field} is not a non-negative integer: {value}")]
    NotInteger { field: &'static str, value: f64 },

    #[error("record length {0} is smaller than the header record")]
    RecordTooShort(u64),

    #[error("unsupported spin count {0}")]
    InvalidSpin(u64),

    #[error("unknown precision tag {0}")]
    UnknownPrecision(u64),

    #[error("invalid energy cutoff {0}")]
    InvalidCutoff(f64),

    #[error("lattice component {index} is not finite")]
    InvalidLattice { index: usize },
}

/// 第一条记录内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FirstRecord {
    record_length: u64,
    nspin: u8,
    precision: WavecarPrecision,
}

/// 读取 WAVECAR 文件头；失败时记录警告并返回 `None`
pub fn read_wavecar_header(path: &Path) -> Option<WavecarHeader> {
    match try_read_header(path) {
        Ok(header) => {
            tracing::debug!(
                path = %path.display(),
                nrecl = header.record_length,
                nspin = header.nspin,
                nkpts = header.num_k,
                nbands = header.num_bands,
                ecut = header.ecut,
                "parsed WAVECAR header"
            );
            Some(header)
        }
        Err(e) => {
            tracing::warn!("Could not read WAVECAR header from {}: {}", path.display(), e);
            None
        }
    }
}

fn try_read_header(path: &Path) -> Result<WavecarHeader, WavecarFormatError> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();

    let mut rec1 = [0u8; RECORD1_LEN];
    read_exact_or_truncated(&mut file, &mut rec1, file_len, 0)?;
    let first = parse_first_record(&rec1)?;

    file.seek(SeekFrom::Start(first.record_length))?;
    let mut rec2 = [0u8; RECORD2_LEN];
    read_exact_or_truncated(&mut file, &mut rec2, file_len, first.record_length)?;

    parse_second_record(&rec2, first)
}

fn read_exact_or_truncated(
    file: &mut File,
    buf: &mut [u8],
    file_len: u64,
    offset: u64,
) -> Result<(), WavecarFormatError> {
    let needed = offset + buf.len() as u64;
    if file_len < needed {
        return Err(WavecarFormatError::Truncated {
            needed: needed as usize,
            got: file_len as usize,
        });
    }
    file.read_exact(buf)?;
    Ok(())
}

/// 从内存中的完整字节解析文件头
pub fn parse_wavecar_header(bytes: &[u8]) -> Result<WavecarHeader, WavecarFormatError> {
    let rec1 = bytes
        .get(..RECORD1_LEN)
        .ok_or(WavecarFormatError::Truncated {
            needed: RECORD1_LEN,
            got: bytes.len(),
        })?;
    let first = parse_first_record(rec1)?;

    let start = first.record_length as usize;
    let rec2 = bytes
        .get(start..start + RECORD2_LEN)
        .ok_or(WavecarFormatError::Truncated {
            needed: start + RECORD2_LEN,
            got: bytes.len(),
        })?;
    parse_second_record(rec2, first)
}

fn parse_first_record(rec: &[u8]) -> Result<FirstRecord, WavecarFormatError> {
    let fields = read_f64s::<3>(rec);

    let record_length = as_count(fields[0], "nrecl")?;
    if record_length < RECORD2_LEN as u64 {
        return Err(WavecarFormatError::RecordTooShort(record_length));
    }

    let nspin = as_count(fields[1], "nspin")?;
    if nspin != 1 && nspin != 2 {
        return Err(WavecarFormatError::InvalidSpin(nspin));
    }

    let tag = as_count(fields[2], "nprec")?;
    let precision =
        WavecarPrecision::from_tag(tag).ok_or(WavecarFormatError::UnknownPrecision(tag))?;

    Ok(FirstRecord {
        record_length,
        nspin: nspin as u8,
        precision,
    })
}

fn parse_second_record(
    rec: &[u8],
    first: FirstRecord,
) -> Result<WavecarHeader, WavecarFormatError> {
    let fields = read_f64s::<12>(rec);

    let num_k = as_count(fields[0], "nkpts")? as usize;
    let num_bands = as_count(fields[1], "nbands")? as usize;

    let ecut = fields[2];
    if !ecut.is_finite() || ecut <= 0.0 {
        return Err(WavecarFormatError::InvalidCutoff(ecut));
    }

    let mut components = [0.0; 9];
    for (i, value) in fields[3..].iter().enumerate() {
        if !value.is_finite() {
            return Err(WavecarFormatError::InvalidLattice { index: i });
        }
        components[i] = *value;
    }

    Ok(WavecarHeader {
        record_length: first.record_length,
        nspin: first.nspin,
        precision: first.precision,
        num_k,
        num_bands,
        ecut,
        lattice: Lattice::from_row_major(&components),
    })
}

/// 读取 N 个小端 f64，调用方保证长度足够
fn read_f64s<const N: usize>(rec: &[u8]) -> [f64; N] {
    let mut out = [0.0; N];
    for (i, chunk) in rec.chunks_exact(8).take(N).enumerate() {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        out[i] = f64::from_le_bytes(raw);
    }
    out
}

fn as_count(value: f64, field: &'static str) -> Result<u64, WavecarFormatError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > MAX_EXACT_INT {
        return Err(WavecarFormatError::NotInteger { field, value });
    }
    Ok(value as u64)
}
