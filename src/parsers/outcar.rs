//! # VASP OUTCAR 解析器
//!
//! 单遍扫描 OUTCAR，提取标题、k 点数、能带数、自旋数和晶格向量。
//!
//! ## 识别的行
//! ```text
//!    SYSTEM =  Bi2Se3
//!    k-points           NKPTS =      8   k-points in BZ     NKDIM =      8   number of bands    NBANDS=     16
//!    ISPIN  =      1    spin polarized calculation?
//!   direct lattice vectors                 reciprocal lattice vectors
//!      4.138000000  0.000000000  0.000000000     0.241662639  0.139523964  0.000000000
//!     -2.069000000  3.583613000  0.000000000     0.000000000  0.279047928  0.000000000
//!      0.000000000  0.000000000 28.640000000     0.000000000  0.000000000  0.034916201
//! ```
//! 每条规则独立作用于各行，后出现的匹配覆盖先出现的。
//!
//! ## 依赖关系
//! - 被 `runner/session.rs`, `commands/info.rs` 使用
//! - 使用 `models/metadata.rs`

use crate::error::{IrssgError, Result};
use crate::models::{CalculationMetadata, Lattice};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const TITLE_MARKER: &str = "SYSTEM =";
const KPOINTS_MARKER: &str = "k-points";
const NKPTS_KEY: &str = "NKPTS";
const NBANDS_KEY: &str = "NBANDS";
const ISPIN_MARKER: &str = "ISPIN";
const LATTICE_MARKER: &str = "direct lattice vectors";

/// 解析 VASP OUTCAR 文件
pub fn parse_outcar(path: &Path) -> Result<CalculationMetadata> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IrssgError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => IrssgError::FileReadError {
            path: path.display().to_string(),
            source: e,
        },
    })?;

    // OUTCAR 注释中偶尔出现非 UTF-8 字节
    let content = String::from_utf8_lossy(&bytes);
    let meta = parse_outcar_content(&content, &path.display().to_string())?;

    tracing::debug!(
        path = %path.display(),
        num_k = meta.num_k,
        num_bands = meta.num_bands,
        nspin = meta.nspin,
        has_lattice = meta.lattice_vectors.is_some(),
        "parsed OUTCAR"
    );

    Ok(meta)
}

/// 从字符串内容解析 OUTCAR
pub fn parse_outcar_content(content: &str, source: &str) -> Result<CalculationMetadata> {
    let mut meta = CalculationMetadata::default();
    let mut lines = content.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        let line_no = idx + 1;

        // 标题
        // "   SYSTEM =  Bi2Se3"
        if line.contains(TITLE_MARKER) {
            if let Some((_, title)) = line.split_once('=') {
                meta.title = title.trim().to_string();
            }
        }

        // k 点数与能带数
        if line.contains(KPOINTS_MARKER) && has_key(line, NKPTS_KEY) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let nkpts = value_after_key(&tokens, NKPTS_KEY)
                .ok_or_else(|| parse_error(source, line_no, "missing value after NKPTS"))?;
            meta.num_k = parse_count(nkpts, NKPTS_KEY, source, line_no)?;

            if has_key(line, NBANDS_KEY) {
                let nbands = value_after_key(&tokens, NBANDS_KEY)
                    .ok_or_else(|| parse_error(source, line_no, "missing value after NBANDS"))?;
                meta.num_bands = parse_count(nbands, NBANDS_KEY, source, line_no)?;
            }
        }

        // 自旋
        // "   ISPIN  =      1    spin polarized calculation?"
        if line.contains(ISPIN_MARKER) {
            if let Some((_, rest)) = line.split_once('=') {
                let token = rest.split_whitespace().next().unwrap_or("");
                let nspin: u8 = token.parse().map_err(|_| {
                    parse_error(source, line_no, &format!("invalid ISPIN value '{}'", token))
                })?;
                if nspin != 1 && nspin != 2 {
                    return Err(parse_error(
                        source,
                        line_no,
                        &format!("ISPIN must be 1 or 2, got {}", nspin),
                    ));
                }
                meta.nspin = nspin;
            }
        }

        // 晶格向量：读取后续三行，三行全部有效才记录
        if line.contains(LATTICE_MARKER) {
            let rows: Vec<[f64; 3]> = lines
                .by_ref()
                .take(3)
                .filter_map(|(_, row)| parse_lattice_row(row))
                .collect();

            if rows.len() == 3 {
                meta.lattice_vectors = Some(Lattice::from_vectors([rows[0], rows[1], rows[2]]));
            } else {
                tracing::debug!(
                    line = line_no,
                    rows = rows.len(),
                    "incomplete lattice block in {}",
                    source
                );
            }
        }
    }

    Ok(meta)
}

/// 行中是否出现某个关键字（独立 token 或 `KEY=` 形式）
fn has_key(line: &str, key: &str) -> bool {
    line.split_whitespace()
        .any(|t| t == key || t.strip_prefix(key).map_or(false, |r| r.starts_with('=')))
}

/// 取关键字后的值 token
///
/// 支持 `KEY value`、`KEY = value`、`KEY= value` 与 `KEY=value` 四种写法。
fn value_after_key<'a>(tokens: &[&'a str], key: &str) -> Option<&'a str> {
    let pos = tokens
        .iter()
        .position(|t| *t == key || t.strip_prefix(key).map_or(false, |r| r.starts_with('=')))?;
    let token = tokens[pos];

    if token == key {
        match tokens.get(pos + 1) {
            Some(&"=") => tokens.get(pos + 2).copied(),
            other => other.copied(),
        }
    } else {
        let glued = &token[key.len() + 1..];
        if glued.is_empty() {
            tokens.get(pos + 1).copied()
        } else {
            Some(glued)
        }
    }
}

fn parse_count(token: &str, key: &str, source: &str, line_no: usize) -> Result<usize> {
    token.parse().map_err(|_| {
        parse_error(
            source,
            line_no,
            &format!("invalid {} value '{}'", key, token),
        )
    })
}

/// 取前三个字段作为实数行
fn parse_lattice_row(line: &str) -> Option<[f64; 3]> {
    let parts: Vec<f64> = line
        .split_whitespace()
        .take(3)
        .map(|s| s.parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    if parts.len() < 3 {
        return None;
    }
    Some([parts[0], parts[1], parts[2]])
}

fn parse_error(source: &str, line: usize, reason: &str) -> IrssgError {
    IrssgError::ParseError {
        format: "OUTCAR".to_string(),
        path: source.to_string(),
        line,
        reason: reason.to_string(),
    }
}
