//! # VASP 计算元数据模型
//!
//! 存储从 OUTCAR（文本）与 WAVECAR（二进制头）中提取的计算信息。
//! 一个工作目录解析一次，之后只读，可在线程间共享。
//!
//! ## 依赖关系
//! - 被 `parsers/outcar.rs`, `parsers/wavecar.rs` 构造
//! - 被 `runner/range.rs`, `runner/session.rs` 使用

use super::Lattice;
use serde::{Deserialize, Serialize};

/// VASP 计算元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationMetadata {
    /// SYSTEM 标题
    pub title: String,

    /// k 点数 (NKPTS)
    pub num_k: usize,

    /// 能带数 (NBANDS)
    pub num_bands: usize,

    /// 自旋通道数 (ISPIN)，1 或 2
    pub nspin: u8,

    /// 实空间晶格向量，只有完整读到三行时才存在
    pub lattice_vectors: Option<Lattice>,

    /// k 点坐标（按需填充）
    pub kpoints: Vec<[f64; 3]>,

    /// 本征能量（按需填充）
    pub energies: Vec<f64>,
}

impl Default for CalculationMetadata {
    fn default() -> Self {
        CalculationMetadata {
            title: String::new(),
            num_k: 0,
            num_bands: 0,
            nspin: 1,
            lattice_vectors: None,
            kpoints: Vec::new(),
            energies: Vec::new(),
        }
    }
}

impl CalculationMetadata {
    /// 是否为自旋极化计算
    pub fn is_spin_polarized(&self) -> bool {
        self.nspin == 2
    }

    /// 元数据是否给出了可用于范围校验的上界
    pub fn has_bounds(&self) -> bool {
        self.num_k > 0 && self.num_bands > 0
    }
}

/// WAVECAR 系数精度标记 (第一条记录第三个字段)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavecarPrecision {
    /// complex(4)，标记 45200
    Complex8,
    /// complex(8)，标记 45210
    Complex16,
    /// VASP 6 complex(4)，标记 53300
    Complex8V6,
    /// VASP 6 complex(8)，标记 53310
    Complex16V6,
}

impl WavecarPrecision {
    /// 从记录中的数值标记识别精度
    pub fn from_tag(tag: u64) -> Option<Self> {
        match tag {
            45200 => Some(WavecarPrecision::Complex8),
            45210 => Some(WavecarPrecision::Complex16),
            53300 => Some(WavecarPrecision::Complex8V6),
            53310 => Some(WavecarPrecision::Complex16V6),
            _ => None,
        }
    }

    pub fn tag(&self) -> u64 {
        match self {
            WavecarPrecision::Complex8 => 45200,
            WavecarPrecision::Complex16 => 45210,
            WavecarPrecision::Complex8V6 => 53300,
            WavecarPrecision::Complex16V6 => 53310,
        }
    }
}

impl std::fmt::Display for WavecarPrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WavecarPrecision::Complex8 | WavecarPrecision::Complex8V6 => {
                write!(f, "single ({})", self.tag())
            }
            WavecarPrecision::Complex16 | WavecarPrecision::Complex16V6 => {
                write!(f, "double ({})", self.tag())
            }
        }
    }
}

/// WAVECAR 文件头
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavecarHeader {
    /// 记录长度（字节）
    pub record_length: u64,

    /// 自旋通道数
    pub nspin: u8,

    /// 系数精度
    pub precision: WavecarPrecision,

    /// k 点数
    pub num_k: usize,

    /// 能带数
    pub num_bands: usize,

    /// 平面波截断能 (eV)
    pub ecut: f64,

    /// 实空间晶格向量
    pub lattice: Lattice,
}

impl WavecarHeader {
    /// 转换为部分填充的元数据（无标题）
    pub fn to_metadata(&self) -> CalculationMetadata {
        CalculationMetadata {
            num_k: self.num_k,
            num_bands: self.num_bands,
            nspin: self.nspin,
            lattice_vectors: Some(self.lattice),
            ..CalculationMetadata::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metadata_has_no_bounds() {
        let meta = CalculationMetadata::default();
        assert_eq!(meta.nspin, 1);
        assert!(!meta.has_bounds());
        assert!(meta.lattice_vectors.is_none());
    }

    #[test]
    fn test_precision_tags() {
        assert_eq!(
            WavecarPrecision::from_tag(45200),
            Some(WavecarPrecision::Complex8)
        );
        assert_eq!(
            WavecarPrecision::from_tag(53310),
            Some(WavecarPrecision::Complex16V6)
        );
        assert_eq!(WavecarPrecision::from_tag(12345), None);
        assert_eq!(WavecarPrecision::Complex16.tag(), 45210);
    }

    #[test]
    fn test_header_to_metadata() {
        let header = WavecarHeader {
            record_length: 4096,
            nspin: 2,
            precision: WavecarPrecision::Complex8,
            num_k: 8,
            num_bands: 48,
            ecut: 400.0,
            lattice: Lattice::from_vectors([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]),
        };
        let meta = header.to_metadata();
        assert_eq!(meta.num_k, 8);
        assert_eq!(meta.num_bands, 48);
        assert!(meta.is_spin_polarized());
        assert!(meta.title.is_empty());
        assert!(meta.lattice_vectors.is_some());
    }
}
