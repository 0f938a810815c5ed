//! # 解析器模块
//!
//! 提供 VASP 输出文件的解析器。
//!
//! ## 依赖关系
//! - 被 `runner/` 与 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: outcar, wavecar

pub mod outcar;
pub mod wavecar;

pub use outcar::parse_outcar;
pub use wavecar::read_wavecar_header;
