//! # 数据模型模块
//!
//! 定义计算元数据、晶格与执行请求/结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `runner/` 和 `commands/` 使用
//! - 子模块: lattice, metadata, execution

pub mod execution;
pub mod lattice;
pub mod metadata;

pub use execution::{ExecutionRequest, ExecutionResult, RangeSpec};
pub use lattice::Lattice;
pub use metadata::{CalculationMetadata, WavecarHeader, WavecarPrecision};
