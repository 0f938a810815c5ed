//! # 批量处理模块
//!
//! 在多个 VASP 计算目录中批量运行 irssg。
//!
//! ## 功能
//! - 收集包含 OUTCAR 的工作目录
//! - 并行执行
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::WorkDirCollector;
pub use runner::{BatchRunner, ProcessResult};
