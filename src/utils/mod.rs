//! # 工具函数模块
//!
//! 提供美化输出、进度条与空间群数据目录访问。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/` 模块使用
//! - 子模块: output, progress, space_groups

pub mod output;
pub mod progress;
pub mod space_groups;
