//! # 统一错误处理模块
//!
//! 定义 irssg-runner 的所有错误类型，使用 `thiserror` 派生。
//!
//! 结构性错误（文件缺失、范围非法、解析失败）在启动外部进程之前立即返回；
//! 外部进程的超时与非零退出码不在此处，而是作为数据记录在
//! `ExecutionResult` 中。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// irssg-runner 统一错误类型
#[derive(Error, Debug)]
pub enum IrssgError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 外部程序错误
    // ─────────────────────────────────────────────────────────────
    #[error("IRSSG executable not found: {path}")]
    ExecutableNotFound { path: String },

    #[error("IRSSG executable is not executable: {path}")]
    PermissionDenied { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path} (line {line})\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        line: usize,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("{bound} = {value} is out of range, valid interval is [{min}, {max}]")]
    OutOfRange {
        bound: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, IrssgError>;
