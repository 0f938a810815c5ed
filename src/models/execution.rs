//! # 外部程序执行数据模型
//!
//! - `RangeSpec`: 用户请求的 k 点 / 能带范围（未校验）
//! - `ExecutionRequest`: 通过校验的范围，只能由 `runner::range` 构造
//! - `ExecutionResult`: 一次 irssg 调用的结果记录
//!
//! ## 依赖关系
//! - 被 `runner/` 与 `commands/` 使用

use serde::Serialize;
use std::time::Duration;

/// 用户请求的范围，`None` 表示使用完整范围
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeSpec {
    pub k: Option<(usize, usize)>,
    pub bands: Option<(usize, usize)>,
}

impl RangeSpec {
    pub fn new(k: Option<(usize, usize)>, bands: Option<(usize, usize)>) -> Self {
        RangeSpec { k, bands }
    }

    /// 完整范围
    pub fn full() -> Self {
        RangeSpec::default()
    }
}

/// 校验后的执行请求（1 起始，闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionRequest {
    k_start: usize,
    k_end: usize,
    band_start: usize,
    band_end: usize,
    num_k: usize,
    num_bands: usize,
}

impl ExecutionRequest {
    /// 仅供范围校验器调用，调用方保证不变量成立
    pub(crate) fn new_unchecked(
        k: (usize, usize),
        bands: (usize, usize),
        num_k: usize,
        num_bands: usize,
    ) -> Self {
        ExecutionRequest {
            k_start: k.0,
            k_end: k.1,
            band_start: bands.0,
            band_end: bands.1,
            num_k,
            num_bands,
        }
    }

    pub fn k_range(&self) -> (usize, usize) {
        (self.k_start, self.k_end)
    }

    pub fn band_range(&self) -> (usize, usize) {
        (self.band_start, self.band_end)
    }

    /// k 范围是否覆盖全部 k 点
    pub fn is_full_k(&self) -> bool {
        self.k_start == 1 && self.k_end == self.num_k
    }

    /// 能带范围是否覆盖全部能带
    pub fn is_full_bands(&self) -> bool {
        self.band_start == 1 && self.band_end == self.num_bands
    }

    pub fn num_kpoints(&self) -> usize {
        self.k_end - self.k_start + 1
    }

    pub fn num_selected_bands(&self) -> usize {
        self.band_end - self.band_start + 1
    }
}

/// 一次 irssg 调用的结果
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// 返回码为 0 时为真
    pub success: bool,

    pub stdout: String,

    pub stderr: String,

    /// 进程返回码；超时或被信号终止时为空
    pub return_code: Option<i32>,

    /// 终止进程的信号（仅 Unix）
    pub signal: Option<i32>,

    /// 实际使用的参数向量
    pub command: Vec<String>,

    pub k_range: (usize, usize),

    pub band_range: (usize, usize),

    /// 失败描述
    pub error: Option<String>,

    /// 墙钟耗时
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ExecutionResult {
    /// 构造一个未产生输出的失败结果（超时、启动失败）
    pub fn failed(request: &ExecutionRequest, command: Vec<String>, error: impl Into<String>) -> Self {
        ExecutionResult {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            signal: None,
            command,
            k_range: request.k_range(),
            band_range: request.band_range(),
            error: Some(error.into()),
            elapsed: Duration::ZERO,
        }
    }

    /// 是否因超时失败
    pub fn is_timeout(&self) -> bool {
        self.error.as_deref() == Some(crate::runner::TIMEOUT_ERROR)
    }

    /// 命令行的可读形式
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}
