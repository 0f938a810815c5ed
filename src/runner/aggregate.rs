//! # 执行结果汇总
//!
//! 包装 `ExecutionResult`，可选地把输出写入文件：
//! stdout 原样写入；stderr 非空时在分隔行之后原样追加。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/batch.rs` 使用

use crate::error::{IrssgError, Result};
use crate::models::ExecutionResult;

use std::fs;
use std::path::Path;

/// stderr 段的分隔行
pub const STDERR_DELIMITER: &str = "===== STDERR =====";

/// 执行结果汇总器
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    result: ExecutionResult,
}

impl ResultAggregator {
    pub fn new(result: ExecutionResult) -> Self {
        ResultAggregator { result }
    }

    pub fn result(&self) -> &ExecutionResult {
        &self.result
    }

    pub fn into_result(self) -> ExecutionResult {
        self.result
    }

    /// 生成写入文件的文本
    pub fn render(&self) -> String {
        let mut text = self.result.stdout.clone();
        if !self.result.stderr.is_empty() {
            text.push('\n');
            text.push_str(STDERR_DELIMITER);
            text.push('\n');
            text.push_str(&self.result.stderr);
        }
        text
    }

    /// 写入输出文件
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| IrssgError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "wrote irssg output");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result(stdout: &str, stderr: &str) -> ExecutionResult {
        ExecutionResult {
            success: true,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            return_code: Some(0),
            signal: None,
            command: vec!["irssg".to_string()],
            k_range: (1, 2),
            band_range: (1, 4),
            error: None,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_render_stdout_only() {
        let agg = ResultAggregator::new(result("  k-point 1: GM  \n", ""));
        assert_eq!(agg.render(), "  k-point 1: GM  \n");
        assert!(!agg.render().contains(STDERR_DELIMITER));
    }

    #[test]
    fn test_render_with_stderr_section() {
        let agg = ResultAggregator::new(result("out\n", "warning: x\n"));
        assert_eq!(agg.render(), "out\n\n===== STDERR =====\nwarning: x\n");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("irssg.out");
        let agg = ResultAggregator::new(result("line1\nline2", "err"));
        agg.write_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("line1\nline2\n"));
        assert!(text.ends_with("===== STDERR =====\nerr"));
        assert_eq!(agg.into_result().k_range, (1, 2));
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let agg = ResultAggregator::new(result("x", ""));
        let err = agg.write_to(&dir.path().join("no/such/file")).unwrap_err();
        assert!(matches!(err, IrssgError::FileWriteError { .. }));
    }
}
