//! # 批量执行器
//!
//! 在多个工作目录中并行运行 irssg。
//!
//! 每个任务在自己的工作目录中启动子进程，工作目录通过进程启动参数传入，
//! 不共享任何可变全局状态，所以可以直接放进 rayon 线程池。
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::utils::progress;

use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 单个目录处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult<T> {
    /// 处理成功
    Success(T),
    /// 跳过
    Skipped(String),
    /// 处理失败，可附带部分记录
    Failed {
        path: String,
        error: String,
        record: Option<T>,
    },
}

/// 批量处理结果统计
#[derive(Debug)]
pub struct BatchResult<T> {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情 (目录, 错误信息)
    pub failures: Vec<(String, String)>,
    /// 按输入顺序排列的记录
    pub records: Vec<T>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        BatchResult {
            success: 0,
            skipped: 0,
            failed: 0,
            failures: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl<T> BatchResult<T> {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult<T>) {
        match result {
            ProcessResult::Success(record) => {
                self.success += 1;
                self.records.push(record);
            }
            ProcessResult::Skipped(reason) => {
                tracing::debug!("skipped: {}", reason);
                self.skipped += 1;
            }
            ProcessResult::Failed {
                path,
                error,
                record,
            } => {
                self.failed += 1;
                self.failures.push((path, error));
                self.records.extend(record);
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    /// 是否显示进度条
    show_progress: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs == 0` 时使用全部 CPU
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            show_progress: true,
        }
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理目录列表
    pub fn run<T, F>(&self, dirs: Vec<PathBuf>, processor: F) -> BatchResult<T>
    where
        T: Send,
        F: Fn(&Path) -> ProcessResult<T> + Sync + Send,
    {
        let pb = if self.show_progress {
            progress::create_progress_bar(dirs.len() as u64, "Running irssg")
        } else {
            progress::hidden()
        };

        let work = |dir: &PathBuf| {
            let result = processor(dir.as_path());
            pb.inc(1);
            result
        };

        // 线程池创建失败时退回全局池
        let results: Vec<ProcessResult<T>> =
            match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
                Ok(pool) => pool.install(|| dirs.par_iter().map(work).collect()),
                Err(e) => {
                    tracing::warn!("could not build thread pool ({}), using global pool", e);
                    dirs.par_iter().map(work).collect()
                }
            };

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }
        batch_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_counts_and_records() {
        let mut result: BatchResult<u32> = BatchResult::default();
        result.merge(ProcessResult::Success(1));
        result.merge(ProcessResult::Skipped("x".to_string()));
        result.merge(ProcessResult::Failed {
            path: "d".to_string(),
            error: "boom".to_string(),
            record: Some(2),
        });
        result.merge(ProcessResult::Failed {
            path: "e".to_string(),
            error: "bad".to_string(),
            record: None,
        });

        assert_eq!(result.total(), 4);
        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 2);
        assert_eq!(result.records, vec![1, 2]);
        assert_eq!(result.failures[1].1, "bad");
    }

    #[test]
    fn test_run_preserves_order() {
        let dirs: Vec<PathBuf> = (0..16).map(|i| PathBuf::from(format!("d{:02}", i))).collect();
        let runner = BatchRunner::new(4).show_progress(false);

        let result = runner.run(dirs, |dir| {
            let name = dir.display().to_string();
            if name.ends_with('3') {
                ProcessResult::Failed {
                    path: name,
                    error: "odd".to_string(),
                    record: None,
                }
            } else {
                ProcessResult::Success(name)
            }
        });

        assert_eq!(result.total(), 16);
        assert_eq!(result.failed, 2);
        assert_eq!(result.records[0], "d00");
        assert_eq!(result.records.last().map(String::as_str), Some("d15"));
    }
}
