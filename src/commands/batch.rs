//! # batch 命令实现
//!
//! 在根目录下的每个计算目录中运行 irssg。
//!
//! ## 功能
//! - 收集包含 OUTCAR 的目录
//! - 每个目录独立打开会话、校验范围、执行
//! - 成功的输出写入 `<dir>/<output_name>`，失败的写入 `<dir>/<output_name>.failed`
//! - `--skip-existing` 时跳过已有成功输出的目录，失败的目录会重跑
//! - 汇总写入 CSV，失败项以表格列出
//!
//! ## 依赖关系
//! - 使用 `cli/batch.rs` 定义的参数
//! - 使用 `batch/`, `runner/`, `utils/output.rs`

use super::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::batch::{BatchRunner, ProcessResult, WorkDirCollector};
use crate::cli::batch::BatchArgs;
use crate::error::{IrssgError, Result};
use crate::models::RangeSpec;
use crate::runner::{locate_executable, InputPaths, ProcessRunner, ResultAggregator, Session};
use crate::utils::output;

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{Table, Tabled};

/// 失败运行的输出文件后缀
const FAILED_SUFFIX: &str = ".failed";

/// CSV 汇总记录
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub work_dir: String,
    pub title: String,
    pub num_k: usize,
    pub num_bands: usize,
    pub k_range: String,
    pub band_range: String,
    pub success: bool,
    pub return_code: Option<i32>,
    pub elapsed_s: f64,
    pub error: String,
}

impl BatchRecord {
    fn new(dir: &Path) -> Self {
        BatchRecord {
            work_dir: dir.display().to_string(),
            title: String::new(),
            num_k: 0,
            num_bands: 0,
            k_range: String::new(),
            band_range: String::new(),
            success: false,
            return_code: None,
            elapsed_s: 0.0,
            error: String::new(),
        }
    }
}

/// 失败项表格行
#[derive(Debug, Clone, Tabled)]
struct FailureRow {
    #[tabled(rename = "Directory")]
    dir: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// 执行 batch 命令
pub fn execute(args: BatchArgs, verbose: bool) -> Result<i32> {
    output::print_header("Batch IRSSG Runs");

    if !args.root.is_dir() {
        return Err(IrssgError::DirectoryNotFound {
            path: args.root.display().to_string(),
        });
    }

    let dirs = WorkDirCollector::new(&args.root)
        .with_marker(&args.files.outcar)
        .recursive(args.recursive)
        .collect();

    if dirs.is_empty() {
        output::print_warning(&format!(
            "No directories containing {} found under {}",
            args.files.outcar.display(),
            args.root.display()
        ));
        return Ok(EXIT_SUCCESS);
    }

    let executable = locate_executable(args.exec.irssg_path.as_deref())?;
    let runner =
        ProcessRunner::new(executable)?.timeout(Duration::from_secs(args.exec.timeout));
    let inputs = args.files.to_inputs();
    let spec = args.range.to_spec();

    // 调试日志与进度条会互相打断
    let batch = BatchRunner::new(args.jobs).show_progress(!verbose);
    output::print_info(&format!(
        "Found {} working directories, running with {} job(s)",
        dirs.len(),
        batch.jobs()
    ));

    let result = batch.run(dirs, |dir| {
        if args.skip_existing && has_successful_output(dir, &args.output_name) {
            return ProcessResult::Skipped(format!("{} already exists", args.output_name));
        }
        process_dir(dir, &inputs, &spec, &runner, &args.output_name)
    });

    write_summary(&result.records, &args.summary)?;
    output::print_success(&format!("Summary saved to '{}'", args.summary.display()));

    if !result.failures.is_empty() {
        output::print_header("Failed Runs");
        let rows: Vec<FailureRow> = result
            .failures
            .iter()
            .map(|(dir, error)| FailureRow {
                dir: dir.clone(),
                error: error.clone(),
            })
            .collect();
        println!("{}", Table::new(&rows));
    }

    output::print_separator();
    output::print_done(&format!(
        "Processed {} directories: {} succeeded, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));

    Ok(if result.failed == 0 {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}

/// 处理单个工作目录
fn process_dir(
    dir: &Path,
    inputs: &InputPaths,
    spec: &RangeSpec,
    runner: &ProcessRunner,
    output_name: &str,
) -> ProcessResult<BatchRecord> {
    let mut record = BatchRecord::new(dir);
    let fail = |mut record: BatchRecord, error: String| {
        record.error = error.clone();
        ProcessResult::Failed {
            path: record.work_dir.clone(),
            error,
            record: Some(record),
        }
    };

    let session = match Session::open(dir, inputs) {
        Ok(s) => s,
        Err(e) => return fail(record, e.to_string()),
    };
    record.title = session.metadata().title.clone();
    record.num_k = session.metadata().num_k;
    record.num_bands = session.metadata().num_bands;

    let request = match session.request(spec) {
        Ok(r) => r,
        Err(e) => return fail(record, e.to_string()),
    };

    let aggregator = ResultAggregator::new(session.execute(runner, &request));
    let outcome = aggregator.result();
    record.k_range = format_range(outcome.k_range);
    record.band_range = format_range(outcome.band_range);
    record.success = outcome.success;
    record.return_code = outcome.return_code;
    record.elapsed_s = outcome.elapsed.as_secs_f64();

    let (target, stale) = if record.success {
        (dir.join(output_name), failed_output(dir, output_name))
    } else {
        (failed_output(dir, output_name), dir.join(output_name))
    };
    if let Err(e) = aggregator.write_to(&target) {
        return fail(record, e.to_string());
    }
    // 上一次运行留下的另一种结果不再有效
    if stale.exists() {
        if let Err(e) = fs::remove_file(&stale) {
            tracing::warn!("could not remove stale {}: {}", stale.display(), e);
        }
    }

    match aggregator.into_result().error {
        Some(error) if !record.success => fail(record, error),
        _ => ProcessResult::Success(record),
    }
}

/// 失败运行的输出路径
fn failed_output(dir: &Path, output_name: &str) -> PathBuf {
    dir.join(format!("{}{}", output_name, FAILED_SUFFIX))
}

/// 目录中已有成功运行留下的输出
fn has_successful_output(dir: &Path, output_name: &str) -> bool {
    dir.join(output_name).is_file()
}

fn format_range((start, end): (usize, usize)) -> String {
    format!("{}-{}", start, end)
}

/// 写入 CSV 汇总
fn write_summary(records: &[BatchRecord], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| IrssgError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runner::testutil::mock_executable;
    use std::fs;

    const OUTCAR: &str = " k-points NKPTS 4 NBANDS 8\n";

    #[test]
    fn test_process_dir_success_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("OUTCAR"), OUTCAR).unwrap();
        let exe = mock_executable(bin.path(), "irssg", "echo irreps");
        let runner = ProcessRunner::new(&exe).unwrap();

        let result = process_dir(
            dir.path(),
            &InputPaths::default(),
            &RangeSpec::new(Some((2, 3)), None),
            &runner,
            "irssg.out",
        );

        match result {
            ProcessResult::Success(record) => {
                assert!(record.success);
                assert_eq!(record.k_range, "2-3");
                assert_eq!(record.band_range, "1-8");
                assert_eq!(record.return_code, Some(0));
            }
            other => panic!("expected success, got {:?}", other),
        }
        let text = fs::read_to_string(dir.path().join("irssg.out")).unwrap();
        assert_eq!(text, "irreps\n");
    }

    #[test]
    fn test_process_dir_range_error_keeps_record() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("OUTCAR"), OUTCAR).unwrap();
        let exe = mock_executable(bin.path(), "irssg", "exit 0");
        let runner = ProcessRunner::new(&exe).unwrap();

        let result = process_dir(
            dir.path(),
            &InputPaths::default(),
            &RangeSpec::new(Some((1, 9)), None),
            &runner,
            "irssg.out",
        );

        match result {
            ProcessResult::Failed { error, record, .. } => {
                assert!(error.contains("k_end"));
                let record = record.unwrap();
                assert_eq!(record.num_k, 4);
                assert!(!record.success);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(!dir.path().join("irssg.out").exists());
    }

    #[test]
    fn test_failed_run_is_not_skipped_on_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("OUTCAR"), OUTCAR).unwrap();
        let failing = mock_executable(bin.path(), "irssg", "echo broken >&2\nexit 7");
        let runner = ProcessRunner::new(&failing).unwrap();

        let result = process_dir(
            dir.path(),
            &InputPaths::default(),
            &RangeSpec::full(),
            &runner,
            "irssg.out",
        );
        assert!(matches!(result, ProcessResult::Failed { .. }));
        assert!(!dir.path().join("irssg.out").exists());
        let failed = fs::read_to_string(dir.path().join("irssg.out.failed")).unwrap();
        assert!(failed.contains("broken"));
        assert!(!has_successful_output(dir.path(), "irssg.out"));

        // 修好之后重跑，失败记录被成功输出取代
        let fixed_bin = tempfile::tempdir().unwrap();
        let fixed = mock_executable(fixed_bin.path(), "irssg", "echo irreps");
        let runner = ProcessRunner::new(&fixed).unwrap();
        let result = process_dir(
            dir.path(),
            &InputPaths::default(),
            &RangeSpec::full(),
            &runner,
            "irssg.out",
        );
        assert!(matches!(result, ProcessResult::Success(_)));
        assert!(has_successful_output(dir.path(), "irssg.out"));
        assert!(!dir.path().join("irssg.out.failed").exists());
    }

    #[test]
    fn test_write_summary_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let mut record = BatchRecord::new(Path::new("calc1"));
        record.num_k = 4;
        record.success = true;
        record.return_code = Some(0);

        write_summary(&[record], &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("work_dir,title,num_k"));
        assert!(lines.next().unwrap().starts_with("calc1,,4,"));
    }
}
