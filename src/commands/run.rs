//! # run 命令实现
//!
//! ## 流程
//! 1. 检查 OUTCAR / WAVECAR
//! 2. 读取元数据（OUTCAR 为准，WAVECAR 交叉核对）
//! 3. 校验 k 点 / 能带范围
//! 4. 定位 irssg 并在工作目录中执行
//! 5. 输出到终端或文件
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `runner/`, `utils/output.rs`, `utils/progress.rs`

use super::{is_interrupted, EXIT_FAILURE, EXIT_INTERRUPTED, EXIT_SUCCESS};
use crate::cli::run::RunArgs;
use crate::error::Result;
use crate::models::ExecutionResult;
use crate::runner::{
    locate_executable, validate_all, validate_inputs, ProcessRunner, ResultAggregator, Session,
};
use crate::utils::{output, progress};

use std::time::Duration;

/// 执行 run 命令
pub fn execute(args: RunArgs, verbose: bool) -> Result<i32> {
    output::print_header("IRSSG - Irreducible Representations of Space Groups");

    let inputs = args.files.to_inputs();
    validate_inputs(&args.work_dir, &inputs)?;
    let session = Session::open(&args.work_dir, &inputs)?;
    if verbose {
        output::print_info(&format!("Working directory: {}", session.work_dir().display()));
    }
    super::info::print_metadata_summary(&session);

    let spec = args.range.to_spec();

    if args.validate_only {
        let problems = validate_all(&spec, session.metadata());
        if problems.is_empty() {
            output::print_success("Input files and requested ranges are valid");
            return Ok(EXIT_SUCCESS);
        }
        for problem in &problems {
            output::print_error(&problem.to_string());
        }
        return Ok(EXIT_FAILURE);
    }

    let request = session.request(&spec)?;
    let executable = locate_executable(args.exec.irssg_path.as_deref())?;
    let runner =
        ProcessRunner::new(executable)?.timeout(Duration::from_secs(args.exec.timeout));

    let (k_start, k_end) = request.k_range();
    let (b_start, b_end) = request.band_range();
    output::print_info(&format!(
        "K-point range: {}-{} ({} k-points)  Band range: {}-{} ({} bands)",
        k_start,
        k_end,
        request.num_kpoints(),
        b_start,
        b_end,
        request.num_selected_bands()
    ));
    if verbose {
        output::print_info(&format!(
            "Executable: {}  Timeout: {} s",
            runner.executable().display(),
            runner.timeout_duration().as_secs()
        ));
    }
    output::print_info(&format!(
        "Running: {}",
        runner.build_command(&request).join(" ")
    ));

    let spinner = progress::create_spinner("Running IRSSG...");
    let result = session.execute(&runner, &request);
    spinner.finish_and_clear();

    let aggregator = ResultAggregator::new(result);
    match args.output {
        Some(ref path) => {
            aggregator.write_to(path)?;
            output::print_success(&format!("Output written to '{}'", path.display()));
        }
        None => print_captured(aggregator.result()),
    }

    Ok(report(aggregator.result()))
}

/// 把捕获的输出打印到终端
fn print_captured(result: &ExecutionResult) {
    if !result.stdout.is_empty() {
        print!("{}", result.stdout);
        if !result.stdout.ends_with('\n') {
            println!();
        }
    }
    if !result.stderr.is_empty() {
        eprintln!("STDERR:");
        eprint!("{}", result.stderr);
        if !result.stderr.ends_with('\n') {
            eprintln!();
        }
    }
}

/// 打印结论并给出退出码
fn report(result: &ExecutionResult) -> i32 {
    output::print_separator();
    if result.success {
        output::print_done(&format!(
            "IRSSG finished in {:.1} s",
            result.elapsed.as_secs_f64()
        ));
        return EXIT_SUCCESS;
    }

    if is_interrupted(result.signal) {
        output::print_warning("Calculation interrupted by user");
        return EXIT_INTERRUPTED;
    }

    if result.is_timeout() {
        output::print_error(&format!(
            "IRSSG did not finish within {:.0} s and was killed",
            result.elapsed.as_secs_f64()
        ));
        return EXIT_FAILURE;
    }

    let reason = result.error.as_deref().unwrap_or("unknown failure");
    output::print_error(&format!("IRSSG failed: {}", reason));
    output::print_info(&format!("Command: {}", result.command_line()));
    EXIT_FAILURE
}
