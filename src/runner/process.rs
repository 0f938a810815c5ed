//! # irssg 外部进程执行器
//!
//! 根据校验后的范围构造参数向量，在指定工作目录中启动 irssg，
//! 带墙钟超时等待，并捕获 stdout/stderr。
//!
//! ## 参数约定
//! ```text
//! irssg [-nk k_start k_end] [-nb band_start band_end]
//! ```
//! 某一维取完整范围时省略对应参数，使默认调用与 irssg 自身默认行为逐字节一致。
//!
//! 子进程退出后，输出管道最多再等到超时时限（至少 `DRAIN_GRACE`）。
//! 后台孙进程仍占着管道时，只保留已经读到的部分输出。
//!
//! ## 依赖关系
//! - 被 `runner/session.rs`, `commands/` 使用
//! - 使用 `runner/executable.rs` 检查可执行文件

use super::executable::check_executable;
use super::{DEFAULT_TIMEOUT, TIMEOUT_ERROR};
use crate::error::{IrssgError, Result};
use crate::models::{ExecutionRequest, ExecutionResult};

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// 轮询子进程状态的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// 子进程退出后等待输出管道关闭的最短时间
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// irssg 进程执行器
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: PathBuf,
    timeout: Duration,
}

impl ProcessRunner {
    /// 创建执行器，可执行文件缺失或不可执行时报错
    ///
    /// 路径会被规范化为绝对路径：子进程在工作目录中启动，
    /// 相对路径会按子进程的目录解析。
    pub fn new(executable: impl Into<PathBuf>) -> Result<Self> {
        let executable = executable.into();
        check_executable(&executable)?;
        let executable = fs::canonicalize(&executable).map_err(|e| IrssgError::FileReadError {
            path: executable.display().to_string(),
            source: e,
        })?;
        Ok(ProcessRunner {
            executable,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// 设置超时
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    /// 构造参数向量（第一个元素为可执行文件路径）
    pub fn build_command(&self, request: &ExecutionRequest) -> Vec<String> {
        let mut command = vec![self.executable.display().to_string()];

        if !request.is_full_k() {
            let (start, end) = request.k_range();
            command.extend(["-nk".to_string(), start.to_string(), end.to_string()]);
        }
        if !request.is_full_bands() {
            let (start, end) = request.band_range();
            command.extend(["-nb".to_string(), start.to_string(), end.to_string()]);
        }

        command
    }

    /// 在 `work_dir` 中执行 irssg
    ///
    /// 超时、非零退出码和启动失败都记录在返回值中，不作为错误返回。
    pub fn run(&self, request: &ExecutionRequest, work_dir: &Path) -> ExecutionResult {
        let command = self.build_command(request);
        tracing::debug!(
            command = %command.join(" "),
            work_dir = %work_dir.display(),
            timeout_s = self.timeout.as_secs_f64(),
            "launching irssg"
        );

        let started = Instant::now();
        let mut child = match Command::new(&self.executable)
            .args(&command[1..])
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let mut result = ExecutionResult::failed(
                    request,
                    command,
                    format!("Failed to start {}: {}", self.executable.display(), e),
                );
                result.elapsed = started.elapsed();
                return result;
            }
        };

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = match wait_with_timeout(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                terminate(&mut child);
                tracing::warn!(
                    "irssg timed out after {:.1} s in {}",
                    self.timeout.as_secs_f64(),
                    work_dir.display()
                );
                // 超时不收集部分输出，读取线程随管道关闭自行结束
                drop(stdout_reader);
                drop(stderr_reader);
                let mut result = ExecutionResult::failed(request, command, TIMEOUT_ERROR);
                result.elapsed = started.elapsed();
                return result;
            }
            Err(e) => {
                terminate(&mut child);
                let mut result = ExecutionResult::failed(
                    request,
                    command,
                    format!("Failed to wait for irssg: {}", e),
                );
                result.elapsed = started.elapsed();
                return result;
            }
        };

        let drain_deadline = (started + self.timeout).max(Instant::now() + DRAIN_GRACE);
        let stdout = decode_output(collect_capture(stdout_reader, drain_deadline));
        let stderr = decode_output(collect_capture(stderr_reader, drain_deadline));
        let return_code = status.code();
        let signal = exit_signal(&status);
        let success = return_code == Some(0);

        let error = if success {
            None
        } else if let Some(code) = return_code {
            Some(format!("Process exited with code {}", code))
        } else if let Some(sig) = signal {
            Some(format!("Process terminated by signal {}", sig))
        } else {
            Some("Process terminated abnormally".to_string())
        };

        tracing::debug!(?return_code, ?signal, elapsed = ?started.elapsed(), "irssg finished");

        ExecutionResult {
            success,
            stdout,
            stderr,
            return_code,
            signal,
            command,
            k_range: request.k_range(),
            band_range: request.band_range(),
            error,
            elapsed: started.elapsed(),
        }
    }
}

/// 把输出字节转为文本：先严格 UTF-8，失败时用替换字符
pub fn decode_output(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("output is not valid UTF-8 ({}), decoding lossily", e.utf8_error());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// 后台读取的管道输出
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    handle: JoinHandle<()>,
}

fn spawn_reader<R>(pipe: Option<R>) -> Option<Capture>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut pipe| {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let handle = thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => match sink.lock() {
                        Ok(mut out) => out.extend_from_slice(&chunk[..n]),
                        Err(_) => break,
                    },
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    // 读取错误时保留已读到的部分
                    Err(_) => break,
                }
            }
        });
        Capture { buf, handle }
    })
}

/// 等待管道关闭，到 `deadline` 仍未关闭时返回已读到的部分
fn collect_capture(capture: Option<Capture>, deadline: Instant) -> Vec<u8> {
    let Some(capture) = capture else {
        return Vec::new();
    };

    while !capture.handle.is_finished() {
        let now = Instant::now();
        if now >= deadline {
            tracing::warn!("output pipe still open after irssg exited, keeping partial output");
            return capture.buf.lock().map(|b| b.clone()).unwrap_or_default();
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }

    let _ = capture.handle.join();
    // 读取线程已结束，此时 Arc 只剩这一份
    match Arc::try_unwrap(capture.buf) {
        Ok(buf) => buf.into_inner().unwrap_or_default(),
        Err(buf) => buf.lock().map(|b| b.clone()).unwrap_or_default(),
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
