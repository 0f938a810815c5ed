//! # irssg 编排模块
//!
//! 从元数据到外部程序调用的完整流程：
//! 范围校验 → 可执行文件定位 → 进程执行 → 结果汇总。
//!
//! 工作目录总是直接传给进程启动调用，从不修改进程级的当前目录，
//! 因此多个线程可以同时在不同目录运行 irssg 而无需加锁。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/` 使用
//! - 使用 `models/`, `parsers/`
//! - 子模块: range, executable, process, aggregate, session

pub mod aggregate;
pub mod executable;
pub mod process;
pub mod range;
pub mod session;

pub use aggregate::ResultAggregator;
pub use executable::locate_executable;
pub use process::ProcessRunner;
pub use range::validate_all;
pub use session::{validate_inputs, InputPaths, Session};

use std::time::Duration;

/// 默认墙钟超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// 超时结果中的错误描述
pub const TIMEOUT_ERROR: &str = "Execution timeout";

#[cfg(all(test, unix))]
pub(crate) mod testutil {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// 写入文件并设置权限
    pub fn write_file(dir: &Path, name: &str, content: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    /// 写入一个 /bin/sh 脚本充当 irssg
    pub fn mock_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
        write_file(dir, name, &format!("#!/bin/sh\n{}\n", body), 0o755)
    }
}
