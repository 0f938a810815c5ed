//! # irssg 可执行文件定位
//!
//! 查找顺序：
//! 1. 显式给出的路径（`--irssg-path` 或环境变量 `IRSSG_PATH`）
//! 2. 系统 `PATH` 中的 `irssg`
//! 3. 相对当前目录的常见构建位置
//!
//! 自动查找时跳过以 `#!` 开头的脚本（同名的 Python 包装器）。
//!
//! ## 依赖关系
//! - 被 `runner/process.rs`, `commands/` 使用

use crate::error::{IrssgError, Result};
use std::env;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// 外部程序名
pub const EXECUTABLE_NAME: &str = "irssg";

/// 相对当前目录的候选位置
const FALLBACK_LOCATIONS: &[&str] = &[
    "irssg",
    "src_irssg/irssg",
    "../src_irssg/irssg",
    "../../src_irssg/irssg",
    "fortran/src/irssg",
    "../fortran/src/irssg",
    "../../fortran/src/irssg",
];

/// 定位 irssg 可执行文件
pub fn locate_executable(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        check_executable(path)?;
        return fs::canonicalize(path).map_err(|e| IrssgError::FileReadError {
            path: path.display().to_string(),
            source: e,
        });
    }

    let mut candidates = env::var_os("PATH")
        .map(|paths| path_candidates(&paths, EXECUTABLE_NAME))
        .unwrap_or_default();
    candidates.extend(FALLBACK_LOCATIONS.iter().map(PathBuf::from));

    let found = first_usable(candidates).ok_or_else(|| IrssgError::ExecutableNotFound {
        path: format!(
            "'{}' not found in PATH or default locations; use --irssg-path",
            EXECUTABLE_NAME
        ),
    })?;

    tracing::debug!(path = %found.display(), "located irssg executable");
    fs::canonicalize(&found).map_err(|e| IrssgError::FileReadError {
        path: found.display().to_string(),
        source: e,
    })
}

/// 检查文件存在且可执行
pub fn check_executable(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|_| IrssgError::ExecutableNotFound {
        path: path.display().to_string(),
    })?;

    if !meta.is_file() {
        return Err(IrssgError::ExecutableNotFound {
            path: path.display().to_string(),
        });
    }

    if !is_executable(&meta) {
        return Err(IrssgError::PermissionDenied {
            path: path.display().to_string(),
        });
    }

    Ok(())
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &fs::Metadata) -> bool {
    true
}

/// 候选列表中第一个可执行且不是脚本的文件
fn first_usable<I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    candidates
        .into_iter()
        .find(|p| check_executable(p).is_ok() && !is_script(p))
}

/// PATH 各目录下的同名候选，按顺序保留，交给 `first_usable` 过滤
fn path_candidates(paths: &OsStr, name: &str) -> Vec<PathBuf> {
    env::split_paths(paths).map(|dir| dir.join(name)).collect()
}

/// 首行以 `#!` 开头视为脚本；无法读取时按二进制处理
fn is_script(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut first = Vec::new();
    if BufReader::new(file).read_until(b'\n', &mut first).is_err() {
        return false;
    }
    first.starts_with(b"#!")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runner::testutil::{mock_executable, write_file};

    #[test]
    fn test_check_executable_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_executable(&dir.path().join("irssg")).unwrap_err();
        assert!(matches!(err, IrssgError::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_check_executable_not_runnable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "irssg", "binary", 0o644);
        let err = check_executable(&path).unwrap_err();
        assert!(matches!(err, IrssgError::PermissionDenied { .. }));
    }

    #[test]
    fn test_directory_is_not_executable() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_executable(dir.path()).unwrap_err();
        assert!(matches!(err, IrssgError::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_discovery_skips_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let script = mock_executable(dir.path(), "wrapper", "exit 0");
        let binary = write_file(dir.path(), "irssg", "\x7fELF fake", 0o755);

        assert!(is_script(&script));
        assert!(!is_script(&binary));
        assert_eq!(first_usable(vec![script, binary.clone()]), Some(binary));
    }

    #[test]
    fn test_path_search_continues_past_unusable_entries() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let third = tempfile::tempdir().unwrap();
        write_file(first.path(), "irssg", "\x7fELF fake", 0o644);
        mock_executable(second.path(), "irssg", "exit 0");
        let binary = write_file(third.path(), "irssg", "\x7fELF fake", 0o755);

        let paths =
            env::join_paths([first.path(), second.path(), third.path()]).unwrap();
        let candidates = path_candidates(&paths, "irssg");
        assert_eq!(candidates.len(), 3);
        assert_eq!(first_usable(candidates), Some(binary));
    }

    #[test]
    fn test_explicit_path_allows_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let script = mock_executable(dir.path(), "irssg", "exit 0");
        let resolved = locate_executable(Some(&script)).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("irssg"));
    }
}
