//! # 工作目录收集器
//!
//! 在根目录下查找包含 OUTCAR 的计算目录。
//!
//! ## 功能
//! - 根目录本身也参与匹配
//! - 可选递归搜索
//! - 自定义标记文件名（对应 `--outcar`）
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `walkdir` 遍历目录

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 工作目录收集器
pub struct WorkDirCollector {
    /// 根目录
    root: PathBuf,
    /// 标记文件名
    marker: PathBuf,
    /// 是否递归
    recursive: bool,
}

impl WorkDirCollector {
    /// 创建新的收集器，默认以 OUTCAR 为标记
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            marker: PathBuf::from("OUTCAR"),
            recursive: false,
        }
    }

    /// 设置标记文件名
    pub fn with_marker(mut self, marker: impl Into<PathBuf>) -> Self {
        self.marker = marker.into();
        self
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有包含标记文件的目录（排序后返回）
    pub fn collect(&self) -> Vec<PathBuf> {
        if !self.root.is_dir() {
            return vec![];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut dirs: Vec<PathBuf> = WalkDir::new(&self.root)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter(|e| self.is_work_dir(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        dirs.sort();
        dirs
    }

    fn is_work_dir(&self, dir: &Path) -> bool {
        dir.join(&self.marker).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_collect_immediate_subdirs() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("b/OUTCAR"));
        touch(&root.path().join("a/OUTCAR"));
        touch(&root.path().join("c/POSCAR"));
        touch(&root.path().join("a/deep/OUTCAR"));

        let dirs = WorkDirCollector::new(root.path()).collect();
        assert_eq!(dirs, vec![root.path().join("a"), root.path().join("b")]);
    }

    #[test]
    fn test_collect_recursive_includes_root() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("OUTCAR"));
        touch(&root.path().join("x/y/z/OUTCAR"));

        let dirs = WorkDirCollector::new(root.path()).recursive(true).collect();
        assert_eq!(
            dirs,
            vec![root.path().to_path_buf(), root.path().join("x/y/z")]
        );
    }

    #[test]
    fn test_custom_marker() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("run1/OUTCAR.band"));
        touch(&root.path().join("run2/OUTCAR"));

        let dirs = WorkDirCollector::new(root.path())
            .with_marker("OUTCAR.band")
            .collect();
        assert_eq!(dirs, vec![root.path().join("run1")]);
    }

    #[test]
    fn test_missing_root() {
        let root = tempfile::tempdir().unwrap();
        assert!(WorkDirCollector::new(root.path().join("nope")).collect().is_empty());
    }
}
