//! # 空间群参考数据
//!
//! irssg 从环境变量 `IRSSG_DATA` 指向的目录读取小群数据，
//! 文件按空间群编号命名：
//!
//! ```text
//! $IRSSG_DATA/kLittleGroups/kLG_1.data
//! $IRSSG_DATA/kLittleGroups/kLG_2.data
//! ...
//! ```
//!
//! 这里只按名称访问，不解析文件内容。
//!
//! ## 依赖关系
//! - 被 `commands/space_groups.rs` 使用
//! - 使用 `glob` 枚举文件，`regex` 解析编号

use crate::error::{IrssgError, Result};
use regex::Regex;
use std::env;
use std::path::{Path, PathBuf};

/// 数据目录环境变量
pub const DATA_ENV: &str = "IRSSG_DATA";

/// 小群数据子目录
const LITTLE_GROUP_DIR: &str = "kLittleGroups";

/// 空间群编号上限
pub const MAX_SPACE_GROUP: u32 = 230;

/// 空间群数据目录
#[derive(Debug, Clone)]
pub struct SpaceGroupStore {
    root: PathBuf,
}

impl SpaceGroupStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(IrssgError::DirectoryNotFound {
                path: root.display().to_string(),
            });
        }
        Ok(SpaceGroupStore { root })
    }

    /// 从 `IRSSG_DATA` 读取根目录
    pub fn from_env() -> Result<Self> {
        let root = env::var_os(DATA_ENV).ok_or_else(|| {
            IrssgError::InvalidArgument(format!(
                "{} is not set; point it at the IRSSG data directory",
                DATA_ENV
            ))
        })?;
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 指定空间群的数据文件路径（不检查是否存在）
    pub fn path_for(&self, space_group: u32) -> PathBuf {
        self.root
            .join(LITTLE_GROUP_DIR)
            .join(format!("kLG_{}.data", space_group))
    }

    /// 列出可用的空间群编号（升序）
    pub fn list(&self) -> Result<Vec<u32>> {
        let dir = self.root.join(LITTLE_GROUP_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let pattern = format!(
            "{}/kLG_*.data",
            glob::Pattern::escape(&dir.display().to_string())
        );
        let name_re = Regex::new(r"^kLG_(\d+)\.data$").map_err(|e| IrssgError::Other(e.to_string()))?;

        let entries = glob::glob(&pattern).map_err(|e| {
            IrssgError::InvalidArgument(format!("invalid data directory pattern: {}", e))
        })?;

        let mut groups: Vec<u32> = entries
            .filter_map(|e| e.ok())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?;
                let caps = name_re.captures(name)?;
                caps[1].parse().ok()
            })
            .collect();

        groups.sort_unstable();
        groups.dedup();
        Ok(groups)
    }

    /// 是否有指定空间群的数据
    pub fn contains(&self, space_group: u32) -> bool {
        (1..=MAX_SPACE_GROUP).contains(&space_group) && self.path_for(space_group).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store_with(files: &[&str]) -> (tempfile::TempDir, SpaceGroupStore) {
        let dir = tempfile::tempdir().unwrap();
        let lg = dir.path().join(LITTLE_GROUP_DIR);
        fs::create_dir_all(&lg).unwrap();
        for f in files {
            fs::write(lg.join(f), "data").unwrap();
        }
        let store = SpaceGroupStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_list_sorted_and_filtered() {
        let (_dir, store) = store_with(&[
            "kLG_191.data",
            "kLG_2.data",
            "kLG_47.data",
            "kLG_abc.data",
            "kLG_12.data.bak",
            "README",
        ]);
        assert_eq!(store.list().unwrap(), vec![2, 47, 191]);
    }

    #[test]
    fn test_contains() {
        let (_dir, store) = store_with(&["kLG_166.data"]);
        assert!(store.contains(166));
        assert!(!store.contains(167));
        assert!(!store.contains(0));
    }

    #[test]
    fn test_missing_subdir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SpaceGroupStore::new(dir.path()).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpaceGroupStore::new(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, IrssgError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_path_for() {
        let (dir, store) = store_with(&[]);
        assert_eq!(
            store.path_for(225),
            dir.path().join("kLittleGroups").join("kLG_225.data")
        );
    }
}
