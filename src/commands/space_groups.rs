//! # space-groups 命令实现
//!
//! 列出 `$IRSSG_DATA/kLittleGroups` 下可用的空间群编号，或检查单个编号。
//!
//! ## 依赖关系
//! - 使用 `cli/space_groups.rs` 定义的参数
//! - 使用 `utils/space_groups.rs`, `utils/output.rs`

use super::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::cli::space_groups::SpaceGroupsArgs;
use crate::error::Result;
use crate::utils::output;
use crate::utils::space_groups::SpaceGroupStore;

/// 每行显示的编号数
const PER_LINE: usize = 12;

/// 执行 space-groups 命令
pub fn execute(args: SpaceGroupsArgs) -> Result<i32> {
    let store = match args.data_dir {
        Some(dir) => SpaceGroupStore::new(dir)?,
        None => SpaceGroupStore::from_env()?,
    };

    if let Some(sg) = args.check {
        return Ok(if store.contains(sg) {
            output::print_success(&format!(
                "Space group {}: data available at {}",
                sg,
                store.path_for(sg).display()
            ));
            EXIT_SUCCESS
        } else {
            output::print_warning(&format!(
                "Space group {}: no data in {}",
                sg,
                store.root().display()
            ));
            EXIT_FAILURE
        });
    }

    let groups = store.list()?;
    if groups.is_empty() {
        output::print_warning(&format!(
            "No space-group data found under {}",
            store.root().display()
        ));
        return Ok(EXIT_SUCCESS);
    }

    output::print_info("Available space group numbers:");
    for chunk in groups.chunks(PER_LINE) {
        let line: Vec<String> = chunk.iter().map(|n| format!("{:>4}", n)).collect();
        println!("  {}", line.join(""));
    }
    output::print_done(&format!("{} space groups available", groups.len()));

    Ok(EXIT_SUCCESS)
}
