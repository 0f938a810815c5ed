//! # 美化输出工具
//!
//! 面向用户的状态行统一写到 stderr，stdout 只留给 irssg 的输出、
//! 元数据表格与键值字段，这样 `irssg-runner run > result.txt` 得到的
//! 就是 irssg 本身的输出。诊断日志走 `tracing`。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};

/// 标题栏与分隔线宽度
const RULE_WIDTH: usize = 60;

/// 状态行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    Warning,
    Info,
    Done,
}

impl Status {
    /// 行首标记
    pub fn tag(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Error => "[ERR]",
            Status::Warning => "[WARN]",
            Status::Info => "[*]",
            Status::Done => "[DONE]",
        }
    }

    fn styled(self) -> ColoredString {
        let tag = self.tag();
        match self {
            Status::Ok | Status::Done => tag.green().bold(),
            Status::Error => tag.red().bold(),
            Status::Warning => tag.yellow().bold(),
            Status::Info => tag.blue().bold(),
        }
    }
}

/// 打印一行状态消息
pub fn print_status(status: Status, msg: &str) {
    eprintln!("{} {}", status.styled(), msg);
}

pub fn print_success(msg: &str) {
    print_status(Status::Ok, msg);
}

pub fn print_error(msg: &str) {
    print_status(Status::Error, msg);
}

pub fn print_warning(msg: &str) {
    print_status(Status::Warning, msg);
}

pub fn print_info(msg: &str) {
    print_status(Status::Info, msg);
}

pub fn print_done(msg: &str) {
    print_status(Status::Done, msg);
}

/// 打印键值对（缩进，键名对齐）
pub fn print_field(key: &str, value: &str) {
    println!("{}", format_field(key, value));
}

fn format_field(key: &str, value: &str) -> String {
    format!("    {:<22} {}", format!("{}:", key).dimmed(), value)
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let rule = rule();
    eprintln!("\n{}\n  {}\n{}\n", rule, title.bold(), rule);
}

/// 打印分隔线
pub fn print_separator() {
    eprintln!("{}", rule());
}

fn rule() -> ColoredString {
    "─".repeat(RULE_WIDTH).dimmed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tags() {
        assert_eq!(Status::Ok.tag(), "[OK]");
        assert_eq!(Status::Error.tag(), "[ERR]");
        assert_eq!(Status::Warning.tag(), "[WARN]");
        assert_eq!(Status::Info.tag(), "[*]");
        assert_eq!(Status::Done.tag(), "[DONE]");
    }

    #[test]
    fn test_field_alignment() {
        colored::control::set_override(false);
        assert_eq!(format_field("Bands", "20"), format!("    {:<22} 20", "Bands:"));
    }
}
