//! # lines 子命令 CLI 定义
//!
//! 查看单个元素的内置参考数据。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/lines.rs`

use clap::Args;

/// lines 子命令参数
#[derive(Args, Debug)]
pub struct LinesArgs {
    /// Element symbol or atomic number (e.g. "W" or "74")
    pub element: String,
}
