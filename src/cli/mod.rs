//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `simulate`: 运行正向模拟管线，输出预测谱
//! - `convert`: SPE 道计数文件转 CSV（支持目录批量）
//! - `lines`: 查看元素的内置参考数据
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: simulate, convert, lines

pub mod convert;
pub mod lines;
pub mod simulate;

use clap::{Parser, Subcommand};

/// xrfsim - X 射线荧光谱正向模拟工具箱
#[derive(Parser)]
#[command(name = "xrfsim")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "An X-ray fluorescence spectrum simulation toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Simulate the tube -> filter -> sample -> detector pipeline
    Simulate(simulate::SimulateArgs),

    /// Convert SPE channel-count files to two-column CSV
    Convert(convert::ConvertArgs),

    /// Show bundled reference data for an element
    Lines(lines::LinesArgs),
}
