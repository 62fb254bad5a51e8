//! # xrfsim - X 射线荧光谱正向模拟工具箱
//!
//! 预测给定管球、光路几何与样品组成下到达探测器的 X 射线谱：
//! 连续谱与特征峰、荧光（含二次增强）、瑞利与康普顿散射、
//! 任意材料路径的衰减，以及探测器能量分辨率展宽。
//!
//! ## 子命令
//! - `simulate` - 运行正向模拟管线，导出 CSV/SPE 谱
//! - `convert`  - SPE 道计数文件批量转 CSV
//! - `lines`    - 查看元素内置参考数据
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   ├── xrf/        (四阶段模拟管线)
//!   ├── atomic/     (原子数据提供层)
//!   ├── models/     (值类型数据模型)
//!   ├── parsers/    (边界输入解析)
//!   ├── geometry/   (立体角工具)
//!   ├── batch/      (并行批量处理)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod atomic;
mod batch;
mod cli;
mod commands;
mod error;
mod geometry;
mod models;
mod parsers;
mod utils;
mod xrf;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
