//! # convert 子命令实现
//!
//! SPE 道计数文件转两列 CSV，支持单文件和目录批量模式。
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的 ConvertArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/spe.rs` 读取、`xrf/export.rs` 写出
//! - 使用 `utils/output.rs` 终端输出

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::convert::ConvertArgs;
use crate::error::{Result, XrfSimError};
use crate::models::{EnergyGrid, Spectrum};
use crate::parsers;
use crate::utils::output;
use crate::xrf::export;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header("SPE to CSV Conversion");

    if args.input.is_file() {
        execute_single_file(&args)
    } else if args.input.is_dir() {
        execute_batch(&args)
    } else {
        Err(XrfSimError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &ConvertArgs) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));

    // 输出参数带 .csv 扩展名时视作文件路径，否则视作目录
    let output_file = if args.output.extension().is_some() {
        args.output.clone()
    } else {
        fs::create_dir_all(&args.output).map_err(|e| XrfSimError::FileWriteError {
            path: args.output.display().to_string(),
            source: e,
        })?;
        args.output.join(output_name(&args.input))
    };

    convert_file(&args.input, &output_file, args)?;
    output::print_done(&format!(
        "{} -> {}",
        args.input.display(),
        output_file.display()
    ));
    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &ConvertArgs) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive);
    let files = collector.collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} SPE files", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| XrfSimError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| process_batch_file(file, args));

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 处理批量模式中的单个文件
fn process_batch_file(input: &PathBuf, args: &ConvertArgs) -> ProcessResult {
    let output_file = args.output.join(output_name(input));

    if output_file.exists() && !args.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    match convert_file(input, &output_file, args) {
        Ok(_) => ProcessResult::Success(format!("{} -> {}", input.display(), output_file.display())),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 单个 SPE 文件转 CSV
fn convert_file(input: &Path, output_path: &Path, args: &ConvertArgs) -> Result<()> {
    let counts = parsers::parse_spe_file(input)?;
    let grid = EnergyGrid::new(args.start, args.de, counts.len())?;
    let spectrum = Spectrum::new(grid, counts)?;
    export::to_csv(&spectrum, output_path)
}

/// 由输入文件名生成输出文件名
fn output_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    PathBuf::from(format!("{}.csv", stem))
}
