//! # 统一错误处理模块
//!
//! 定义 xrfsim 的所有错误类型，使用 `thiserror` 派生。
//!
//! 数值域内的异常（除零、越界能量、低于阈值的谱线）不走错误通道，
//! 按守卫替换规则就地归零或截断；这里只收集边界校验和 I/O 失败。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xrfsim 统一错误类型
#[derive(Error, Debug)]
pub enum XrfSimError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} input: {input}\nReason: {reason}")]
    ParseError {
        format: String,
        input: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 物理模型边界校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("Invalid material composition: {0}")]
    InvalidComposition(String),

    #[error("Invalid energy grid: {0}")]
    InvalidGrid(String),

    #[error("Spectra are defined on different energy grids: {0}")]
    GridMismatch(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XrfSimError>;
