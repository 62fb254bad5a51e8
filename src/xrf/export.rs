//! # 谱数据导出
//!
//! 导出谱到两列 CSV 和定宽 SPE 道计数文本格式。
//!
//! ## 支持格式
//! - CSV: energy_kev, counts 两列
//! - SPE: `$DATA:` 头、`0   <最大道址>` 范围行、每行 6 或 10 个道计数，
//!   末尾不满一行也照常刷出 —— 下游转换器按此格式逐字解析
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 和 `commands/convert.rs` 调用
//! - 使用 `models/spectrum.rs` 的 Spectrum
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{Result, XrfSimError};
use crate::models::Spectrum;

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// 导出谱为两列 CSV
pub fn to_csv(spectrum: &Spectrum, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(XrfSimError::CsvError)?;

    wtr.write_record(["energy_kev", "counts"])
        .map_err(XrfSimError::CsvError)?;

    let grid = spectrum.grid();
    for i in 0..grid.len() {
        wtr.write_record(&[
            format!("{:.4}", grid.energy(i)),
            format!("{:.6}", spectrum.intensity(i)),
        ])
        .map_err(XrfSimError::CsvError)?;
    }

    wtr.flush().map_err(|e| XrfSimError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出谱为 SPE 道计数格式
///
/// 道计数四舍五入为整数；`counts_per_line` 只允许 6 或 10。
pub fn to_spe(spectrum: &Spectrum, output_path: &Path, counts_per_line: usize) -> Result<()> {
    let body = spe_body(spectrum.intensities(), counts_per_line)?;
    let mut file = File::create(output_path).map_err(|e| XrfSimError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    file.write_all(body.as_bytes())
        .map_err(|e| XrfSimError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        })?;
    Ok(())
}

/// 生成 SPE 文本内容
///
/// 与下游转换器约定的逐字格式：值之间四个空格，
/// 每满 `counts_per_line` 个值换行，最后的不满行同样换行收尾。
fn spe_body(counts: &[f64], counts_per_line: usize) -> Result<String> {
    if counts_per_line != 6 && counts_per_line != 10 {
        return Err(XrfSimError::InvalidArgument(format!(
            "SPE counts per line must be 6 or 10, got {}",
            counts_per_line
        )));
    }
    let n = counts.len();
    let mut out = String::new();
    out.push_str("$DATA:\n");
    out.push_str(&format!("0   {}\n", n.saturating_sub(1)));
    for (i, &value) in counts.iter().enumerate() {
        let rounded = value.round().max(0.0) as u64;
        if (i + 1) % counts_per_line == 0 || i == n - 1 {
            out.push_str(&format!("{}\n", rounded));
        } else {
            out.push_str(&format!("{}    ", rounded));
        }
    }
    Ok(out)
}
