//! # SPE 道计数文件解析器
//!
//! 读取定宽 SPE 文本：`$DATA:` 标记行、`0  <最大道址>` 范围行，
//! 之后的空白分隔数值按道址顺序收集，读满或读尽为止。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 无外部模块依赖

use std::fs;
use std::path::Path;

use crate::error::{Result, XrfSimError};

/// 解析 SPE 文件，返回按道址排列的计数
pub fn parse_spe_file(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path).map_err(|e| XrfSimError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_spe_text(&text).map_err(|reason| XrfSimError::ParseError {
        format: "SPE".to_string(),
        input: path.display().to_string(),
        reason,
    })
}

fn parse_spe_text(text: &str) -> std::result::Result<Vec<f64>, String> {
    let mut in_data = false;
    let mut n_channels: Option<usize> = None;
    let mut counts: Vec<f64> = Vec::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        if !in_data {
            if fields.len() == 1 && fields[0] == "$DATA:" {
                in_data = true;
            }
            continue;
        }

        match n_channels {
            None => {
                // $DATA: 之后的第一行必须是 "0  <max>" 范围行
                if fields.len() >= 2 && fields[0] == "0" {
                    let max: usize = fields[1]
                        .parse()
                        .map_err(|_| format!("invalid channel range line: '{}'", line.trim()))?;
                    n_channels = Some(max + 1);
                    counts.reserve(max + 1);
                } else {
                    return Err(format!(
                        "expected channel range line after $DATA:, got '{}'",
                        line.trim()
                    ));
                }
            }
            Some(n) => {
                for field in fields {
                    if counts.len() >= n {
                        break;
                    }
                    let value: f64 = field
                        .parse()
                        .map_err(|_| format!("invalid channel count '{}'", field))?;
                    counts.push(value);
                }
            }
        }
    }

    match n_channels {
        None => Err("no $DATA: section found".to_string()),
        Some(n) if counts.len() < n => Err(format!(
            "expected {} channel counts, found {}",
            n,
            counts.len()
        )),
        Some(_) => Ok(counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_spe() {
        let text = "$DATA:\n0   7\n0    1    2    3    4    5\n6    7\n";
        let counts = parse_spe_text(text).unwrap();
        assert_eq!(counts, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_parse_skips_leading_metadata() {
        let text = "$SPEC_ID:\nsome header\n$MEAS_TIM:\n6 6\n$DATA:\n0 3\n10 20 30 40\n";
        let counts = parse_spe_text(text).unwrap();
        assert_eq!(counts, vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_parse_rejects_missing_data_section() {
        assert!(parse_spe_text("1 2 3\n").is_err());
    }

    #[test]
    fn test_parse_rejects_truncated_counts() {
        let text = "$DATA:\n0 9\n1 2 3\n";
        assert!(parse_spe_text(text).is_err());
    }

    #[test]
    fn test_parse_ignores_trailing_values() {
        let text = "$DATA:\n0 2\n1 2 3 4 5\n";
        let counts = parse_spe_text(text).unwrap();
        assert_eq!(counts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_roundtrip_with_spe_writer() {
        use crate::models::{EnergyGrid, Spectrum};
        use crate::xrf::export;

        let grid = EnergyGrid::new(0.0, 0.02, 14).unwrap();
        let values: Vec<f64> = (0..14).map(|i| (i * 3) as f64).collect();
        let spectrum = Spectrum::new(grid, values.clone()).unwrap();

        let dir = std::env::temp_dir().join("xrfsim_spe_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roundtrip.spe");
        export::to_spe(&spectrum, &path, 6).unwrap();

        let counts = parse_spe_file(&path).unwrap();
        assert_eq!(counts, values);
    }
}
