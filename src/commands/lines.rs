//! # lines 子命令实现
//!
//! 打印元素的内置参考数据：吸收边、荧光产额、特征线能量与分支比。
//!
//! ## 依赖关系
//! - 使用 `cli/lines.rs` 定义的 LinesArgs
//! - 使用 `atomic/` 元素表
//! - 使用 `utils/output.rs` 终端输出

use crate::atomic::{self, Line, Shell};
use crate::cli::lines::LinesArgs;
use crate::error::{Result, XrfSimError};
use crate::parsers;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 执行 lines 命令
pub fn execute(args: LinesArgs) -> Result<()> {
    let z = parsers::parse_element(&args.element)?;
    let rec = atomic::element(z).ok_or_else(|| XrfSimError::UnknownElement(args.element.clone()))?;

    output::print_header(&format!(
        "Element Reference Data: {} (Z = {})",
        rec.symbol, rec.z
    ));
    output::print_info(&format!(
        "Atomic weight: {:.3} g/mol, density: {:.4} g/cm3",
        rec.atomic_weight, rec.density
    ));

    print_shell_table(z);
    print_line_table(z);

    Ok(())
}

#[derive(Tabled)]
struct ShellRow {
    #[tabled(rename = "Shell")]
    shell: String,
    #[tabled(rename = "Edge (keV)")]
    edge: String,
    #[tabled(rename = "Fluor yield")]
    yield_w: String,
}

fn print_shell_table(z: u32) {
    let rows: Vec<ShellRow> = Shell::ALL
        .iter()
        .map(|&shell| ShellRow {
            shell: format!("{:?}", shell),
            edge: format!("{:.3}", atomic::edge_energy(z, shell)),
            yield_w: format!("{:.4}", atomic::fluor_yield(z, shell)),
        })
        .collect();
    println!("{}", Table::new(&rows));
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Line")]
    line: String,
    #[tabled(rename = "Shell")]
    shell: String,
    #[tabled(rename = "E (keV)")]
    energy: String,
    #[tabled(rename = "Rad rate")]
    rate: String,
}

fn print_line_table(z: u32) {
    const ALL_LINES: [Line; 13] = [
        Line::KL1,
        Line::KL2,
        Line::KL3,
        Line::KM2,
        Line::KM3,
        Line::KN3,
        Line::KM5,
        Line::KN5,
        Line::L1M2,
        Line::L1M3,
        Line::L2M4,
        Line::L3M4,
        Line::L3M5,
    ];

    let rows: Vec<LineRow> = ALL_LINES
        .iter()
        .filter(|&&line| atomic::line_energy(z, line) > 0.0)
        .map(|&line| LineRow {
            line: format!("{:?}", line),
            shell: format!("{:?}", line.shell()),
            energy: format!("{:.3}", atomic::line_energy(z, line)),
            rate: format!("{:.4}", atomic::rad_rate(z, line)),
        })
        .collect();

    if rows.is_empty() {
        output::print_warning("No characteristic line data for this element");
    } else {
        println!("{}", Table::new(&rows));
    }
}
