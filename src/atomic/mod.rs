//! # 原子数据提供层
//!
//! 以纯查询函数的形式提供逐元素物理常数：吸收边/特征线能量、荧光产额、
//! 辐射跃迁分支比、原子量、密度，以及参数化截面模型（光电、瑞利、康普顿）。
//! 所有截面调用对能量数组向量化，返回同长度结果。
//!
//! 数据表覆盖常用阳极和样品元素（见 `data.rs`）；表外元素在模型构造
//! 边界处被拒绝，核心内部按守卫归零规则处理缺失量。
//!
//! ## 依赖关系
//! - 被 `models/`, `xrf/`, `parsers/`, `commands/` 使用
//! - 子模块: constants, data, xsection

pub mod constants;
pub mod data;
pub mod xsection;

pub use data::{element, element_by_symbol, ElementRecord, Line, Shell, N_LINES};
pub use xsection::{
    compton_energy, cs_photo, cs_photo_shell, cs_total, dcs_compton, dcs_rayleigh,
};

/// 原子量（g/mol），表外元素返回 0
pub fn atomic_weight(z: u32) -> f64 {
    element(z).map_or(0.0, |rec| rec.atomic_weight)
}

/// 标准状态密度（g/cm³），表外元素返回 0
pub fn density(z: u32) -> f64 {
    element(z).map_or(0.0, |rec| rec.density)
}

/// 壳层吸收边能量（keV），无数据返回 0
pub fn edge_energy(z: u32, shell: Shell) -> f64 {
    element(z).map_or(0.0, |rec| rec.edges_kev[shell as usize])
}

/// 壳层荧光产额，无数据返回 0
pub fn fluor_yield(z: u32, shell: Shell) -> f64 {
    element(z).map_or(0.0, |rec| rec.fluor_yields[shell as usize])
}

/// 特征线能量（keV），无数据返回 0
pub fn line_energy(z: u32, line: Line) -> f64 {
    element(z).map_or(0.0, |rec| rec.lines_kev[line as usize])
}

/// 特征线在所属壳层内的辐射分支比，无数据返回 0
pub fn rad_rate(z: u32, line: Line) -> f64 {
    element(z).map_or(0.0, |rec| rec.rad_rates[line as usize])
}
