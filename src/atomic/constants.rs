//! # 物理常数
//!
//! 截面模型和康普顿运动学使用的基础常数（CODATA 2018）。
//!
//! ## 依赖关系
//! - 被 `atomic/xsection.rs` 使用

/// 阿伏伽德罗常数（1/mol）
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// 经典电子半径（cm）
pub const CLASSICAL_ELECTRON_RADIUS_CM: f64 = 2.817_940_326e-13;

/// 电子静止能量（keV）
pub const ELECTRON_REST_ENERGY_KEV: f64 = 510.998_950;

/// keV 光子能量与波长的换算常数：λ[Å] = HC_KEV_ANGSTROM / E[keV]
pub const HC_KEV_ANGSTROM: f64 = 12.398_42;
