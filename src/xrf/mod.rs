//! # XRF 模拟核心模块
//!
//! 实现光源谱 → 路径衰减 → 样品发射 → 探测器响应的四阶段数值管线。
//! 每个阶段都是不可变输入上的纯函数，产出新谱，可按任意顺序组合。
//!
//! ## 子模块
//! - `source`: 管球光源谱生成（Ebel 1999 模型）
//! - `attenuation`: Beer–Lambert 路径衰减
//! - `emission`: 体样品荧光与散射（de Boer 1990 模型）
//! - `detector`: 探测器能量分辨率卷积
//! - `export`: 谱数据导出（CSV / SPE）
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 使用
//! - 使用 `models/` 数据模型和 `atomic/` 原子数据

pub mod attenuation;
pub mod detector;
pub mod emission;
pub mod export;
pub mod source;

pub use attenuation::{attenuate, attenuate_path, mass_attenuation};
pub use detector::detect;
pub use emission::emit;
pub use source::TubeSource;

/// 守卫除法：分母为 0 时返回 0，不产生 NaN/∞
///
/// 整条管线共用的数值域约定。
#[inline]
pub(crate) fn div_or_zero(num: f64, den: f64) -> f64 {
    if den != 0.0 {
        num / den
    } else {
        0.0
    }
}
