//! # 数据模型模块
//!
//! 定义能量网格、谱、材料与几何的不可变值类型。
//!
//! ## 依赖关系
//! - 被 `xrf/`, `parsers/`, `commands/` 使用
//! - 子模块: spectrum, material

pub mod material;
pub mod spectrum;

pub use material::{GeometryAngles, MaterialComposition, PathSegment};
pub use spectrum::{EnergyGrid, Spectrum};
