//! # 解析器模块
//!
//! 提供边界输入的解析器：材料组成字符串、路径层段描述和 SPE 道计数文件。
//! 全部校验在此完成，进入核心的都是合法值类型。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型和 `atomic/` 元素表
//! - 子模块: composition, spe

pub mod composition;
pub mod spe;

pub use composition::{parse_composition, parse_element, parse_material, parse_path_segment};
pub use spe::parse_spe_file;
