//! # 材料与几何数据模型
//!
//! 定义多元素材料组成、路径层段和测量几何角的不可变值类型，
//! 构造时完成全部边界校验，取代参考实现中的松散键值字典。
//!
//! ## 依赖关系
//! - 被 `xrf/` 各阶段和 `parsers/` 使用
//! - 使用 `atomic/` 校验元素是否在数据表内

use serde::{Deserialize, Serialize};

use crate::atomic;
use crate::error::{Result, XrfSimError};

/// 多元素材料组成
///
/// (原子序数, 质量分数) 的有序列表加体密度（g/cm³）。
/// 质量分数之和 ≈ 1 是物理假设，不在类型层面强制。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialComposition {
    components: Vec<(u32, f64)>,
    density: f64,
}

impl MaterialComposition {
    /// 创建材料组成
    ///
    /// 拒绝空组成、非正分数/密度和数据表之外的元素。
    pub fn new(components: &[(u32, f64)], density: f64) -> Result<Self> {
        if components.is_empty() {
            return Err(XrfSimError::InvalidComposition(
                "composition must contain at least one element".to_string(),
            ));
        }
        if !(density > 0.0) || !density.is_finite() {
            return Err(XrfSimError::InvalidComposition(format!(
                "density must be positive and finite, got {}",
                density
            )));
        }
        for &(z, fraction) in components {
            if atomic::element(z).is_none() {
                return Err(XrfSimError::UnknownElement(format!("Z = {}", z)));
            }
            if !(fraction > 0.0) || !fraction.is_finite() {
                return Err(XrfSimError::InvalidComposition(format!(
                    "weight fraction for Z = {} must be positive, got {}",
                    z, fraction
                )));
            }
        }
        let mut components = components.to_vec();
        components.sort_by_key(|&(z, _)| z);
        Ok(Self {
            components,
            density,
        })
    }

    /// 单元素材料
    pub fn pure(z: u32, density: f64) -> Result<Self> {
        Self::new(&[(z, 1.0)], density)
    }

    /// (原子序数, 质量分数) 列表，按 Z 升序
    pub fn components(&self) -> &[(u32, f64)] {
        &self.components
    }

    /// 体密度（g/cm³）
    pub fn density(&self) -> f64 {
        self.density
    }

    /// 元素数量
    pub fn n_elements(&self) -> usize {
        self.components.len()
    }
}

/// 路径层段：一种材料及其穿行厚度
///
/// 路径是层段的有序序列，顺序由调用方给定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub material: MaterialComposition,
    pub thickness_cm: f64,
}

impl PathSegment {
    /// 创建路径层段，厚度必须非负
    pub fn new(material: MaterialComposition, thickness_cm: f64) -> Result<Self> {
        if !(thickness_cm >= 0.0) || !thickness_cm.is_finite() {
            return Err(XrfSimError::InvalidArgument(format!(
                "segment thickness must be non-negative, got {}",
                thickness_cm
            )));
        }
        Ok(Self {
            material,
            thickness_cm,
        })
    }
}

/// 测量几何：入射角与出射角（度）
///
/// 两角均须在 (0°, 90°] 内，路径长度倍率为 1/sin(θ)。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryAngles {
    theta_in_deg: f64,
    theta_out_deg: f64,
}

impl GeometryAngles {
    /// 创建几何角
    pub fn new(theta_in_deg: f64, theta_out_deg: f64) -> Result<Self> {
        for (name, angle) in [("incidence", theta_in_deg), ("takeoff", theta_out_deg)] {
            if !(angle > 0.0 && angle <= 90.0) {
                return Err(XrfSimError::InvalidArgument(format!(
                    "{} angle must be in (0, 90] degrees, got {}",
                    name, angle
                )));
            }
        }
        Ok(Self {
            theta_in_deg,
            theta_out_deg,
        })
    }

    /// sin(入射角)
    pub fn sin_in(&self) -> f64 {
        self.theta_in_deg.to_radians().sin()
    }

    /// sin(出射角)
    pub fn sin_out(&self) -> f64 {
        self.theta_out_deg.to_radians().sin()
    }

    /// 散射角 θ = 180° − θ_in − θ_out（弧度）
    pub fn scattering_angle_rad(&self) -> f64 {
        (180.0 - self.theta_in_deg - self.theta_out_deg).to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_rejects_empty_and_bad_values() {
        assert!(MaterialComposition::new(&[], 1.0).is_err());
        assert!(MaterialComposition::new(&[(26, 1.0)], 0.0).is_err());
        assert!(MaterialComposition::new(&[(26, -0.5)], 7.87).is_err());
        assert!(MaterialComposition::new(&[(999, 1.0)], 1.0).is_err());
    }

    #[test]
    fn test_composition_sorts_by_z() {
        let mat = MaterialComposition::new(&[(29, 0.3), (26, 0.7)], 8.0).unwrap();
        assert_eq!(mat.components()[0].0, 26);
        assert_eq!(mat.components()[1].0, 29);
    }

    #[test]
    fn test_angles_validated() {
        assert!(GeometryAngles::new(0.0, 45.0).is_err());
        assert!(GeometryAngles::new(45.0, 91.0).is_err());
        let g = GeometryAngles::new(90.0, 45.0).unwrap();
        assert!((g.sin_in() - 1.0).abs() < 1e-12);
        assert!((g.scattering_angle_rad() - 45.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_segment_rejects_negative_thickness() {
        let mat = MaterialComposition::pure(13, 2.70).unwrap();
        assert!(PathSegment::new(mat.clone(), -0.1).is_err());
        assert!(PathSegment::new(mat, 0.0).is_ok());
    }
}
