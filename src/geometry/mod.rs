//! # 几何工具模块
//!
//! 探测器孔径的立体角闭式公式，用于把 计数/球面度 换算为绝对计数率。
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 使用
//! - 无外部模块依赖

use std::f64::consts::PI;

/// 圆锥立体角 Ω = 2π(1 − cos(atan(r/d)))
///
/// 非物理几何（距离 ≤ 0）不报错，按 0 立体角处理。
pub fn cone_solid_angle(radius: f64, distance: f64) -> f64 {
    if distance <= 0.0 || radius <= 0.0 {
        return 0.0;
    }
    let theta = (radius / distance).atan();
    2.0 * PI * (1.0 - theta.cos())
}

/// 四棱锥立体角 Ω = 4·atan(a·b / (2d·√(4d² + 2a²)))
pub fn pyramid_solid_angle(a_side: f64, b_side: f64, distance: f64) -> f64 {
    if distance <= 0.0 || a_side <= 0.0 || b_side <= 0.0 {
        return 0.0;
    }
    let numer = a_side * b_side;
    let denom = 2.0 * distance * (4.0 * distance * distance + 2.0 * a_side * a_side).sqrt();
    4.0 * (numer / denom).atan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_known_value() {
        // r = d ⇒ 半顶角 45°，Ω = 2π(1 − √2/2)
        let omega = cone_solid_angle(1.0, 1.0);
        let expected = 2.0 * PI * (1.0 - 0.5_f64.sqrt());
        assert!((omega - expected).abs() < 1e-12);
    }

    #[test]
    fn test_cone_limits() {
        // 远距离趋于 0，半径远大于距离趋于半球 2π
        assert!(cone_solid_angle(1.0, 1e9) < 1e-15);
        assert!((cone_solid_angle(1e9, 1.0) - 2.0 * PI).abs() < 1e-3);
        assert_eq!(cone_solid_angle(1.0, 0.0), 0.0);
        assert_eq!(cone_solid_angle(1.0, -2.0), 0.0);
    }

    #[test]
    fn test_pyramid_small_aperture_approximation() {
        // 小孔径极限 Ω ≈ a·b/d²
        let omega = pyramid_solid_angle(0.01, 0.01, 10.0);
        let approx = 0.01 * 0.01 / 100.0;
        assert!((omega - approx).abs() / approx < 1e-3);
    }

    #[test]
    fn test_pyramid_degenerate_is_zero() {
        assert_eq!(pyramid_solid_angle(1.0, 1.0, 0.0), 0.0);
        assert_eq!(pyramid_solid_angle(0.0, 1.0, 5.0), 0.0);
    }
}
