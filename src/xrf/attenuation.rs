//! # 路径衰减引擎
//!
//! 对谱施加单层或多层材料的 Beer–Lambert 透射，
//! 拆分为透射分量和相互作用（被吸收）分量。
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 调用
//! - 使用 `models/` 的 Spectrum, MaterialComposition, PathSegment
//! - 使用 `atomic/` 的总截面

use crate::atomic;
use crate::models::{MaterialComposition, PathSegment, Spectrum};

/// 材料在各能量点的质量衰减系数 μ/ρ（cm²/g）
///
/// 各元素总截面按质量分数加权求和。
pub fn mass_attenuation(material: &MaterialComposition, energies: &[f64]) -> Vec<f64> {
    let mut mu = vec![0.0; energies.len()];
    for &(z, fraction) in material.components() {
        let mu_z = atomic::cs_total(z, energies);
        for (acc, v) in mu.iter_mut().zip(mu_z.iter()) {
            *acc += fraction * v;
        }
    }
    mu
}

/// 单层材料衰减
///
/// 返回 (透射谱, 相互作用谱)；逐 bin 满足 透射 + 相互作用 = 入射。
pub fn attenuate(
    incoming: &Spectrum,
    material: &MaterialComposition,
    thickness_cm: f64,
) -> (Spectrum, Spectrum) {
    let energies = incoming.grid().energies();
    let mu = mass_attenuation(material, &energies);
    let rho_t = material.density() * thickness_cm;

    let mut transmitted = Spectrum::zeros(*incoming.grid());
    let mut interacted = Spectrum::zeros(*incoming.grid());
    for i in 0..energies.len() {
        let t = incoming.intensity(i) * (-mu[i] * rho_t).exp();
        transmitted.intensities_mut()[i] = t;
        interacted.intensities_mut()[i] = incoming.intensity(i) - t;
    }
    (transmitted, interacted)
}

/// 多层路径衰减
///
/// 按给定顺序把透射谱穿过每一层；相互作用谱只在最后
/// 以 入射 − 终透射 一次性给出，不保留逐层损失。
pub fn attenuate_path(incoming: &Spectrum, path: &[PathSegment]) -> (Spectrum, Spectrum) {
    let mut transmitted = incoming.clone();
    for segment in path {
        let (t, _) = attenuate(&transmitted, &segment.material, segment.thickness_cm);
        transmitted = t;
    }
    let mut interacted = Spectrum::zeros(*incoming.grid());
    for i in 0..incoming.grid().len() {
        interacted.intensities_mut()[i] = incoming.intensity(i) - transmitted.intensity(i);
    }
    (transmitted, interacted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnergyGrid;

    fn flat_spectrum() -> Spectrum {
        let grid = EnergyGrid::from_range(1.0, 20.0, 0.1).unwrap();
        let n = grid.len();
        Spectrum::new(grid, vec![1.0; n]).unwrap()
    }

    #[test]
    fn test_conservation_per_bin() {
        let incoming = flat_spectrum();
        let mat = MaterialComposition::new(&[(26, 0.7), (28, 0.3)], 7.9).unwrap();
        let (transmitted, interacted) = attenuate(&incoming, &mat, 0.01);
        for i in 0..incoming.grid().len() {
            let sum = transmitted.intensity(i) + interacted.intensity(i);
            assert!(
                (sum - incoming.intensity(i)).abs() < 1e-12,
                "bin {}: {} + {} != {}",
                i,
                transmitted.intensity(i),
                interacted.intensity(i),
                incoming.intensity(i)
            );
        }
    }

    #[test]
    fn test_zero_thickness_is_identity() {
        let incoming = flat_spectrum();
        let mat = MaterialComposition::pure(13, 2.699).unwrap();
        let (transmitted, interacted) = attenuate(&incoming, &mat, 0.0);
        assert_eq!(transmitted, incoming);
        assert!(interacted.intensities().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_thick_absorber_kills_spectrum() {
        let incoming = flat_spectrum();
        let mat = MaterialComposition::pure(82, 11.35).unwrap();
        let (transmitted, _) = attenuate(&incoming, &mat, 100.0);
        assert!(transmitted.intensities().iter().all(|&v| v < 1e-30));
    }

    #[test]
    fn test_flat_spectrum_matches_beer_lambert() {
        let incoming = flat_spectrum();
        let mat = MaterialComposition::pure(26, 7.874).unwrap();
        let t = 0.005;
        let energies = incoming.grid().energies();
        let mu = mass_attenuation(&mat, &energies);
        let (transmitted, _) = attenuate(&incoming, &mat, t);
        for i in 0..energies.len() {
            let expected = (-mu[i] * 7.874 * t).exp();
            assert!(
                (transmitted.intensity(i) - expected).abs() < 1e-12,
                "bin {} deviates from Beer-Lambert",
                i
            );
        }
    }

    #[test]
    fn test_path_equals_composed_segments() {
        let incoming = flat_spectrum();
        let al = MaterialComposition::pure(13, 2.699).unwrap();
        let fe = MaterialComposition::pure(26, 7.874).unwrap();
        let path = vec![
            PathSegment::new(al.clone(), 0.01).unwrap(),
            PathSegment::new(fe.clone(), 0.002).unwrap(),
        ];
        let (via_path, interacted) = attenuate_path(&incoming, &path);
        let (step1, _) = attenuate(&incoming, &al, 0.01);
        let (step2, _) = attenuate(&step1, &fe, 0.002);
        assert_eq!(via_path, step2);
        // 总相互作用 = 入射 − 终透射
        for i in 0..incoming.grid().len() {
            let expected = incoming.intensity(i) - step2.intensity(i);
            assert!((interacted.intensity(i) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_path_is_identity() {
        let incoming = flat_spectrum();
        let (transmitted, interacted) = attenuate_path(&incoming, &[]);
        assert_eq!(transmitted, incoming);
        assert!(interacted.intensities().iter().all(|&v| v == 0.0));
    }
}
