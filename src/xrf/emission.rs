//! # 体样品发射引擎
//!
//! 给定打在多元素体样品上的入射束谱，计算出射的 K 系荧光
//! （一次激发 + 元素间二次增强）、瑞利散射与康普顿散射谱之和，
//! 单位为计数/球面度。荧光部分基于 de Boer (1990) 模型，
//! 散射部分采用同形式的衰减归一化项。
//!
//! ## 算法概述
//! 1. 样品质量衰减系数按质量分数加权，折算入射/出射方向路径倍率
//! 2. 一次荧光：对每个元素 i 的每条 K 线 k，逐 bin 组合
//!    激发效率 ε、光电截面 τ 和深度修正项，对入射谱求和后写入线所在 bin
//! 3. 二次增强：对每个有序元素对 (i,j)，用元素 j 谱线的边跳变比
//!    与双向对数路径积分项修正元素 i 的线强
//! 4. 康普顿贡献先在入射能量 bin 上累加，再按位移能量重新分 bin
//!
//! ## 参考
//! - D. K. G. de Boer, X-Ray Spectrometry 19 (1990) 145-154
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 调用
//! - 使用 `models/` 的 Spectrum, MaterialComposition, GeometryAngles
//! - 使用 `atomic/` 的截面、产额、线能量数据

use std::f64::consts::PI;

use crate::atomic::{self, Line, Shell};
use crate::error::Result;
use crate::models::{GeometryAngles, MaterialComposition, Spectrum};
use crate::xrf::attenuation::mass_attenuation;
use crate::xrf::div_or_zero;

/// 荧光计算覆盖的 K 系谱线
const FLUOR_LINES: [Line; 8] = [
    Line::KL3,
    Line::KL2,
    Line::KL1,
    Line::KM3,
    Line::KN3,
    Line::KM2,
    Line::KN5,
    Line::KM5,
];

/// 样品总发射谱：荧光 + 瑞利 + 康普顿
pub fn emit(
    sample: &MaterialComposition,
    beam: &Spectrum,
    angles: &GeometryAngles,
) -> Result<Spectrum> {
    let fluor = fluorescence(sample, beam, angles);
    let ray = rayleigh(sample, beam, angles);
    let comp = compton(sample, beam, angles);
    fluor.add(&ray)?.add(&comp)
}

/// 逐元素预取的查询结果
struct ElementTables {
    fraction: f64,
    /// 总光电截面 τ（cm²/g），逐 bin
    tau: Vec<f64>,
    /// K 壳层分波光电截面，逐 bin
    sigma_k: Vec<f64>,
    /// K 壳层荧光产额
    yield_k: f64,
    /// 各谱线能量与分支比
    line_kev: [f64; FLUOR_LINES.len()],
    line_rate: [f64; FLUOR_LINES.len()],
}

fn prefetch(sample: &MaterialComposition, energies: &[f64]) -> Vec<ElementTables> {
    sample
        .components()
        .iter()
        .map(|&(z, fraction)| {
            let mut line_kev = [0.0; FLUOR_LINES.len()];
            let mut line_rate = [0.0; FLUOR_LINES.len()];
            for (k, &line) in FLUOR_LINES.iter().enumerate() {
                line_kev[k] = atomic::line_energy(z, line);
                line_rate[k] = atomic::rad_rate(z, line);
            }
            ElementTables {
                fraction,
                tau: atomic::cs_photo(z, energies),
                sigma_k: atomic::cs_photo_shell(z, Shell::K, energies),
                yield_k: atomic::fluor_yield(z, Shell::K),
                line_kev,
                line_rate,
            }
        })
        .collect()
}

/// K 系荧光谱（一次 + 二次增强）
pub fn fluorescence(
    sample: &MaterialComposition,
    beam: &Spectrum,
    angles: &GeometryAngles,
) -> Spectrum {
    fluorescence_impl(sample, beam, angles, true)
}

fn fluorescence_impl(
    sample: &MaterialComposition,
    beam: &Spectrum,
    angles: &GeometryAngles,
    with_secondary: bool,
) -> Spectrum {
    let grid = beam.grid();
    let energies = grid.energies();
    let n = energies.len();
    let elements = prefetch(sample, &energies);

    let sin_in = angles.sin_in();
    let sin_out = angles.sin_out();

    // 样品总质量衰减系数与双向路径倍率
    let mu_sample = mass_attenuation(sample, &energies);
    let mu_in: Vec<f64> = mu_sample.iter().map(|m| m / sin_in).collect();
    let mu_out: Vec<f64> = mu_sample.iter().map(|m| m / sin_out).collect();

    let mut fluor = Spectrum::zeros(*grid);
    for (i, el_i) in elements.iter().enumerate() {
        for (k, _) in FLUOR_LINES.iter().enumerate() {
            // 无数据的谱线跳过，不污染边界 bin
            if el_i.line_kev[k] <= 0.0 {
                continue;
            }
            let row_i = grid.nearest_bin(el_i.line_kev[k]);

            // 一次荧光贡献 P(E)
            let p_arr: Vec<f64> = (0..n)
                .map(|e| {
                    let eps = div_or_zero(el_i.sigma_k[e], el_i.tau[e])
                        * el_i.yield_k
                        * el_i.line_rate[k];
                    let depth = div_or_zero(1.0, mu_in[e] + mu_out[row_i]);
                    (1.0 / (4.0 * PI)) * (1.0 / sin_in) * el_i.fraction * eps * el_i.tau[e] * depth
                })
                .collect();
            let mut line_counts: f64 = (0..n).map(|e| beam.intensity(e) * p_arr[e]).sum();

            // 二次增强：元素 j 的荧光再激发元素 i
            if with_secondary {
                for (j, el_j) in elements.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    for (m, _) in FLUOR_LINES.iter().enumerate() {
                        if el_j.line_kev[m] <= 0.0 {
                            continue;
                        }
                        let row_j = grid.nearest_bin(el_j.line_kev[m]);
                        // L1 + L2: 二次荧光在双向上的对数路径积分项
                        let l1 = div_or_zero(mu_sample[row_j], mu_out[row_i])
                            * (1.0 + div_or_zero(mu_out[row_i], mu_sample[row_j])).ln();
                        let secondary: f64 = (0..n)
                            .map(|e| {
                                let eps_j = div_or_zero(el_j.sigma_k[e], el_j.tau[e])
                                    * el_j.yield_k
                                    * el_j.line_rate[m];
                                let jump_ratio = div_or_zero(el_i.sigma_k[row_j], el_i.sigma_k[e]);
                                let tau_corr = div_or_zero(el_j.tau[e], el_i.tau[e])
                                    * div_or_zero(el_i.tau[row_j], mu_sample[row_j]);
                                let l2 = div_or_zero(mu_sample[row_j], mu_in[e])
                                    * (1.0 + div_or_zero(mu_in[e], mu_sample[row_j])).ln();
                                let s = p_arr[e]
                                    * 0.5
                                    * el_j.fraction
                                    * eps_j
                                    * jump_ratio
                                    * tau_corr
                                    * (l1 + l2);
                                beam.intensity(e) * s
                            })
                            .sum();
                        line_counts += secondary;
                    }
                }
            }

            fluor.intensities_mut()[row_i] = line_counts;
        }
    }
    fluor
}

/// 瑞利（相干）散射谱：不移动能量，逐 bin 累加
pub fn rayleigh(
    sample: &MaterialComposition,
    beam: &Spectrum,
    angles: &GeometryAngles,
) -> Spectrum {
    let grid = beam.grid();
    let energies = grid.energies();
    let theta = angles.scattering_angle_rad();
    let sin_in = angles.sin_in();
    let sin_out = angles.sin_out();

    let mut ray = Spectrum::zeros(*grid);
    for &(z, fraction) in sample.components() {
        let mu = atomic::cs_total(z, &energies);
        let dcs = atomic::dcs_rayleigh(z, &energies, theta);
        for e in 0..energies.len() {
            let depth = div_or_zero(1.0, mu[e] / sin_in + mu[e] / sin_out);
            ray.intensities_mut()[e] +=
                beam.intensity(e) * (1.0 / sin_in) * fraction * dcs[e] * depth;
        }
    }
    ray
}

/// 康普顿（非相干）散射谱
///
/// 强度先按入射能量累加，再重新分 bin 到位移能量；
/// 越界位移能量截断到边界 bin，计数守恒。
pub fn compton(
    sample: &MaterialComposition,
    beam: &Spectrum,
    angles: &GeometryAngles,
) -> Spectrum {
    let grid = beam.grid();
    let energies = grid.energies();
    let theta = angles.scattering_angle_rad();
    let sin_in = angles.sin_in();
    let sin_out = angles.sin_out();

    let shifted_kev = atomic::compton_energy(&energies, theta);

    let mut unshifted = vec![0.0; energies.len()];
    for &(z, fraction) in sample.components() {
        let mu = atomic::cs_total(z, &energies);
        let mu_shifted = atomic::cs_total(z, &shifted_kev);
        let dcs = atomic::dcs_compton(z, &energies, theta);
        for e in 0..energies.len() {
            // 入射方向在原能量、出射方向在位移能量处衰减
            let depth = div_or_zero(1.0, mu[e] / sin_in + mu_shifted[e] / sin_out);
            unshifted[e] += beam.intensity(e) * (1.0 / sin_in) * fraction * dcs[e] * depth;
        }
    }

    // 构建 (bin, 强度) 稀疏表后合并，归约顺序固定
    let contributions: Vec<(usize, f64)> = unshifted
        .iter()
        .enumerate()
        .map(|(e, &v)| (grid.nearest_bin(shifted_kev[e]), v))
        .collect();
    let mut shifted = Spectrum::zeros(*grid);
    for (bin, intensity) in contributions {
        shifted.intensities_mut()[bin] += intensity;
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnergyGrid;

    fn beam_flat(stop_kev: f64) -> Spectrum {
        let grid = EnergyGrid::from_range(1.0, stop_kev, 0.05).unwrap();
        let n = grid.len();
        Spectrum::new(grid, vec![1.0e6; n]).unwrap()
    }

    fn angles_45_45() -> GeometryAngles {
        GeometryAngles::new(45.0, 45.0).unwrap()
    }

    #[test]
    fn test_iron_k_alpha_excited() {
        let sample = MaterialComposition::pure(26, 7.874).unwrap();
        let beam = beam_flat(20.0);
        let fluor = fluorescence(&sample, &beam, &angles_45_45());
        let ka_bin = beam.grid().nearest_bin(6.404);
        assert!(fluor.intensity(ka_bin) > 0.0, "Fe K-alpha must be excited");
    }

    #[test]
    fn test_no_fluorescence_below_edge() {
        // 束最高 5 keV，低于 Fe K 边 7.112 keV
        let sample = MaterialComposition::pure(26, 7.874).unwrap();
        let beam = beam_flat(5.0);
        let fluor = fluorescence(&sample, &beam, &angles_45_45());
        assert!(fluor.intensities().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_single_element_has_no_secondary_term() {
        let sample = MaterialComposition::pure(26, 7.874).unwrap();
        let beam = beam_flat(20.0);
        let with = fluorescence_impl(&sample, &beam, &angles_45_45(), true);
        let without = fluorescence_impl(&sample, &beam, &angles_45_45(), false);
        assert_eq!(with, without);
    }

    #[test]
    fn test_secondary_enhancement_increases_line() {
        // Ni K-alpha (7.478 keV) 高于 Fe K 边 (7.112 keV)，会增强 Fe 线
        let sample = MaterialComposition::new(&[(26, 0.5), (28, 0.5)], 8.2).unwrap();
        let beam = beam_flat(20.0);
        let with = fluorescence_impl(&sample, &beam, &angles_45_45(), true);
        let without = fluorescence_impl(&sample, &beam, &angles_45_45(), false);
        let fe_ka = beam.grid().nearest_bin(6.404);
        assert!(
            with.intensity(fe_ka) > without.intensity(fe_ka),
            "enhancement must add to Fe K-alpha: {} vs {}",
            with.intensity(fe_ka),
            without.intensity(fe_ka)
        );
    }

    #[test]
    fn test_emit_single_element_is_sum_of_parts() {
        let sample = MaterialComposition::pure(29, 8.96).unwrap();
        let beam = beam_flat(20.0);
        let angles = angles_45_45();
        let total = emit(&sample, &beam, &angles).unwrap();
        let parts = fluorescence(&sample, &beam, &angles)
            .add(&rayleigh(&sample, &beam, &angles))
            .unwrap()
            .add(&compton(&sample, &beam, &angles))
            .unwrap();
        assert_eq!(total, parts);
    }

    #[test]
    fn test_rayleigh_preserves_energy_bins() {
        // 相干散射不移动能量：束为零的 bin 输出也为零
        let grid = EnergyGrid::from_range(1.0, 20.0, 0.05).unwrap();
        let mut intensities = vec![0.0; grid.len()];
        let mono_bin = grid.nearest_bin(15.0);
        intensities[mono_bin] = 1.0e6;
        let beam = Spectrum::new(grid, intensities).unwrap();
        let sample = MaterialComposition::pure(26, 7.874).unwrap();
        let ray = rayleigh(&sample, &beam, &angles_45_45());
        for i in 0..grid.len() {
            if i == mono_bin {
                assert!(ray.intensity(i) > 0.0);
            } else {
                assert_eq!(ray.intensity(i), 0.0);
            }
        }
    }

    #[test]
    fn test_compton_shifts_down_in_energy() {
        // 单色束 55 keV，θ = 90°，位移能量应为 E/(1 + E/511) ≈ 49.7 keV
        let grid = EnergyGrid::from_range(1.0, 60.0, 0.05).unwrap();
        let mut intensities = vec![0.0; grid.len()];
        let mono_bin = grid.nearest_bin(55.0);
        intensities[mono_bin] = 1.0e6;
        let beam = Spectrum::new(grid, intensities).unwrap();
        let sample = MaterialComposition::pure(13, 2.699).unwrap();
        let comp = compton(&sample, &beam, &angles_45_45());
        let (peak_bin, peak_kev, peak_counts) = comp.peak_bin();
        assert!(peak_counts > 0.0);
        assert!(peak_bin < mono_bin, "Compton peak must shift down");
        let expected = 55.0 / (1.0 + 55.0 / 510.998_95);
        assert!(
            (peak_kev - expected).abs() < 0.1,
            "Compton peak at {} keV, expected {}",
            peak_kev,
            expected
        );
    }

    #[test]
    fn test_compton_shift_conserves_counts() {
        let sample = MaterialComposition::new(&[(26, 0.7), (28, 0.3)], 7.9).unwrap();
        let beam = beam_flat(30.0);
        let angles = angles_45_45();
        let theta = angles.scattering_angle_rad();
        let energies = beam.grid().energies();

        // 与未重分 bin 的逐 bin 累加比较总计数
        let mut unshifted_total = 0.0;
        for &(z, fraction) in sample.components() {
            let mu = atomic::cs_total(z, &energies);
            let shifted_kev = atomic::compton_energy(&energies, theta);
            let mu_shifted = atomic::cs_total(z, &shifted_kev);
            let dcs = atomic::dcs_compton(z, &energies, theta);
            for e in 0..energies.len() {
                let depth = div_or_zero(
                    1.0,
                    mu[e] / angles.sin_in() + mu_shifted[e] / angles.sin_out(),
                );
                unshifted_total +=
                    beam.intensity(e) * (1.0 / angles.sin_in()) * fraction * dcs[e] * depth;
            }
        }
        let comp = compton(&sample, &beam, &angles);
        assert!((comp.total() - unshifted_total).abs() < 1e-9 * unshifted_total.max(1.0));
    }
}
