//! # 管球光源谱生成器
//!
//! 基于 Ebel (1999) 模型生成 X 射线管发射谱（计数/球面度）：
//! Kramers 型幂律连续谱乘阳极自吸收因子，叠加 K/L 壳层特征峰。
//!
//! ## 算法概述
//! 1. 在 [1.0, kVp] 网格上逐 bin 计算连续谱基础强度
//! 2. 由阻止本领加权平均深度 pz_bar 计算阳极自吸收因子
//! 3. 对每个吸收边低于 kVp 的壳层计算特征线强度
//!    （背散射因子 × 阻止因子 × 荧光产额 × 分支比 × 自吸收因子）
//! 4. 特征线以 (bin, 强度) 稀疏表构建后合并进连续谱
//! 5. 整谱按 mA·曝光时间 缩放
//!
//! ## 参考
//! - H. Ebel, X-Ray Spectrometry 28 (1999) 255-266
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 调用
//! - 使用 `models/` 的 EnergyGrid, Spectrum, GeometryAngles
//! - 使用 `atomic/` 的光电截面、边/线数据

use crate::atomic::{self, Line, Shell};
use crate::error::{Result, XrfSimError};
use crate::models::{EnergyGrid, GeometryAngles, Spectrum};

/// 连续谱强度常数
const CONTINUUM_CONST: f64 = 1.35e9;

/// 特征线强度常数
const CHARACTERISTIC_CONST: f64 = 6.0e13;

/// 自吸收项数值下限，防止 (1−e⁻ˣ)/x 在 x→0 处失稳
const ABSORPTION_TERM_FLOOR: f64 = 1e-5;

/// 光源模型中各壳层携带的特征线
const SHELL_LINES: [(Shell, &[Line]); 4] = [
    (Shell::K, &[Line::KL3, Line::KL2, Line::KM3, Line::KM2]),
    (Shell::L3, &[Line::L3M5, Line::L3M4]),
    (Shell::L2, &[Line::L2M4]),
    (Shell::L1, &[Line::L1M3, Line::L1M2]),
];

/// 一条特征线峰
///
/// 吸收边高于管电压的线保留占位条目，强度为 0。
#[derive(Debug, Clone, Copy)]
pub struct LinePeak {
    pub shell: Shell,
    pub line: Line,
    pub energy_kev: f64,
    pub intensity: f64,
}

/// X 射线管光源描述
///
/// 构造时校验阳极元素、电压、电流与几何角；`spectrum` 产出发射谱。
#[derive(Debug, Clone, Copy)]
pub struct TubeSource {
    anode_z: u32,
    kvp: f64,
    ma: f64,
    exposure_s: f64,
    angles: GeometryAngles,
}

impl TubeSource {
    /// 创建管球光源
    pub fn new(
        anode_z: u32,
        kvp: f64,
        ma: f64,
        exposure_s: f64,
        angles: GeometryAngles,
    ) -> Result<Self> {
        if atomic::element(anode_z).is_none() {
            return Err(XrfSimError::UnknownElement(format!("Z = {}", anode_z)));
        }
        if !(kvp > 1.0) || !kvp.is_finite() {
            return Err(XrfSimError::InvalidArgument(format!(
                "tube voltage must exceed 1 kV, got {}",
                kvp
            )));
        }
        if !(ma > 0.0) || !(exposure_s > 0.0) {
            return Err(XrfSimError::InvalidArgument(format!(
                "tube current and exposure must be positive, got {} mA, {} s",
                ma, exposure_s
            )));
        }
        Ok(Self {
            anode_z,
            kvp,
            ma,
            exposure_s,
            angles,
        })
    }

    /// 生成发射谱，网格 [1.0, kVp]，步长 de_kev
    pub fn spectrum(&self, de_kev: f64) -> Result<Spectrum> {
        let grid = EnergyGrid::from_range(1.0, self.kvp, de_kev)?;
        let mut total = self.continuum(&grid);

        // 特征线先构建稀疏贡献表，再按固定顺序合并，保证可复现的归约次序
        let mut contributions: Vec<(usize, f64)> = Vec::new();
        for peak in self.line_peaks() {
            if peak.intensity > 0.0 {
                contributions.push((grid.nearest_bin(peak.energy_kev), peak.intensity));
            }
        }
        for (bin, intensity) in contributions {
            total.intensities_mut()[bin] += intensity;
        }

        Ok(total.scaled(self.ma * self.exposure_s))
    }

    /// 连续谱（未经 mA·s 缩放）
    fn continuum(&self, grid: &EnergyGrid) -> Spectrum {
        let z = self.anode_z as f64;
        let x = 1.109 - 0.00435 * z + 0.00175 * self.kvp;
        let de = grid.step();

        let mut spectrum = Spectrum::zeros(*grid);
        for i in 0..grid.len() {
            let e = grid.energy(i);
            // U0 − 1 < 0 ⇒ 高于管电压的物理截断，贡献 0
            let u_diff = (self.kvp / e - 1.0).max(0.0);
            let basic = CONTINUUM_CONST * z * u_diff.powf(x) * de;
            spectrum.intensities_mut()[i] = basic * self.absorption_factor(e, e);
        }
        spectrum
    }

    /// 全部特征线峰（含低于阈值的零强度占位条目）
    pub fn line_peaks(&self) -> Vec<LinePeak> {
        let mut peaks = Vec::new();
        for (shell, lines) in SHELL_LINES {
            let edge = atomic::edge_energy(self.anode_z, shell);
            let excited = edge > 0.0 && self.kvp > edge;
            for &line in lines {
                let energy = atomic::line_energy(self.anode_z, line);
                let intensity = if excited && energy > 0.0 {
                    let stop = self.stopping_factor(edge, shell);
                    let back = self.backscatter_factor(edge);
                    let yield_w = atomic::fluor_yield(self.anode_z, shell);
                    let rate = atomic::rad_rate(self.anode_z, line);
                    let absorption = self.absorption_factor(edge, energy);
                    CHARACTERISTIC_CONST * stop * back * yield_w * rate * absorption
                } else {
                    0.0
                };
                peaks.push(LinePeak {
                    shell,
                    line,
                    energy_kev: energy,
                    intensity,
                });
            }
        }
        peaks
    }

    /// 阳极自吸收因子 (1 − e⁻ˣ)/x
    ///
    /// x = τ(E_tau)·2·pz_bar·sinθ_in/sinθ_out，其中 pz_bar 是
    /// 阻止本领加权的平均电离深度，在 pz_energy 处取过压比。
    fn absorption_factor(&self, pz_energy: f64, tau_energy: f64) -> f64 {
        if pz_energy <= 0.0 {
            return 0.0;
        }
        let z = self.anode_z as f64;
        let u0 = self.kvp / pz_energy;
        let ln_u0 = u0.ln();
        let ln_z = z.ln();

        let m = 0.1382 - 0.9211 / z.sqrt();
        let j = 0.0135 * z;
        let n = self.kvp.powf(m)
            * (0.1904 - 0.2236 * ln_z + 0.1292 * ln_z.powi(2) - 0.0149 * ln_z.powi(3));
        let a = atomic::atomic_weight(self.anode_z);
        let pz_m = (a / z) * (0.787e-5 * j.sqrt() * self.kvp.powf(1.5) + 0.735e-6 * self.kvp.powi(2));
        let pz_num = 0.49269 - 1.0987 * n + 0.78557 * n * n;
        let pz_den = 0.70256 - 1.09865 * n + 1.0046 * n * n;
        let pz_bar = pz_m * (pz_num / (pz_den + ln_u0)) * ln_u0;

        let tau = atomic::cs_photo(self.anode_z, &[tau_energy])[0];
        let angle_ratio = self.angles.sin_in() / self.angles.sin_out();
        let term = (tau * 2.0 * pz_bar * angle_ratio).max(ABSORPTION_TERM_FLOOR);
        (1.0 - (-term).exp()) / term
    }

    /// 阻止因子 1/S：取决于过压比 U0，K 与 L 壳层常数不同
    fn stopping_factor(&self, edge_kev: f64, shell: Shell) -> f64 {
        let z = self.anode_z as f64;
        let u0 = self.kvp / edge_kev;
        let (z_s, b_s) = match shell {
            Shell::K => (2.0, 0.35),
            _ => (8.0, 0.25),
        };
        let j = 0.0135 * z;
        let u_term = u0 * u0.ln() + 1.0 - u0;
        let mut sf = (u0.sqrt() * u0.ln() + 2.0 * (1.0 - u0.sqrt())) / u_term;
        sf = sf * (j / edge_kev).sqrt() * 16.05 + 1.0;
        sf * u_term * (z_s * b_s / z)
    }

    /// 背散射因子 R
    fn backscatter_factor(&self, edge_kev: f64) -> f64 {
        let z = self.anode_z as f64;
        let u0 = self.kvp / edge_kev;
        1.0 - 0.0081517 * z + 3.613e-5 * z * z + 0.009583 * z * (-u0).exp() + 0.001141 * self.kvp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tungsten_40kv() -> TubeSource {
        let angles = GeometryAngles::new(90.0, 45.0).unwrap();
        TubeSource::new(74, 40.0, 1.0, 1.0, angles).unwrap()
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let angles = GeometryAngles::new(90.0, 45.0).unwrap();
        assert!(TubeSource::new(999, 40.0, 1.0, 1.0, angles).is_err());
        assert!(TubeSource::new(74, 0.0, 1.0, 1.0, angles).is_err());
        assert!(TubeSource::new(74, -40.0, 1.0, 1.0, angles).is_err());
        assert!(TubeSource::new(74, 40.0, 0.0, 1.0, angles).is_err());
        assert!(TubeSource::new(74, 40.0, 1.0, 0.0, angles).is_err());
    }

    #[test]
    fn test_continuum_zero_above_kvp_nonzero_inside() {
        let src = tungsten_40kv();
        let spectrum = src.spectrum(0.1).unwrap();
        let grid = spectrum.grid();
        // 网格终点即 kVp，U0 − 1 = 0 ⇒ 末 bin 连续谱为 0
        assert!((grid.max_energy() - 40.0).abs() < 1e-9);
        assert_eq!(spectrum.intensity(grid.len() - 1), 0.0);
        // 谱内部必须有实际强度
        let mid = grid.nearest_bin(20.0);
        assert!(spectrum.intensity(mid) > 0.0);
    }

    #[test]
    fn test_tungsten_40kv_k_lines_below_threshold() {
        // W 的 K 边 69.5 keV 高于 40 kVp：K 线占位且强度为 0
        let src = tungsten_40kv();
        let peaks = src.line_peaks();
        let k_peaks: Vec<_> = peaks.iter().filter(|p| p.shell == Shell::K).collect();
        assert_eq!(k_peaks.len(), 4, "K lines must stay as placeholders");
        assert!(k_peaks.iter().all(|p| p.intensity == 0.0));
    }

    #[test]
    fn test_tungsten_40kv_l_lines_present() {
        // L 边 10-12 keV 低于 40 kVp：8-11 keV 的 L 线必须非零
        let src = tungsten_40kv();
        let spectrum = src.spectrum(0.1).unwrap();
        let peaks = src.line_peaks();
        let la1 = peaks.iter().find(|p| p.line == Line::L3M5).unwrap();
        assert!((la1.energy_kev - 8.398).abs() < 0.01);
        assert!(la1.intensity > 0.0);

        // 峰所在 bin 应显著高出邻近连续谱
        let grid = spectrum.grid();
        let peak_bin = grid.nearest_bin(8.398);
        let nearby = spectrum.intensity(peak_bin + 5);
        assert!(spectrum.intensity(peak_bin) > 2.0 * nearby);
    }

    #[test]
    fn test_intensity_scales_with_ma_and_exposure() {
        let angles = GeometryAngles::new(90.0, 45.0).unwrap();
        let base = TubeSource::new(74, 40.0, 1.0, 1.0, angles)
            .unwrap()
            .spectrum(0.1)
            .unwrap();
        let doubled = TubeSource::new(74, 40.0, 2.0, 1.0, angles)
            .unwrap()
            .spectrum(0.1)
            .unwrap();
        for i in 0..base.grid().len() {
            assert!((doubled.intensity(i) - 2.0 * base.intensity(i)).abs() < 1e-6_f64.max(2.0 * base.intensity(i) * 1e-12));
        }
    }

    #[test]
    fn test_rhodium_anode_k_lines_excited_at_40kv() {
        // Rh 的 K 边 23.2 keV 低于 40 kVp：K 线应有强度
        let angles = GeometryAngles::new(90.0, 45.0).unwrap();
        let src = TubeSource::new(45, 40.0, 1.0, 1.0, angles).unwrap();
        let peaks = src.line_peaks();
        let ka1 = peaks.iter().find(|p| p.line == Line::KL3).unwrap();
        assert!(ka1.intensity > 0.0);
        assert!((ka1.energy_kev - 20.216).abs() < 0.01);
    }
}
