//! # 参数化截面模型
//!
//! 提供质量单位的光电、瑞利、康普顿截面和康普顿位移能量，
//! 全部对能量数组向量化。
//!
//! ## 模型
//! - 光电: Bragg–Pierce 型幂律 τ ∝ Z⁴/(A·E³)，带 K/L 吸收边跳变结构，
//!   K 边跳变比采用经验式 r_K = 125/Z + 3.5
//! - 瑞利（相干）: Thomson 微分截面 × 形状因子 f(s)²
//! - 康普顿（非相干）: Klein–Nishina 微分截面 × 非相干散射函数
//!   S(q,Z) ≈ Z·(1 − (f/Z)²)
//! - 康普顿位移: 相对论康普顿公式
//!
//! ## 依赖关系
//! - 被 `atomic/mod.rs` 再导出，供 `xrf/` 各阶段使用
//! - 使用 `atomic/data.rs` 的元素表和 `atomic/constants.rs`

use crate::atomic::constants::{
    AVOGADRO, CLASSICAL_ELECTRON_RADIUS_CM, ELECTRON_REST_ENERGY_KEV, HC_KEV_ANGSTROM,
};
use crate::atomic::data::{element, ElementRecord, Shell};

/// 光电截面标定常数，使 Fe 在 10 keV 处 τ ≈ 1.7e2 cm²/g
const PHOTO_SCALE: f64 = 20.7;

/// 相干散射总截面标定常数
const COHERENT_SCALE: f64 = 2.27;

/// L 子壳层吸收边跳变比
const JUMP_L1: f64 = 1.16;
const JUMP_L2: f64 = 1.41;
const JUMP_L3: f64 = 2.75;

/// K 边跳变比经验式
fn jump_k(z: u32) -> f64 {
    125.0 / z as f64 + 3.5
}

fn shell_jump(rec: &ElementRecord, shell: Shell) -> f64 {
    match shell {
        Shell::K => jump_k(rec.z),
        Shell::L1 => JUMP_L1,
        Shell::L2 => JUMP_L2,
        Shell::L3 => JUMP_L3,
    }
}

/// 单能量点的总光电截面（cm²/g）
fn photo_one(rec: &ElementRecord, e_kev: f64) -> f64 {
    if e_kev <= 0.0 {
        return 0.0;
    }
    let z = rec.z as f64;
    let base = PHOTO_SCALE * z.powi(4) / (rec.atomic_weight * e_kev.powi(3));
    // 低于某吸收边时该壳层不再吸收，按跳变比衰减
    let mut scale = 1.0;
    for shell in Shell::ALL {
        let edge = rec.edges_kev[shell as usize];
        if edge > 0.0 && e_kev < edge {
            scale /= shell_jump(rec, shell);
        }
    }
    base * scale
}

/// 形状因子 f(s)，s = sin(θ/2)/λ [1/Å]
fn form_factor(rec: &ElementRecord, s: f64) -> f64 {
    let s2 = s * s;
    let [a1, a2, a3, a4, b1, b2, b3, b4, c] = rec.ff;
    a1 * (-b1 * s2).exp() + a2 * (-b2 * s2).exp() + a3 * (-b3 * s2).exp() + a4 * (-b4 * s2).exp()
        + c
}

/// Klein–Nishina 微分截面（cm²/sr，每电子）
fn klein_nishina_dcs(e_kev: f64, theta_rad: f64) -> f64 {
    let ec = compton_energy_one(e_kev, theta_rad);
    if ec <= 0.0 || e_kev <= 0.0 {
        return 0.0;
    }
    let ratio = ec / e_kev;
    let sin_theta = theta_rad.sin();
    0.5 * CLASSICAL_ELECTRON_RADIUS_CM.powi(2)
        * ratio
        * ratio
        * (ratio + 1.0 / ratio - sin_theta * sin_theta)
}

/// Klein–Nishina 总截面（cm²，每电子）
fn klein_nishina_total(e_kev: f64) -> f64 {
    let eps = e_kev / ELECTRON_REST_ENERGY_KEV;
    if eps <= 0.0 {
        return 0.0;
    }
    let re2 = CLASSICAL_ELECTRON_RADIUS_CM.powi(2);
    let one_two = 1.0 + 2.0 * eps;
    let term1 = (1.0 + eps) / (eps * eps)
        * (2.0 * (1.0 + eps) / one_two - one_two.ln() / eps);
    let term2 = one_two.ln() / (2.0 * eps);
    let term3 = (1.0 + 3.0 * eps) / (one_two * one_two);
    2.0 * std::f64::consts::PI * re2 * (term1 + term2 - term3)
}

fn momentum_transfer(e_kev: f64, theta_rad: f64) -> f64 {
    let lambda = HC_KEV_ANGSTROM / e_kev;
    (theta_rad / 2.0).sin() / lambda
}

fn over_elements<F>(z: u32, energies: &[f64], f: F) -> Vec<f64>
where
    F: Fn(&ElementRecord, f64) -> f64,
{
    match element(z) {
        Some(rec) => energies.iter().map(|&e| f(rec, e)).collect(),
        None => vec![0.0; energies.len()],
    }
}

/// 总质量衰减系数 μ/ρ（cm²/g）：光电 + 相干 + 非相干
pub fn cs_total(z: u32, energies: &[f64]) -> Vec<f64> {
    over_elements(z, energies, |rec, e| {
        if e <= 0.0 {
            return 0.0;
        }
        let zf = rec.z as f64;
        let photo = photo_one(rec, e);
        let incoherent = klein_nishina_total(e) * zf * AVOGADRO / rec.atomic_weight;
        let coherent = COHERENT_SCALE * zf.powf(2.5) / (rec.atomic_weight * e * e);
        photo + incoherent + coherent
    })
}

/// 总光电截面 τ（cm²/g）
pub fn cs_photo(z: u32, energies: &[f64]) -> Vec<f64> {
    over_elements(z, energies, photo_one)
}

/// 指定壳层的分波光电截面（cm²/g）
///
/// 低于该壳层吸收边时为 0；高于时取总光电截面的 (1 − 1/J) 份额。
pub fn cs_photo_shell(z: u32, shell: Shell, energies: &[f64]) -> Vec<f64> {
    over_elements(z, energies, |rec, e| {
        let edge = rec.edges_kev[shell as usize];
        if edge <= 0.0 || e < edge {
            return 0.0;
        }
        photo_one(rec, e) * (1.0 - 1.0 / shell_jump(rec, shell))
    })
}

/// 瑞利散射微分截面 dσ/dΩ（cm²/(g·sr)），散射角 theta_rad
pub fn dcs_rayleigh(z: u32, energies: &[f64], theta_rad: f64) -> Vec<f64> {
    let cos_theta = theta_rad.cos();
    let thomson = 0.5 * CLASSICAL_ELECTRON_RADIUS_CM.powi(2) * (1.0 + cos_theta * cos_theta);
    over_elements(z, energies, |rec, e| {
        if e <= 0.0 {
            return 0.0;
        }
        let f = form_factor(rec, momentum_transfer(e, theta_rad));
        thomson * f * f * AVOGADRO / rec.atomic_weight
    })
}

/// 康普顿散射微分截面 dσ/dΩ（cm²/(g·sr)），散射角 theta_rad
pub fn dcs_compton(z: u32, energies: &[f64], theta_rad: f64) -> Vec<f64> {
    over_elements(z, energies, |rec, e| {
        if e <= 0.0 {
            return 0.0;
        }
        let zf = rec.z as f64;
        let f = form_factor(rec, momentum_transfer(e, theta_rad));
        let s_incoherent = (zf * (1.0 - (f / zf) * (f / zf))).max(0.0);
        klein_nishina_dcs(e, theta_rad) * s_incoherent * AVOGADRO / rec.atomic_weight
    })
}

/// 单能量点的康普顿位移能量（keV）
pub fn compton_energy_one(e_kev: f64, theta_rad: f64) -> f64 {
    if e_kev <= 0.0 {
        return 0.0;
    }
    e_kev / (1.0 + (e_kev / ELECTRON_REST_ENERGY_KEV) * (1.0 - theta_rad.cos()))
}

/// 康普顿位移能量（keV），向量化
pub fn compton_energy(energies: &[f64], theta_rad: f64) -> Vec<f64> {
    energies
        .iter()
        .map(|&e| compton_energy_one(e, theta_rad))
        .collect()
}
