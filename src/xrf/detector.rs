//! # 探测器响应模型
//!
//! 把发射谱与能量相关的高斯分辨率函数做离散卷积，得到测得谱。
//! 高斯宽度随源 bin 能量线性变化：σ(e) = gain_noise·e + offset_noise，
//! 因此是局部自适应卷积（对网格规模 O(n²)），不是固定核。
//!
//! ## 依赖关系
//! - 被 `commands/simulate.rs` 调用
//! - 使用 `models/` 的 Spectrum

use std::f64::consts::PI;

use crate::models::Spectrum;

/// 探测器能量分辨率卷积
///
/// 对每个源 bin，以该 bin 能量处的 σ 为宽度、源强度为幅值，
/// 向整个输出数组叠加一条按 bin 宽归一的高斯曲线。
/// 网格边界截断之外总计数近似守恒；σ ≤ 0 的 bin 退化为原位沉积。
pub fn detect(emission: &Spectrum, offset_noise_kev: f64, gain_noise: f64) -> Spectrum {
    let grid = emission.grid();
    let energies = grid.energies();
    let de = grid.step();

    let mut detected = Spectrum::zeros(*grid);
    for (src, &e_src) in energies.iter().enumerate() {
        let counts = emission.intensity(src);
        if counts == 0.0 {
            continue;
        }
        let sigma = gain_noise * e_src + offset_noise_kev;
        if sigma <= 0.0 {
            detected.intensities_mut()[src] += counts;
            continue;
        }
        let norm = de / (sigma * (2.0 * PI).sqrt());
        for (out, &e_out) in energies.iter().enumerate() {
            let d = (e_out - e_src) / sigma;
            detected.intensities_mut()[out] += counts * norm * (-0.5 * d * d).exp();
        }
    }
    detected
}
