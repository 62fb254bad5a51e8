//! # simulate 子命令 CLI 定义
//!
//! 定义完整模拟管线的参数：管球、滤片/空气路径、样品、探测器与输出。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/simulate.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 谱输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpectrumFormat {
    /// Two-column CSV (energy_kev, counts)
    Csv,
    /// Fixed-width SPE channel counts
    Spe,
}

/// simulate 子命令参数
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Sample composition: "Fe:0.7,Ni:0.3", a bare symbol, or a named material (air, water, ...)
    pub sample: String,

    /// Sample bulk density in g/cm3 (required for multi-element compositions)
    #[arg(short, long)]
    pub density: Option<f64>,

    /// Output file path
    #[arg(short, long, default_value = "spectrum.csv")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<SpectrumFormat>,

    /// Channel counts per SPE body line (6 or 10)
    #[arg(long, default_value_t = 6)]
    pub spe_per_line: usize,

    // ─────────────────────────────────────────────────────────────
    // 管球参数
    // ─────────────────────────────────────────────────────────────
    /// Anode element symbol
    #[arg(long, default_value = "W")]
    pub anode: String,

    /// Tube voltage in kV
    #[arg(long, default_value_t = 40.0)]
    pub kvp: f64,

    /// Tube current in mA
    #[arg(long, default_value_t = 1.0)]
    pub ma: f64,

    /// Exposure time in seconds
    #[arg(long, default_value_t = 1.0)]
    pub exposure: f64,

    /// Electron incidence angle on the anode (degrees)
    #[arg(long, default_value_t = 90.0)]
    pub tube_theta_in: f64,

    /// X-ray takeoff angle from the anode (degrees)
    #[arg(long, default_value_t = 45.0)]
    pub tube_theta_out: f64,

    /// Energy grid step in keV
    #[arg(long, default_value_t = 0.02)]
    pub de: f64,

    // ─────────────────────────────────────────────────────────────
    // 光路参数
    // ─────────────────────────────────────────────────────────────
    /// Beam filter segment "material@thickness_cm[@density]", repeatable, applied in order
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Air path length from source to sample (cm)
    #[arg(long, default_value_t = 0.0)]
    pub air_in: f64,

    /// Air path length from sample to detector (cm)
    #[arg(long, default_value_t = 0.0)]
    pub air_out: f64,

    /// Beam incidence angle on the sample (degrees)
    #[arg(long, default_value_t = 45.0)]
    pub theta_in: f64,

    /// Emission takeoff angle from the sample (degrees)
    #[arg(long, default_value_t = 45.0)]
    pub theta_out: f64,

    // ─────────────────────────────────────────────────────────────
    // 探测器参数
    // ─────────────────────────────────────────────────────────────
    /// Detector solid angle multiplier in steradians (overrides radius/distance)
    #[arg(long)]
    pub omega: Option<f64>,

    /// Circular detector aperture radius (cm), used with --detector-distance
    #[arg(long)]
    pub detector_radius: Option<f64>,

    /// Rectangular detector aperture side a (cm), used with --detector-side-b and --detector-distance
    #[arg(long)]
    pub detector_side_a: Option<f64>,

    /// Rectangular detector aperture side b (cm)
    #[arg(long)]
    pub detector_side_b: Option<f64>,

    /// Sample-detector distance (cm)
    #[arg(long)]
    pub detector_distance: Option<f64>,

    /// Constant term of the Gaussian resolution model (keV)
    #[arg(long, default_value_t = 0.05)]
    pub offset_noise: f64,

    /// Linear energy-dependent term of the Gaussian resolution model
    #[arg(long, default_value_t = 0.005)]
    pub gain_noise: f64,

    /// Skip the detector response convolution
    #[arg(long, default_value_t = false)]
    pub no_detector: bool,

    /// Number of top peaks to list in the summary table
    #[arg(long, default_value_t = 8)]
    pub peak_count: usize,
}
