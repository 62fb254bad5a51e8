//! # 能量网格与谱数据模型
//!
//! 定义统一的谱表示：等步长能量轴 + 同长度强度序列。
//! 同一次计算中所有谱共享同一网格；各管线阶段只读输入、分配新谱输出。
//!
//! ## 依赖关系
//! - 被 `xrf/` 各阶段和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

use crate::error::{Result, XrfSimError};

/// 等步长能量网格（keV）
///
/// 由起点、步长和点数唯一确定。所有校验在构造时完成：
/// 点数 >= 2，步长 > 0，数值有限。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyGrid {
    start_kev: f64,
    step_kev: f64,
    len: usize,
}

impl EnergyGrid {
    /// 创建能量网格
    pub fn new(start_kev: f64, step_kev: f64, len: usize) -> Result<Self> {
        if len < 2 {
            return Err(XrfSimError::InvalidGrid(format!(
                "grid needs at least 2 points, got {}",
                len
            )));
        }
        if !(step_kev > 0.0) || !step_kev.is_finite() {
            return Err(XrfSimError::InvalidGrid(format!(
                "grid step must be positive and finite, got {}",
                step_kev
            )));
        }
        if !start_kev.is_finite() {
            return Err(XrfSimError::InvalidGrid(format!(
                "grid start must be finite, got {}",
                start_kev
            )));
        }
        Ok(Self {
            start_kev,
            step_kev,
            len,
        })
    }

    /// 创建覆盖 [start, stop]（含端点）的网格
    ///
    /// 网格点为 start + i·step < stop + step，与参考实现的
    /// `arange(start, stop + step, step)` 行为一致；
    /// stop 不落在步长整数倍上时末点可略高于 stop。
    pub fn from_range(start_kev: f64, stop_kev: f64, step_kev: f64) -> Result<Self> {
        if !(stop_kev > start_kev) {
            return Err(XrfSimError::InvalidGrid(format!(
                "grid stop {} must exceed start {}",
                stop_kev, start_kev
            )));
        }
        if !(step_kev > 0.0) || !step_kev.is_finite() {
            return Err(XrfSimError::InvalidGrid(format!(
                "grid step must be positive and finite, got {}",
                step_kev
            )));
        }
        let len = ((stop_kev + step_kev - start_kev) / step_kev - 1e-9).ceil() as usize;
        Self::new(start_kev, step_kev, len)
    }

    /// 网格点数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 网格是否为空（构造校验保证不会出现）
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 步长（keV）
    pub fn step(&self) -> f64 {
        self.step_kev
    }

    /// 起点能量（keV）
    pub fn start(&self) -> f64 {
        self.start_kev
    }

    /// 第 i 个网格点的能量（keV）
    pub fn energy(&self, i: usize) -> f64 {
        self.start_kev + i as f64 * self.step_kev
    }

    /// 终点能量（keV）
    pub fn max_energy(&self) -> f64 {
        self.energy(self.len - 1)
    }

    /// 所有网格点能量
    pub fn energies(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.energy(i)).collect()
    }

    /// 最近邻 bin 映射
    ///
    /// 将任意能量映射到最近的网格点下标，越界能量截断到边界 bin，
    /// 保证计数守恒。对已对齐的网格能量是幂等的。
    pub fn nearest_bin(&self, energy_kev: f64) -> usize {
        let steps = ((energy_kev - self.start_kev) / self.step_kev).round();
        if steps < 0.0 {
            0
        } else if steps >= (self.len - 1) as f64 {
            self.len - 1
        } else {
            steps as usize
        }
    }
}

/// 谱：能量网格 + 同长度强度序列
///
/// 各阶段产出的新谱持有自己的网格副本；不同网格的谱不允许逐 bin 合并。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    grid: EnergyGrid,
    intensities: Vec<f64>,
}

impl Spectrum {
    /// 从网格和强度序列创建谱
    pub fn new(grid: EnergyGrid, intensities: Vec<f64>) -> Result<Self> {
        if intensities.len() != grid.len() {
            return Err(XrfSimError::InvalidGrid(format!(
                "intensity length {} does not match grid length {}",
                intensities.len(),
                grid.len()
            )));
        }
        Ok(Self { grid, intensities })
    }

    /// 创建同网格的零谱
    pub fn zeros(grid: EnergyGrid) -> Self {
        Self {
            intensities: vec![0.0; grid.len()],
            grid,
        }
    }

    /// 网格
    pub fn grid(&self) -> &EnergyGrid {
        &self.grid
    }

    /// 强度序列
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// 可变强度序列（仅限本模块同网格操作使用）
    pub(crate) fn intensities_mut(&mut self) -> &mut [f64] {
        &mut self.intensities
    }

    /// 第 i 个 bin 的强度
    pub fn intensity(&self, i: usize) -> f64 {
        self.intensities[i]
    }

    /// 总计数（所有 bin 之和）
    pub fn total(&self) -> f64 {
        self.intensities.iter().sum()
    }

    /// 最大强度 bin 的 (下标, 能量, 强度)
    pub fn peak_bin(&self) -> (usize, f64, f64) {
        let mut idx = 0;
        let mut max = self.intensities[0];
        for (i, &v) in self.intensities.iter().enumerate().skip(1) {
            if v > max {
                max = v;
                idx = i;
            }
        }
        (idx, self.grid.energy(idx), max)
    }

    /// 按常数因子缩放，返回新谱
    pub fn scaled(&self, factor: f64) -> Spectrum {
        Spectrum {
            grid: self.grid,
            intensities: self.intensities.iter().map(|v| v * factor).collect(),
        }
    }

    /// 同网格谱逐 bin 相加，返回新谱
    pub fn add(&self, other: &Spectrum) -> Result<Spectrum> {
        if self.grid != other.grid {
            return Err(XrfSimError::GridMismatch(format!(
                "cannot add spectra: {} bins from {} keV vs {} bins from {} keV",
                self.grid.len(),
                self.grid.start(),
                other.grid.len(),
                other.grid.start()
            )));
        }
        let intensities = self
            .intensities
            .iter()
            .zip(other.intensities.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Spectrum {
            grid: self.grid,
            intensities,
        })
    }
}
