// crates/lh_physics/src/timestep.rs

//! 时间步长控制
//!
//! 三重限制取最小：
//!
//! 1. **声学**: `Δt_a = CFL_a · min_c L_c / c_c`，L_c 为单元最小
//!    特征长度
//! 2. **体积**: `Δt_v = CFL_v · min_c V_c / |dV_c/dt|`（dV/dt 为零
//!    的单元跳过）
//! 3. **增长**: `Δt_g = (1 + CFL_g) · Δt^n`（首步跳过）
//!
//! 并列时声学胜出，其次体积，最后增长（仅用于报告）。胜出的限制
//! 因子随步长一并返回给驱动。
//!
//! 逐单元归约使用位转换原子最大值，结果与线程数无关。

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;
use crate::state::HydroFields;
use lh_mesh::GeometryCache;

/// CFL 系数组
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CflConfig {
    /// 声学 CFL 系数
    pub acoustic: f64,
    /// 体积 CFL 系数
    pub volume: f64,
    /// 步间增长率（`Δt_g = (1+growth)·Δt^n`）
    pub growth: f64,
}

impl Default for CflConfig {
    fn default() -> Self {
        Self {
            acoustic: 0.25,
            volume: 0.1,
            growth: 0.05,
        }
    }
}

/// 胜出的时间步限制因子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DtLimiter {
    /// 声学（声波穿越时间）
    Acoustic,
    /// 体积（相对体积变化率）
    Volume,
    /// 增长（步间步长比上限）
    Growth,
}

impl std::fmt::Display for DtLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Acoustic => "acoustic",
            Self::Volume => "volume",
            Self::Growth => "growth",
        };
        write!(f, "{}", name)
    }
}

/// 时间步长控制器
#[derive(Debug, Clone)]
pub struct TimeStepController {
    cfl: CflConfig,
    dt_floor: f64,
    prev_dt: Option<f64>,
}

impl TimeStepController {
    /// 创建控制器
    pub fn new(cfl: CflConfig, dt_floor: f64) -> Self {
        Self {
            cfl,
            dt_floor,
            prev_dt: None,
        }
    }

    /// 上一步步长
    #[inline]
    pub fn prev_dt(&self) -> Option<f64> {
        self.prev_dt
    }

    /// CFL 系数组
    #[inline]
    pub fn cfl(&self) -> &CflConfig {
        &self.cfl
    }

    /// 计算当前步长及胜出限制因子
    ///
    /// 需要残差中的 `dV/dt`（先行的力评估相位写入）。步长低于下限
    /// 或时间尺度全部退化即致命。
    pub fn evaluate(
        &mut self,
        geom: &GeometryCache,
        fields: &HydroFields,
    ) -> Result<(f64, DtLimiter), PhysicsError> {
        let n_cells = fields.n_cells();

        // 并行收集最大逆时间尺度（位转换原子最大值，确定性归约）
        let acoustic_inv = AtomicU64::new(0.0f64.to_bits());
        let volume_inv = AtomicU64::new(0.0f64.to_bits());

        (0..n_cells).into_par_iter().for_each(|c| {
            // 声波穿越: c / L
            let dti = fields.cell_sound_speed[c] / geom.cell_min_length[c];
            acoustic_inv.fetch_max(dti.to_bits(), Ordering::Relaxed);

            // 相对体积变化率: |dV/dt| / V
            let dvdt = fields.residual_volume[c];
            if dvdt != 0.0 {
                let dti = dvdt.abs() / geom.cell_volume[c];
                volume_inv.fetch_max(dti.to_bits(), Ordering::Relaxed);
            }
        });

        let acoustic_inv = f64::from_bits(acoustic_inv.load(Ordering::Relaxed));
        let volume_inv = f64::from_bits(volume_inv.load(Ordering::Relaxed));

        if acoustic_inv <= 0.0 || !acoustic_inv.is_finite() {
            return Err(PhysicsError::NonFiniteTimeStep);
        }

        // 三重限制，声学并列优先，其次体积，最后增长
        let mut dt = self.cfl.acoustic / acoustic_inv;
        let mut limiter = DtLimiter::Acoustic;

        if volume_inv > 0.0 {
            let dt_vol = self.cfl.volume / volume_inv;
            if dt_vol < dt {
                dt = dt_vol;
                limiter = DtLimiter::Volume;
            }
        }

        if let Some(prev) = self.prev_dt {
            let dt_growth = (1.0 + self.cfl.growth) * prev;
            if dt_growth < dt {
                dt = dt_growth;
                limiter = DtLimiter::Growth;
            }
        }

        if dt < self.dt_floor {
            return Err(PhysicsError::TimeStepUnderflow {
                dt,
                floor: self.dt_floor,
                limiter,
            });
        }

        self.prev_dt = Some(dt);
        Ok((dt, limiter))
    }
}

// ============================================================================
// 测试
// ============================================================================
