// crates/lh_physics/src/eos.rs

//! 状态方程
//!
//! 求解器核心只通过 [`EquationOfState`] 的两个闭合入口消费状态方程：
//! `update_from_pressure`（初始化路径，已知 ρ、p）与
//! `update_from_energy`（更新路径，已知 ρ、e）。其余热力学细节对
//! 核心不可见。
//!
//! 参考闭合为理想气体: `p = (γ-1)·ρ·e`, `c = sqrt(γ·p/ρ)`,
//! 阻抗倍率 `Γ = (γ+1)/2`（仅作为扩展接口保留，节点求解器使用
//! 经典阻抗 `z = ρ·c`）。

use serde::{Deserialize, Serialize};

/// 单元热力学状态（闭合入口的输入输出包）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellThermo {
    /// 密度 ρ
    pub density: f64,
    /// 压力 p
    pub pressure: f64,
    /// 比内能 e
    pub internal_energy: f64,
    /// 温度 T
    pub temperature: f64,
    /// 声速 c
    pub sound_speed: f64,
}

/// 状态方程接口
///
/// 实现必须是纯函数式的（可重入、无内部状态），以便在相位内
/// 跨线程共享。
pub trait EquationOfState: Send + Sync {
    /// 闭合名称（诊断用）
    fn name(&self) -> &'static str;

    /// 由 (ρ, p) 闭合 e、T、c
    fn update_from_pressure(&self, s: &mut CellThermo);

    /// 由 (ρ, e) 闭合 p、T、c
    fn update_from_energy(&self, s: &mut CellThermo);

    /// 阻抗倍率 Γ
    ///
    /// Burton 形式阻抗 `z = ρ(c + Γ|Δu·n|)` 的系数。当前节点求解器
    /// 固定使用 `z = ρc`，此接口为扩展保留。
    fn impedance_multiplier(&self) -> f64;
}

/// 理想气体状态方程
///
/// 由气体常数 R 与定容比热 cᵥ 参数化: `γ = 1 + R/cᵥ`, `T = e/cᵥ`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdealGas {
    gamma: f64,
    specific_heat: f64,
}

impl IdealGas {
    /// 由气体常数与定容比热创建
    pub fn new(gas_constant: f64, specific_heat: f64) -> Self {
        Self {
            gamma: 1.0 + gas_constant / specific_heat,
            specific_heat,
        }
    }

    /// 由绝热指数与定容比热创建（验证算例常用）
    pub fn from_gamma(gamma: f64, specific_heat: f64) -> Self {
        Self {
            gamma,
            specific_heat,
        }
    }

    /// 绝热指数 γ
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl EquationOfState for IdealGas {
    fn name(&self) -> &'static str {
        "ideal_gas"
    }

    fn update_from_pressure(&self, s: &mut CellThermo) {
        s.internal_energy = s.pressure / ((self.gamma - 1.0) * s.density);
        s.temperature = s.internal_energy / self.specific_heat;
        s.sound_speed = (self.gamma * s.pressure / s.density).sqrt();
    }

    fn update_from_energy(&self, s: &mut CellThermo) {
        s.pressure = (self.gamma - 1.0) * s.density * s.internal_energy;
        s.temperature = s.internal_energy / self.specific_heat;
        s.sound_speed = (self.gamma * s.pressure / s.density).sqrt();
    }

    fn impedance_multiplier(&self) -> f64 {
        0.5 * (self.gamma + 1.0)
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_gamma_from_gas_constant() {
        // R = 0.4, cv = 1.0 -> γ = 1.4
        let eos = IdealGas::new(0.4, 1.0);
        assert!((eos.gamma() - 1.4).abs() < EPS);
    }

    #[test]
    fn test_update_from_pressure() {
        let eos = IdealGas::from_gamma(1.4, 1.0);
        let mut s = CellThermo {
            density: 1.0,
            pressure: 1.0,
            ..Default::default()
        };
        eos.update_from_pressure(&mut s);
        // e = p / ((γ-1)ρ) = 1 / 0.4 = 2.5
        assert!((s.internal_energy - 2.5).abs() < EPS);
        // c = sqrt(γ p / ρ) = sqrt(1.4)
        assert!((s.sound_speed - 1.4f64.sqrt()).abs() < EPS);
        assert!((s.temperature - 2.5).abs() < EPS);
    }

    #[test]
    fn test_update_from_energy_roundtrip() {
        let eos = IdealGas::from_gamma(5.0 / 3.0, 1.0);
        let mut s = CellThermo {
            density: 16.0,
            pressure: 2.0,
            ..Default::default()
        };
        eos.update_from_pressure(&mut s);
        let e = s.internal_energy;

        let mut t = CellThermo {
            density: 16.0,
            internal_energy: e,
            ..Default::default()
        };
        eos.update_from_energy(&mut t);
        assert!((t.pressure - 2.0).abs() < EPS);
        assert!((t.sound_speed - s.sound_speed).abs() < EPS);
    }

    #[test]
    fn test_impedance_multiplier() {
        let eos = IdealGas::from_gamma(1.4, 1.0);
        assert!((eos.impedance_multiplier() - 1.2).abs() < EPS);
    }
}
