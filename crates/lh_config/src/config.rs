// crates/lh_config/src/config.rs

//! 模拟配置
//!
//! 全部参数以 f64/usize 存储，JSON 序列化，逐字段默认值。
//! `validate()` 在配置期拒绝不合法取值，诊断带出键名、取值与原因。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use lh_physics::{CflConfig, EquationOfState, IdealGas, TimeControls};

/// 输出格式（选择写出器的文件后缀）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// VTK 传统 ASCII 格式
    #[default]
    Vtk,
    /// VTK XML 非结构网格格式
    Vtu,
    /// Tecplot ASCII 格式
    Dat,
}

impl OutputFormat {
    /// 文件扩展名
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Vtk => "vtk",
            Self::Vtu => "vtu",
            Self::Dat => "dat",
        }
    }
}

/// 状态方程配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EosConfig {
    /// 理想气体
    IdealGas {
        /// 气体常数 R
        gas_constant: f64,
        /// 定容比热 cᵥ
        specific_heat: f64,
    },
}

impl Default for EosConfig {
    fn default() -> Self {
        Self::IdealGas {
            gas_constant: 0.4,
            specific_heat: 1.0,
        }
    }
}

impl EosConfig {
    /// 实例化状态方程
    pub fn build(&self) -> Box<dyn EquationOfState> {
        match *self {
            Self::IdealGas {
                gas_constant,
                specific_heat,
            } => Box::new(IdealGas::new(gas_constant, specific_heat)),
        }
    }
}

/// 模拟配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 输出文件名前缀
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// 输出格式（后缀）
    #[serde(default)]
    pub format: OutputFormat,

    /// 输出间隔（步），0 关闭输出
    #[serde(default = "default_output_freq")]
    pub output_freq: usize,

    /// CFL 系数组
    #[serde(default)]
    pub cfl: CflConfig,

    /// 终止时刻
    #[serde(default = "default_final_time")]
    pub final_time: f64,

    /// 最大步数
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// 步长下限
    #[serde(default = "default_dt_floor")]
    pub dt_floor: f64,

    /// 状态方程
    #[serde(default)]
    pub eos: EosConfig,
}

fn default_prefix() -> String {
    "out".to_string()
}
fn default_output_freq() -> usize {
    10
}
fn default_final_time() -> f64 {
    1.0
}
fn default_max_steps() -> usize {
    1_000_000
}
fn default_dt_floor() -> f64 {
    1e-14
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            format: OutputFormat::default(),
            output_freq: default_output_freq(),
            cfl: CflConfig::default(),
            final_time: default_final_time(),
            max_steps: default_max_steps(),
            dt_floor: default_dt_floor(),
            eos: EosConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// 从 JSON 文件加载并校验
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: SimulationConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cfl.acoustic > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "cfl.acoustic".to_string(),
                value: self.cfl.acoustic.to_string(),
                reason: "声学 CFL 必须为正".to_string(),
            });
        }
        if !(self.cfl.volume > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "cfl.volume".to_string(),
                value: self.cfl.volume.to_string(),
                reason: "体积 CFL 必须为正".to_string(),
            });
        }
        if self.cfl.growth < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "cfl.growth".to_string(),
                value: self.cfl.growth.to_string(),
                reason: "增长率不能为负".to_string(),
            });
        }
        if !(self.final_time > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "final_time".to_string(),
                value: self.final_time.to_string(),
                reason: "终止时刻必须为正".to_string(),
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_steps".to_string(),
                value: "0".to_string(),
                reason: "最大步数必须为正".to_string(),
            });
        }
        if !(self.dt_floor > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "dt_floor".to_string(),
                value: self.dt_floor.to_string(),
                reason: "步长下限必须为正".to_string(),
            });
        }

        match self.eos {
            EosConfig::IdealGas {
                gas_constant,
                specific_heat,
            } => {
                if !(gas_constant > 0.0) || !(specific_heat > 0.0) {
                    return Err(ConfigError::InvalidValue {
                        key: "eos".to_string(),
                        value: format!("R = {}, cv = {}", gas_constant, specific_heat),
                        reason: "理想气体参数必须为正".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// 转换为时间推进控制参数
    pub fn time_controls(&self) -> TimeControls {
        TimeControls {
            cfl: self.cfl,
            final_time: self.final_time,
            max_steps: self.max_steps,
            output_freq: self.output_freq,
            dt_floor: self.dt_floor,
        }
    }

    /// 第 `step` 步的输出文件名: `{prefix}{step:07}.{ext}`
    pub fn output_filename(&self, step: usize) -> String {
        format!("{}{:07}.{}", self.prefix, step, self.format.extension())
    }
}

// ============================================================================
// 测试
// ============================================================================
