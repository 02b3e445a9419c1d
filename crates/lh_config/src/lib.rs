// crates/lh_config/src/lib.rs

//! LagHydro 配置层
//!
//! 可序列化的模拟配置（JSON），带逐字段默认值与配置期校验。
//! 初始条件与边界条件表是运行时对象（闭包），由调用方在构建
//! 求解器时直接提供，不参与序列化。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;

pub use config::{EosConfig, OutputFormat, SimulationConfig};
pub use error::ConfigError;
