// crates/lh_physics/src/lib.rs

//! LagHydro 物理层
//!
//! 单元中心拉格朗日可压缩流求解器的算术核心：
//! - [`eos`]: 状态方程接口与理想气体闭合
//! - [`state`]: 流体场 SoA 存储与按名字段访问
//! - [`boundary`]: 边界条件（给定速度/给定压力/对称面）
//! - [`nodal`]: 角系数装配与逐顶点鞍点求解
//! - [`forces`]: 子单元力、守恒量更新与状态闭合
//! - [`timestep`]: 声学/体积/增长三重 CFL 限制
//! - [`driver`]: 预估-校正时间推进
//! - [`numerics`]: Kahan 求和与小规模稠密线性代数
//!
//! # 调度模型
//!
//! 每个相位是对单一实体集合的独立迭代（角装配写角、顶点求解写
//! 顶点、单元更新写单元、网格运动写坐标），相位之间全局同步，
//! 相位内部使用 rayon 数据并行。

#![warn(clippy::all)]

pub mod boundary;
pub mod driver;
pub mod eos;
pub mod error;
pub mod forces;
pub mod nodal;
pub mod numerics;
pub mod state;
pub mod timestep;

pub use boundary::{BoundaryCondition, BoundaryTable};
pub use driver::{
    ConservationTotals, IcsFn, LagrangianSolver, RunSummary, SolutionFrame, SolutionWriter,
    StepReport, TimeControls,
};
pub use eos::{CellThermo, EquationOfState, IdealGas};
pub use error::PhysicsError;
pub use state::{EntityKind, FieldView, HydroFields, StateError};
pub use timestep::{CflConfig, DtLimiter, TimeStepController};
