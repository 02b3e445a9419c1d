// crates/lh_physics/src/error.rs

//! 物理层错误类型

use crate::state::StateError;
use crate::timestep::DtLimiter;
use lh_foundation::{CellIndex, EdgeIndex, VertexIndex};
use lh_mesh::MeshError;

/// 物理层错误
///
/// 所有致命错误在步内中止并携带单行诊断；驱动保证致命退出时
/// 状态停留在最后一个完整完成的时间步。
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// 节点系统退化（如两个平行对称面约束压垮解空间）
    #[error("顶点 {vertex} 的节点系统退化 (边界标签 {tags}): {detail}")]
    DegenerateNodalSystem {
        /// 顶点索引
        vertex: VertexIndex,
        /// 该顶点的边界标签集
        tags: String,
        /// 具体原因
        detail: &'static str,
    },

    /// 时间步长低于下限
    #[error("时间步长 {dt:.3e} 低于下限 {floor:.3e} (限制因子: {limiter})")]
    TimeStepUnderflow {
        /// 选出的时间步长
        dt: f64,
        /// 配置的下限
        floor: f64,
        /// 胜出的限制因子
        limiter: DtLimiter,
    },

    /// 时间尺度全部为零，步长发散
    #[error("时间步长发散: 全部单元的声学与体积时间尺度为零")]
    NonFiniteTimeStep,

    /// 更新后出现非物理状态
    #[error("单元 {cell} 状态非物理: {quantity} = {value:.6e}")]
    NonPhysicalState {
        /// 单元索引
        cell: CellIndex,
        /// 量名
        quantity: &'static str,
        /// 量值
        value: f64,
    },

    /// 网格边界标签未配置边界条件
    #[error("边界标签 {tag} 未配置边界条件")]
    UnboundTag {
        /// 标签编号
        tag: u8,
    },

    /// 外部边未携带任何边界标签
    #[error("外部边 {edge} (顶点 {a}-{b}) 未携带边界标签")]
    UntaggedExteriorEdge {
        /// 边索引
        edge: EdgeIndex,
        /// 边顶点
        a: u32,
        /// 边顶点
        b: u32,
    },

    /// 网格层错误
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// 状态场错误
    #[error(transparent)]
    State(#[from] StateError),
}
