// crates/lh_mesh/src/error.rs

//! 网格层错误类型

use lh_foundation::LhError;

/// 网格错误
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// 顶点索引越界
    #[error("单元 {cell} 引用了越界顶点 {vertex}（顶点总数 {n_vertices}）")]
    VertexOutOfRange {
        /// 单元索引
        cell: usize,
        /// 越界的顶点索引
        vertex: u32,
        /// 顶点总数
        n_vertices: usize,
    },

    /// 顶点环与形状标签不一致
    #[error("单元 {cell} 形状 {shape} 期望 {expected} 个顶点, 实际 {actual}")]
    RingShapeMismatch {
        /// 单元索引
        cell: usize,
        /// 形状名称
        shape: &'static str,
        /// 期望顶点数
        expected: usize,
        /// 实际顶点数
        actual: usize,
    },

    /// 退化单元（构建时面积非正）
    #[error("单元 {cell} 退化: 面积 {area:.3e} 非正")]
    DegenerateCell {
        /// 单元索引
        cell: usize,
        /// 符号面积
        area: f64,
    },

    /// 网格运动后单元翻转
    #[error("单元 {cell} 在网格运动后翻转: 体积 {volume:.3e} 非正")]
    TangledCell {
        /// 单元索引
        cell: usize,
        /// 当前体积
        volume: f64,
    },

    /// 非流形边（被三个以上单元共享）
    #[error("边 ({a}, {b}) 被两个以上单元共享")]
    NonManifoldEdge {
        /// 边的第一个顶点
        a: u32,
        /// 边的第二个顶点
        b: u32,
    },

    /// 边界标签引用了不存在的边
    #[error("边界标签 {tag} 引用的边 ({a}, {b}) 不存在")]
    UnknownTaggedEdge {
        /// 边的第一个顶点
        a: u32,
        /// 边的第二个顶点
        b: u32,
        /// 标签编号
        tag: u8,
    },

    /// 边界标签施加在内部边上
    #[error("边界标签 {tag} 施加在内部边 {edge} 上（该边有两个相邻单元）")]
    TagOnInteriorEdge {
        /// 边索引
        edge: usize,
        /// 标签编号
        tag: u8,
    },

    /// 标签编号超出位集容量
    #[error("标签编号 {tag} 超出容量（最大 {max}）")]
    TagOverflow {
        /// 标签编号
        tag: u8,
        /// 最大可用标签编号
        max: u8,
    },

    /// 拓扑不一致（孤立角/楔等构建后校验失败）
    #[error("拓扑不一致: {0}")]
    TopologyInconsistency(String),

    /// 几何闭合校验失败
    #[error("单元 {cell} 楔面法向不闭合: |Σ l·n| = {magnitude:.3e}")]
    ClosureViolation {
        /// 单元索引
        cell: usize,
        /// 残差模长
        magnitude: f64,
    },

    /// 基础层错误
    #[error(transparent)]
    Foundation(#[from] LhError),
}
