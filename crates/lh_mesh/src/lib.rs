// crates/lh_mesh/src/lib.rs

//! LagHydro 网格层
//!
//! 提供拉格朗日运动下的非结构多边形网格：
//! - [`topology`]: CSR 连接性存储
//! - [`shapes`]: 单元形状标签与边表
//! - [`tags`]: 边界标签位集
//! - [`builder`]: 从导入数据一次性构建拓扑（含角/楔枚举与校验）
//! - [`mesh`]: SoA 网格本体与邻接查询
//! - [`geometry`]: 与坐标保持一致的几何缓存
//! - [`generation`]: 结构化矩形/条带网格生成器
//!
//! # 生命周期
//!
//! 拓扑一次构建、运动期间不变；只有顶点坐标在网格运动步中变化，
//! 坐标变化后必须调用 [`geometry::GeometryCache::recompute`]。

#![warn(clippy::all)]

pub mod builder;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod mesh;
pub mod shapes;
pub mod tags;
pub mod topology;

pub use builder::{MeshBuilder, MeshImport, TaggedEdge};
pub use error::MeshError;
pub use geometry::{GeometryCache, MeshStatistics};
pub use mesh::Mesh;
pub use shapes::CellShape;
pub use tags::TagSet;
pub use topology::CsrConnectivity;
