// crates/lh_geo/src/lib.rs

//! LagHydro 几何层
//!
//! 提供平面多边形与线段的封闭形式几何内核。
//! 本层不持有网格数据，所有函数均为纯函数，输入为顶点坐标序列。
//!
//! 计算向量类型统一使用 [`glam::DVec2`]。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kernels;

pub use kernels::{
    polygon_centroid, polygon_min_length, polygon_signed_area, segment_length, segment_midpoint,
    segment_outward_normal,
};
