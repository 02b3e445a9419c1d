// crates/lh_physics/src/boundary.rs

//! 边界条件
//!
//! 三类条件作用于节点求解：
//! - **给定速度**: 顶点速度直接取回调值，跳过装配
//! - **给定压力**: 对携带该标签的边界楔从右端项扣除 `l·p_bc·n`
//! - **对称面**: 纯几何约束，按标签累积约束法向 `s = Σ l·n`，
//!   不同标签的法向保持独立，各自成为一行拉格朗日约束
//!
//! 回调签名与初始条件一致，均为 `(x, t)` 的纯函数。

use std::sync::Arc;

use glam::DVec2;

use crate::error::PhysicsError;
use lh_foundation::EdgeIndex;
use lh_mesh::Mesh;

/// 速度回调
pub type VelocityFn = dyn Fn(DVec2, f64) -> DVec2 + Send + Sync;

/// 压力回调
pub type PressureFn = dyn Fn(DVec2, f64) -> f64 + Send + Sync;

/// 单个边界条件
#[derive(Clone)]
pub struct BoundaryCondition {
    name: String,
    prescribed_velocity: Option<Arc<VelocityFn>>,
    prescribed_pressure: Option<Arc<PressureFn>>,
    symmetry: bool,
}

impl std::fmt::Debug for BoundaryCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryCondition")
            .field("name", &self.name)
            .field("has_prescribed_velocity", &self.has_prescribed_velocity())
            .field("has_prescribed_pressure", &self.has_prescribed_pressure())
            .field("has_symmetry", &self.symmetry)
            .finish()
    }
}

impl BoundaryCondition {
    /// 给定速度条件
    pub fn prescribed_velocity(
        name: impl Into<String>,
        velocity: impl Fn(DVec2, f64) -> DVec2 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            prescribed_velocity: Some(Arc::new(velocity)),
            prescribed_pressure: None,
            symmetry: false,
        }
    }

    /// 给定压力条件
    pub fn prescribed_pressure(
        name: impl Into<String>,
        pressure: impl Fn(DVec2, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            prescribed_velocity: None,
            prescribed_pressure: Some(Arc::new(pressure)),
            symmetry: false,
        }
    }

    /// 恒定压力条件（便捷构造）
    pub fn constant_pressure(name: impl Into<String>, p: f64) -> Self {
        Self::prescribed_pressure(name, move |_, _| p)
    }

    /// 对称面条件（纯几何）
    pub fn symmetry(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prescribed_velocity: None,
            prescribed_pressure: None,
            symmetry: true,
        }
    }

    /// 条件名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否给定速度
    #[inline]
    pub fn has_prescribed_velocity(&self) -> bool {
        self.prescribed_velocity.is_some()
    }

    /// 是否给定压力
    #[inline]
    pub fn has_prescribed_pressure(&self) -> bool {
        self.prescribed_pressure.is_some()
    }

    /// 是否为对称面
    #[inline]
    pub fn has_symmetry(&self) -> bool {
        self.symmetry
    }

    /// 取边界速度（未给定时为零）
    #[inline]
    pub fn velocity(&self, x: DVec2, t: f64) -> DVec2 {
        match &self.prescribed_velocity {
            Some(f) => f(x, t),
            None => DVec2::ZERO,
        }
    }

    /// 取边界压力（未给定时为零）
    #[inline]
    pub fn pressure(&self, x: DVec2, t: f64) -> f64 {
        match &self.prescribed_pressure {
            Some(f) => f(x, t),
            None => 0.0,
        }
    }
}

/// 标签 -> 边界条件表
#[derive(Debug, Clone, Default)]
pub struct BoundaryTable {
    conditions: Vec<Option<BoundaryCondition>>,
}

impl BoundaryTable {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册标签的边界条件（链式）
    pub fn with(mut self, tag: u8, condition: BoundaryCondition) -> Self {
        self.insert(tag, condition);
        self
    }

    /// 注册标签的边界条件
    pub fn insert(&mut self, tag: u8, condition: BoundaryCondition) {
        let idx = tag as usize;
        if idx >= self.conditions.len() {
            self.conditions.resize(idx + 1, None);
        }
        self.conditions[idx] = Some(condition);
    }

    /// 查询标签的边界条件
    #[inline]
    pub fn get(&self, tag: u8) -> Option<&BoundaryCondition> {
        self.conditions.get(tag as usize).and_then(|c| c.as_ref())
    }

    /// 配置期校验
    ///
    /// 每条外部边必须携带至少一个标签，且每个出现的标签必须在表中
    /// 注册；违反者在配置期致命。
    pub fn validate_against(&self, mesh: &Mesh) -> Result<(), PhysicsError> {
        for e in mesh.edges() {
            if !mesh.is_exterior_edge(e) {
                continue;
            }
            let tags = mesh.edge_tags(e);
            if tags.is_empty() {
                let [a, b] = mesh.edge_vertices(e);
                return Err(PhysicsError::UntaggedExteriorEdge {
                    edge: EdgeIndex::from_usize(e),
                    a,
                    b,
                });
            }
            for tag in tags.iter() {
                if self.get(tag).is_none() {
                    return Err(PhysicsError::UnboundTag { tag });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// 测试
// ============================================================================
