// crates/lh_mesh/src/shapes.rs

//! 单元形状标签
//!
//! 形状差异以标签加数据表表达：边表（哪两个环位置构成一条边）
//! 由环长直接确定，角/楔分解对所有多边形一致。

use serde::{Deserialize, Serialize};

/// 单元形状标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CellShape {
    /// 三角形
    Triangle = 0,
    /// 四边形
    Quad = 1,
    /// 一般多边形（顶点数不定）
    Polygon = 2,
}

impl CellShape {
    /// 形状名称
    pub const fn name(self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Quad => "quad",
            Self::Polygon => "polygon",
        }
    }

    /// 固定顶点数（多边形返回 None）
    pub const fn ring_len(self) -> Option<usize> {
        match self {
            Self::Triangle => Some(3),
            Self::Quad => Some(4),
            Self::Polygon => None,
        }
    }

    /// 校验顶点环长度是否匹配形状
    pub fn accepts_ring_len(self, n: usize) -> bool {
        match self.ring_len() {
            Some(expected) => n == expected,
            None => n >= 3,
        }
    }

    /// 由环长推断形状
    pub const fn from_ring_len(n: usize) -> Self {
        match n {
            3 => Self::Triangle,
            4 => Self::Quad,
            _ => Self::Polygon,
        }
    }
}

impl std::fmt::Display for CellShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 环位置 `i` 的单元边：连接环顶点 `(i, (i+1) % n)`
///
/// 每个环位置 `i` 的角关联两条边：前序边 `(i+n-1) % n` 与后继边 `i`。
/// 这是角/楔分解的数据表，对所有平面形状一致。
#[inline]
pub const fn ring_edge_endpoints(i: usize, n: usize) -> (usize, usize) {
    (i, (i + 1) % n)
}

/// 环位置 `i` 的角所关联的两条单元边（前序边, 后继边）
#[inline]
pub const fn corner_edges(i: usize, n: usize) -> (usize, usize) {
    ((i + n - 1) % n, i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_len() {
        assert_eq!(CellShape::Triangle.ring_len(), Some(3));
        assert_eq!(CellShape::Quad.ring_len(), Some(4));
        assert_eq!(CellShape::Polygon.ring_len(), None);
    }

    #[test]
    fn test_accepts_ring_len() {
        assert!(CellShape::Triangle.accepts_ring_len(3));
        assert!(!CellShape::Triangle.accepts_ring_len(4));
        assert!(CellShape::Polygon.accepts_ring_len(5));
        assert!(!CellShape::Polygon.accepts_ring_len(2));
    }

    #[test]
    fn test_from_ring_len() {
        assert_eq!(CellShape::from_ring_len(3), CellShape::Triangle);
        assert_eq!(CellShape::from_ring_len(4), CellShape::Quad);
        assert_eq!(CellShape::from_ring_len(6), CellShape::Polygon);
    }

    #[test]
    fn test_corner_edges_quad() {
        // 四边形角 0 关联边 3（前序）和边 0（后继）
        assert_eq!(corner_edges(0, 4), (3, 0));
        assert_eq!(corner_edges(1, 4), (0, 1));
        assert_eq!(corner_edges(3, 4), (2, 3));
    }

    #[test]
    fn test_ring_edge_endpoints() {
        assert_eq!(ring_edge_endpoints(3, 4), (3, 0));
        assert_eq!(ring_edge_endpoints(0, 3), (0, 1));
    }
}
