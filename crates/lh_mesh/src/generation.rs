// crates/lh_mesh/src/generation.rs

//! 结构化网格生成
//!
//! 生成带边界标签的矩形四边形网格，供验证算例与测试使用。
//! 一维算例（激波管）使用单层条带网格表达。

use glam::DVec2;

use crate::builder::{MeshImport, TaggedEdge};
use crate::shapes::CellShape;

/// 矩形域四边的边界标签
#[derive(Debug, Clone, Copy)]
pub struct SideTags {
    /// 左边界 (x = x0)
    pub left: u8,
    /// 右边界 (x = x1)
    pub right: u8,
    /// 下边界 (y = y0)
    pub bottom: u8,
    /// 上边界 (y = y1)
    pub top: u8,
}

impl Default for SideTags {
    fn default() -> Self {
        Self {
            left: 0,
            right: 1,
            bottom: 2,
            top: 3,
        }
    }
}

/// 生成 nx x ny 的结构化四边形网格
///
/// 域为 `[x0, x1] x [y0, y1]`，单元逐行（y 方向外层）编号，
/// 全部外部边按四边标签标记。
pub fn rectangle(
    nx: usize,
    ny: usize,
    bounds: [f64; 4],
    tags: SideTags,
) -> MeshImport {
    let [x0, x1, y0, y1] = bounds;
    let dx = (x1 - x0) / nx as f64;
    let dy = (y1 - y0) / ny as f64;

    let mut coords = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            coords.push(DVec2::new(x0 + i as f64 * dx, y0 + j as f64 * dy));
        }
    }

    let node = |i: usize, j: usize| -> u32 { (j * (nx + 1) + i) as u32 };

    let mut cell_rings = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            cell_rings.push(vec![
                node(i, j),
                node(i + 1, j),
                node(i + 1, j + 1),
                node(i, j + 1),
            ]);
        }
    }

    let n_cells = cell_rings.len();

    let mut tagged_edges = Vec::with_capacity(2 * (nx + ny));
    for j in 0..ny {
        tagged_edges.push(TaggedEdge::new(node(0, j), node(0, j + 1), tags.left));
        tagged_edges.push(TaggedEdge::new(node(nx, j), node(nx, j + 1), tags.right));
    }
    for i in 0..nx {
        tagged_edges.push(TaggedEdge::new(node(i, 0), node(i + 1, 0), tags.bottom));
        tagged_edges.push(TaggedEdge::new(node(i, ny), node(i + 1, ny), tags.top));
    }

    MeshImport {
        coords,
        cell_rings,
        cell_shapes: vec![CellShape::Quad; n_cells],
        cell_regions: vec![0; n_cells],
        tagged_edges,
    }
}

/// 生成一维条带网格（nx x 1 四边形）
///
/// 一维问题的标准表达：x 方向 nx 个单元、y 方向单层，
/// 上下边界由调用方配置为对称面。
pub fn strip(nx: usize, x0: f64, x1: f64, thickness: f64, tags: SideTags) -> MeshImport {
    rectangle(nx, 1, [x0, x1, 0.0, thickness], tags)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryCache;

    #[test]
    fn test_rectangle_counts() {
        let mesh = rectangle(3, 2, [0.0, 3.0, 0.0, 2.0], SideTags::default())
            .build()
            .unwrap();
        assert_eq!(mesh.n_cells(), 6);
        assert_eq!(mesh.n_vertices(), 12);
        // 边数: 水平 3*3 + 垂直 4*2 = 17
        assert_eq!(mesh.n_edges(), 17);
        assert_eq!(mesh.n_corners(), 24);
    }

    #[test]
    fn test_rectangle_geometry() {
        let mesh = rectangle(4, 4, [0.0, 1.0, 0.0, 1.0], SideTags::default())
            .build()
            .unwrap();
        let geom = GeometryCache::compute(&mesh).unwrap();
        let total: f64 = geom.cell_volume.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        for cell in mesh.cells() {
            assert!((geom.cell_volume[cell] - 0.0625).abs() < 1e-14);
            assert!((geom.cell_min_length[cell] - 0.25).abs() < 1e-14);
        }
        geom.validate_closure(&mesh).unwrap();
    }

    #[test]
    fn test_rectangle_boundary_tags() {
        let tags = SideTags {
            left: 0,
            right: 1,
            bottom: 2,
            top: 3,
        };
        let mesh = rectangle(2, 2, [0.0, 1.0, 0.0, 1.0], tags).build().unwrap();

        for e in mesh.edges() {
            if mesh.is_exterior_edge(e) {
                assert!(mesh.is_boundary_edge(e), "外部边 {} 缺少标签", e);
            } else {
                assert!(!mesh.is_boundary_edge(e));
            }
        }

        // 四个域角顶点各携带两个标签
        let corner_vertex = mesh
            .vertices()
            .find(|&v| mesh.coord(v) == DVec2::new(0.0, 0.0))
            .unwrap();
        let tags = mesh.vertex_tags(corner_vertex);
        assert!(tags.contains(0) && tags.contains(2));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_strip() {
        let mesh = strip(10, -0.5, 0.5, 0.01, SideTags::default()).build().unwrap();
        assert_eq!(mesh.n_cells(), 10);
        let geom = GeometryCache::compute(&mesh).unwrap();
        let total: f64 = geom.cell_volume.iter().sum();
        assert!((total - 0.01).abs() < 1e-14);
    }
}
