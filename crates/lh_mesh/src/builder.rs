// crates/lh_mesh/src/builder.rs

//! 网格构建
//!
//! 从导入数据（顶点坐标、单元顶点环+形状+区域号、边界标签）一次性
//! 构建完整拓扑：边去重与 owner/neighbor、角/楔枚举、顶点邻接表、
//! 标签传播与构建期校验。
//!
//! # 构建期校验（致命错误）
//!
//! - 顶点环引用越界顶点
//! - 环长与形状标签不匹配
//! - 面积非正的退化单元
//! - 被两个以上单元共享的非流形边
//! - 标签引用不存在的边或内部边
//!
//! # 角与楔
//!
//! 角是 (单元, 顶点) 关联，按环位置顺序编号。环位置 i 的角关联
//! 两条单元边（前序边与后继边），各贡献一个楔；角内两个楔按
//! 全局边号升序排列，与角连续存储。

use std::collections::HashMap;

use glam::DVec2;
use log::debug;

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::shapes::{corner_edges, CellShape};
use crate::tags::{TagSet, MAX_TAG};
use crate::topology::CsrConnectivity;
use lh_foundation::index::INVALID_INDEX;

/// 带标签的边界边（以顶点对标识）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedEdge {
    /// 边的一个顶点
    pub a: u32,
    /// 边的另一个顶点
    pub b: u32,
    /// 边界标签编号
    pub tag: u8,
}

impl TaggedEdge {
    /// 创建带标签边
    pub fn new(a: u32, b: u32, tag: u8) -> Self {
        Self { a, b, tag }
    }
}

/// 网格导入数据
///
/// 调用方（网格读取器、生成器）提供的全部拓扑输入。
#[derive(Debug, Clone, Default)]
pub struct MeshImport {
    /// 顶点坐标
    pub coords: Vec<DVec2>,
    /// 单元顶点环（任意环向，构建时统一为 CCW）
    pub cell_rings: Vec<Vec<u32>>,
    /// 单元形状标签（与 `cell_rings` 对齐）
    pub cell_shapes: Vec<CellShape>,
    /// 单元区域号（与 `cell_rings` 对齐）
    pub cell_regions: Vec<u32>,
    /// 边界边标签
    pub tagged_edges: Vec<TaggedEdge>,
}

impl MeshImport {
    /// 直接构建网格（便捷方法）
    pub fn build(self) -> Result<Mesh, MeshError> {
        MeshBuilder::new(self).build()
    }
}

/// 网格构建器
pub struct MeshBuilder {
    import: MeshImport,
}

impl MeshBuilder {
    /// 创建构建器
    pub fn new(import: MeshImport) -> Self {
        Self { import }
    }

    /// 执行构建
    pub fn build(self) -> Result<Mesh, MeshError> {
        let MeshImport {
            coords,
            mut cell_rings,
            cell_shapes,
            cell_regions,
            tagged_edges,
        } = self.import;

        let n_vertices = coords.len();
        let n_cells = cell_rings.len();

        // ---- 环校验与 CCW 统一 ----
        for (cell, ring) in cell_rings.iter_mut().enumerate() {
            let shape = cell_shapes[cell];
            if !shape.accepts_ring_len(ring.len()) {
                return Err(MeshError::RingShapeMismatch {
                    cell,
                    shape: shape.name(),
                    expected: shape.ring_len().unwrap_or(3),
                    actual: ring.len(),
                });
            }
            for (i, &v) in ring.iter().enumerate() {
                if v as usize >= n_vertices {
                    return Err(MeshError::VertexOutOfRange {
                        cell,
                        vertex: v,
                        n_vertices,
                    });
                }
                if ring[..i].contains(&v) {
                    return Err(MeshError::TopologyInconsistency(format!(
                        "单元 {} 的顶点环重复引用顶点 {}",
                        cell, v
                    )));
                }
            }

            let pts: Vec<DVec2> = ring.iter().map(|&v| coords[v as usize]).collect();
            let area = lh_geo::polygon_signed_area(&pts);
            if area < 0.0 {
                ring.reverse();
            } else if area == 0.0 || !area.is_finite() {
                return Err(MeshError::DegenerateCell { cell, area });
            }
        }

        // ---- 边去重: 无序顶点对 -> 边号 ----
        let mut edge_map: HashMap<(u32, u32), u32> = HashMap::new();
        let mut edge_vertices: Vec<[u32; 2]> = Vec::new();
        let mut edge_owner: Vec<u32> = Vec::new();
        let mut edge_neighbor: Vec<u32> = Vec::new();
        let mut cell_edge_rows: Vec<Vec<u32>> = Vec::with_capacity(n_cells);

        for (cell, ring) in cell_rings.iter().enumerate() {
            let n = ring.len();
            let mut row = Vec::with_capacity(n);
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                let key = (a.min(b), a.max(b));
                let edge = match edge_map.get(&key) {
                    Some(&e) => {
                        if edge_neighbor[e as usize] != INVALID_INDEX {
                            return Err(MeshError::NonManifoldEdge { a: key.0, b: key.1 });
                        }
                        edge_neighbor[e as usize] = cell as u32;
                        e
                    }
                    None => {
                        let e = edge_vertices.len() as u32;
                        edge_map.insert(key, e);
                        edge_vertices.push([a, b]);
                        edge_owner.push(cell as u32);
                        edge_neighbor.push(INVALID_INDEX);
                        e
                    }
                };
                row.push(edge);
            }
            cell_edge_rows.push(row);
        }

        let n_edges = edge_vertices.len();

        // ---- 边界标签 ----
        let mut edge_tags = vec![TagSet::EMPTY; n_edges];
        for te in &tagged_edges {
            if te.tag > MAX_TAG {
                return Err(MeshError::TagOverflow {
                    tag: te.tag,
                    max: MAX_TAG,
                });
            }
            let key = (te.a.min(te.b), te.a.max(te.b));
            let edge = *edge_map.get(&key).ok_or(MeshError::UnknownTaggedEdge {
                a: key.0,
                b: key.1,
                tag: te.tag,
            })?;
            if edge_neighbor[edge as usize] != INVALID_INDEX {
                return Err(MeshError::TagOnInteriorEdge {
                    edge: edge as usize,
                    tag: te.tag,
                });
            }
            edge_tags[edge as usize].insert(te.tag);
        }

        // ---- 角与楔枚举 ----
        let n_corners: usize = cell_rings.iter().map(|r| r.len()).sum();
        let mut corner_cell = Vec::with_capacity(n_corners);
        let mut corner_vertex = Vec::with_capacity(n_corners);
        let mut cell_corner_rows: Vec<Vec<u32>> = Vec::with_capacity(n_cells);
        let mut wedge_cell = Vec::with_capacity(2 * n_corners);
        let mut wedge_edge = Vec::with_capacity(2 * n_corners);
        let mut wedge_vertex = Vec::with_capacity(2 * n_corners);

        for (cell, ring) in cell_rings.iter().enumerate() {
            let n = ring.len();
            let edges = &cell_edge_rows[cell];
            let mut row = Vec::with_capacity(n);
            for i in 0..n {
                let corner = corner_cell.len() as u32;
                let v = ring[i];
                corner_cell.push(cell as u32);
                corner_vertex.push(v);
                row.push(corner);

                // 角内两个楔按全局边号升序排列
                let (prev, next) = corner_edges(i, n);
                let mut pair = [edges[prev], edges[next]];
                pair.sort_unstable();
                for e in pair {
                    wedge_cell.push(cell as u32);
                    wedge_edge.push(e);
                    wedge_vertex.push(v);
                }
            }
            cell_corner_rows.push(row);
        }

        // ---- 顶点标签: 关联边界边标签的并集 ----
        let mut vertex_tags = vec![TagSet::EMPTY; n_vertices];
        for (edge, tags) in edge_tags.iter().enumerate() {
            if !tags.is_empty() {
                for &v in &edge_vertices[edge] {
                    vertex_tags[v as usize] = vertex_tags[v as usize].union(*tags);
                }
            }
        }

        // ---- 顶点/边邻接表（计数排序，行内升序） ----
        let vertex_corners = CsrConnectivity::inverse_of(&corner_vertex, n_vertices);
        let vertex_wedges = CsrConnectivity::inverse_of(&wedge_vertex, n_vertices);
        let edge_wedges = CsrConnectivity::inverse_of(&wedge_edge, n_edges);
        let vertex_cells = {
            let rows: Vec<Vec<u32>> = (0..n_vertices)
                .map(|v| {
                    vertex_corners
                        .row(v)
                        .iter()
                        .map(|&cn| corner_cell[cn as usize])
                        .collect()
                })
                .collect();
            CsrConnectivity::from_rows(rows)
        };

        let mesh = Mesh {
            coords,
            vertex_tags,
            coord_epoch: 0,
            cell_shape: cell_shapes,
            cell_region: cell_regions,
            cell_vertices: CsrConnectivity::from_rows(cell_rings),
            cell_edges: CsrConnectivity::from_rows(cell_edge_rows),
            cell_corners: CsrConnectivity::from_rows(cell_corner_rows),
            edge_vertices,
            edge_owner,
            edge_neighbor,
            edge_tags,
            corner_cell,
            corner_vertex,
            wedge_cell,
            wedge_edge,
            wedge_vertex,
            vertex_corners,
            vertex_cells,
            vertex_wedges,
            edge_wedges,
        };

        mesh.validate_incidence()?;

        debug!(
            "网格构建完成: {} 单元, {} 边, {} 顶点, {} 角, {} 楔",
            mesh.n_cells(),
            mesh.n_edges(),
            mesh.n_vertices(),
            mesh.n_corners(),
            mesh.n_wedges()
        );

        Ok(mesh)
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x1 的两个单位正方形单元，共享中间边
    fn two_quads() -> MeshImport {
        MeshImport {
            coords: vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(2.0, 0.0),
                DVec2::new(0.0, 1.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(2.0, 1.0),
            ],
            cell_rings: vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4]],
            cell_shapes: vec![CellShape::Quad, CellShape::Quad],
            cell_regions: vec![0, 0],
            tagged_edges: vec![TaggedEdge::new(0, 3, 0), TaggedEdge::new(2, 5, 1)],
        }
    }

    #[test]
    fn test_build_two_quads() {
        let mesh = two_quads().build().unwrap();
        assert_eq!(mesh.n_cells(), 2);
        assert_eq!(mesh.n_vertices(), 6);
        // 7 条边：外围 6 + 共享 1
        assert_eq!(mesh.n_edges(), 7);
        assert_eq!(mesh.n_corners(), 8);
        assert_eq!(mesh.n_wedges(), 16);
    }

    #[test]
    fn test_shared_edge_owner_neighbor() {
        let mesh = two_quads().build().unwrap();
        // 共享边 (1,4)
        let shared = mesh
            .edges()
            .find(|&e| {
                let [a, b] = mesh.edge_vertices(e);
                (a.min(b), a.max(b)) == (1, 4)
            })
            .unwrap();
        assert_eq!(mesh.edge_owner(shared), 0);
        assert_eq!(mesh.edge_neighbor(shared), Some(1));
        assert!(!mesh.is_exterior_edge(shared));
    }

    #[test]
    fn test_cw_ring_is_reoriented() {
        let mut import = two_quads();
        // 第一个单元改为顺时针
        import.cell_rings[0] = vec![3, 4, 1, 0];
        let mesh = import.build().unwrap();
        let ring = mesh.cell_vertices(0);
        let pts: Vec<DVec2> = ring.iter().map(|&v| mesh.coord(v as usize)).collect();
        assert!(lh_geo::polygon_signed_area(&pts) > 0.0);
    }

    #[test]
    fn test_degenerate_cell_rejected() {
        let mut import = two_quads();
        // 顶点 4 压到顶点 1 上，使单元 1 面积为零
        import.coords[4] = import.coords[1];
        import.coords[5] = import.coords[2];
        let err = import.build().unwrap_err();
        assert!(matches!(err, MeshError::DegenerateCell { .. }));
    }

    #[test]
    fn test_duplicate_ring_vertex_rejected() {
        let mut import = two_quads();
        import.cell_rings[0] = vec![0, 1, 4, 1];
        let err = import.build().unwrap_err();
        assert!(matches!(err, MeshError::TopologyInconsistency(_)));
    }

    #[test]
    fn test_vertex_out_of_range() {
        let mut import = two_quads();
        import.cell_rings[1][2] = 99;
        let err = import.build().unwrap_err();
        assert!(matches!(err, MeshError::VertexOutOfRange { .. }));
    }

    #[test]
    fn test_ring_shape_mismatch() {
        let mut import = two_quads();
        import.cell_shapes[0] = CellShape::Triangle;
        let err = import.build().unwrap_err();
        assert!(matches!(err, MeshError::RingShapeMismatch { .. }));
    }

    #[test]
    fn test_tag_on_interior_edge_rejected() {
        let mut import = two_quads();
        import.tagged_edges.push(TaggedEdge::new(1, 4, 2));
        let err = import.build().unwrap_err();
        assert!(matches!(err, MeshError::TagOnInteriorEdge { .. }));
    }

    #[test]
    fn test_unknown_tagged_edge_rejected() {
        let mut import = two_quads();
        import.tagged_edges.push(TaggedEdge::new(0, 5, 2));
        let err = import.build().unwrap_err();
        assert!(matches!(err, MeshError::UnknownTaggedEdge { .. }));
    }

    #[test]
    fn test_vertex_boundary_tags_are_union() {
        let mesh = two_quads().build().unwrap();
        // 顶点 0 在标签 0 的边上
        assert!(mesh.vertex_tags(0).contains(0));
        assert!(mesh.is_boundary_vertex(0));
        // 顶点 4 只关联内部边与无标签外部边
        assert!(!mesh.is_boundary_vertex(4));
    }

    #[test]
    fn test_corner_wedge_incidence() {
        let mesh = two_quads().build().unwrap();
        for cn in mesh.corners() {
            let [w0, w1] = mesh.corner_wedges(cn);
            assert_eq!(mesh.wedge_cell(w0), mesh.corner_cell(cn));
            assert_eq!(mesh.wedge_cell(w1), mesh.corner_cell(cn));
            assert_eq!(mesh.wedge_vertex(w0), mesh.corner_vertex(cn));
            assert_eq!(mesh.wedge_vertex(w1), mesh.corner_vertex(cn));
            // 角内楔按边号升序
            assert!(mesh.wedge_edge(w0) <= mesh.wedge_edge(w1));
        }
    }

    #[test]
    fn test_edge_wedge_adjacency() {
        let mesh = two_quads().build().unwrap();
        for e in mesh.edges() {
            let expected = if mesh.is_exterior_edge(e) { 2 } else { 4 };
            assert_eq!(mesh.edge_wedges(e).len(), expected, "边 {}", e);
            for &w in mesh.edge_wedges(e) {
                assert_eq!(mesh.wedge_edge(w as usize), e as u32);
            }
        }
        // 单元楔迭代覆盖其全部 8 个楔
        assert_eq!(mesh.cell_wedges(0).count(), 8);
    }

    #[test]
    fn test_vertex_adjacency() {
        let mesh = two_quads().build().unwrap();
        // 顶点 1 被两个单元共享
        assert_eq!(mesh.vertex_cells(1), &[0, 1]);
        assert_eq!(mesh.vertex_corners(1).len(), 2);
        assert_eq!(mesh.vertex_wedges(1).len(), 4);
        // 角顶点 4 同样共享
        assert_eq!(mesh.vertex_cells(4), &[0, 1]);
    }

    #[test]
    fn test_cell_edges_aligned_with_ring() {
        let mesh = two_quads().build().unwrap();
        for cell in mesh.cells() {
            let ring = mesh.cell_vertices(cell);
            let edges = mesh.cell_edges(cell);
            let n = ring.len();
            for i in 0..n {
                let [a, b] = mesh.edge_vertices(edges[i] as usize);
                let (ra, rb) = (ring[i], ring[(i + 1) % n]);
                assert_eq!((a.min(b), a.max(b)), (ra.min(rb), ra.max(rb)));
            }
        }
    }
}
