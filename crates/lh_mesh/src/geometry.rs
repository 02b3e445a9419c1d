// crates/lh_mesh/src/geometry.rs

//! 几何缓存
//!
//! 按实体缓存由当前坐标导出的几何量，网格运动后整体重算：
//!
//! - 单元: 体积（面积）、形心、最小特征长度
//! - 边: 长度、中点、owner 外法向
//! - 楔: 面元面积（半边长）、外法向（指向自身单元外侧）、面元形心
//!
//! # 一致性
//!
//! 缓存记录其计算时的坐标纪元；任何坐标变更后必须先
//! [`GeometryCache::recompute`] 再读取缓存量。
//! [`GeometryCache::is_coherent`] 供调用方断言。

use glam::DVec2;
use rayon::prelude::*;

use crate::error::MeshError;
use crate::mesh::Mesh;
use lh_geo::{
    polygon_centroid, polygon_min_length, polygon_signed_area, segment_length, segment_midpoint,
    segment_outward_normal,
};

/// 几何闭合校验容差（相对单元周长）
const CLOSURE_EPS: f64 = 1e-10;

/// 每实体几何缓存
#[derive(Debug, Clone, Default)]
pub struct GeometryCache {
    /// 单元体积（二维即面积）
    pub cell_volume: Vec<f64>,
    /// 单元形心
    pub cell_centroid: Vec<DVec2>,
    /// 单元最小特征长度（顶点对距离的最小值）
    pub cell_min_length: Vec<f64>,

    /// 边长度
    pub edge_length: Vec<f64>,
    /// 边中点
    pub edge_midpoint: Vec<DVec2>,
    /// 边单位法向（指向 owner 单元外侧）
    pub edge_normal: Vec<DVec2>,

    /// 楔面元面积（半边长）
    pub wedge_facet_area: Vec<f64>,
    /// 楔面元单位法向（指向楔所属单元外侧）
    pub wedge_facet_normal: Vec<DVec2>,
    /// 楔面元形心
    pub wedge_facet_centroid: Vec<DVec2>,

    /// 计算时的坐标纪元；None 表示从未计算
    epoch: Option<u64>,
}

impl GeometryCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建并立即计算
    pub fn compute(mesh: &Mesh) -> Result<Self, MeshError> {
        let mut cache = Self::new();
        cache.recompute(mesh)?;
        Ok(cache)
    }

    /// 缓存是否与网格当前坐标一致
    #[inline]
    pub fn is_coherent(&self, mesh: &Mesh) -> bool {
        self.epoch == Some(mesh.coord_epoch())
    }

    /// 全量重算
    ///
    /// 运动后的单元体积必须保持为正，翻转单元返回
    /// [`MeshError::TangledCell`]。
    pub fn recompute(&mut self, mesh: &Mesh) -> Result<(), MeshError> {
        let n_cells = mesh.n_cells();
        let n_edges = mesh.n_edges();
        let n_wedges = mesh.n_wedges();

        // ---- 边 ----
        self.edge_length.resize(n_edges, 0.0);
        self.edge_midpoint.resize(n_edges, DVec2::ZERO);
        self.edge_normal.resize(n_edges, DVec2::ZERO);
        {
            // owner 环方向下 a->b 的外法向即 owner 外法向
            let lengths = &mut self.edge_length;
            let midpoints = &mut self.edge_midpoint;
            let normals = &mut self.edge_normal;
            lengths
                .par_iter_mut()
                .zip(midpoints.par_iter_mut())
                .zip(normals.par_iter_mut())
                .enumerate()
                .for_each(|(e, ((len, mid), normal))| {
                    let [va, vb] = mesh.edge_vertices(e);
                    let a = mesh.coord(va as usize);
                    let b = mesh.coord(vb as usize);
                    *len = segment_length(a, b);
                    *mid = segment_midpoint(a, b);
                    *normal = segment_outward_normal(a, b);
                });
        }

        // ---- 单元 ----
        self.cell_volume.resize(n_cells, 0.0);
        self.cell_centroid.resize(n_cells, DVec2::ZERO);
        self.cell_min_length.resize(n_cells, 0.0);
        let edge_length = &self.edge_length;
        let cell_geom: Vec<(f64, DVec2, f64)> = (0..n_cells)
            .into_par_iter()
            .map(|cell| {
                let ring: Vec<DVec2> = mesh
                    .cell_vertices(cell)
                    .iter()
                    .map(|&v| mesh.coord(v as usize))
                    .collect();
                let volume = polygon_signed_area(&ring);
                let centroid = polygon_centroid(&ring);
                // 最小特征长度以最短关联边长为种子
                let seed = mesh
                    .cell_edges(cell)
                    .iter()
                    .map(|&e| edge_length[e as usize])
                    .fold(f64::MAX, f64::min);
                let min_length = polygon_min_length(&ring, seed);
                (volume, centroid, min_length)
            })
            .collect();

        for (cell, &(volume, centroid, min_length)) in cell_geom.iter().enumerate() {
            if !(volume > 0.0) || !volume.is_finite() {
                return Err(MeshError::TangledCell { cell, volume });
            }
            self.cell_volume[cell] = volume;
            self.cell_centroid[cell] = centroid;
            self.cell_min_length[cell] = min_length;
        }

        // ---- 楔 ----
        self.wedge_facet_area.resize(n_wedges, 0.0);
        self.wedge_facet_normal.resize(n_wedges, DVec2::ZERO);
        self.wedge_facet_centroid.resize(n_wedges, DVec2::ZERO);
        {
            let edge_length = &self.edge_length;
            let edge_midpoint = &self.edge_midpoint;
            let edge_normal = &self.edge_normal;
            let areas = &mut self.wedge_facet_area;
            let normals = &mut self.wedge_facet_normal;
            let centroids = &mut self.wedge_facet_centroid;
            areas
                .par_iter_mut()
                .zip(normals.par_iter_mut())
                .zip(centroids.par_iter_mut())
                .enumerate()
                .for_each(|(w, ((area, normal), centroid))| {
                    let edge = mesh.wedge_edge(w) as usize;
                    let cell = mesh.wedge_cell(w);
                    let vertex = mesh.wedge_vertex(w) as usize;
                    *area = 0.5 * edge_length[edge];
                    // 边法向缓存为 owner 外向；neighbor 一侧取反
                    let sign = if mesh.edge_owner(edge) == cell { 1.0 } else { -1.0 };
                    *normal = sign * edge_normal[edge];
                    *centroid = segment_midpoint(mesh.coord(vertex), edge_midpoint[edge]);
                });
        }

        self.epoch = Some(mesh.coord_epoch());
        Ok(())
    }

    /// 校验离散高斯闭合: 每个单元 |Σ l·n| 相对周长小于容差
    pub fn validate_closure(&self, mesh: &Mesh) -> Result<(), MeshError> {
        for cell in mesh.cells() {
            let mut sum = DVec2::ZERO;
            let mut perimeter = 0.0;
            for &cn in mesh.cell_corners(cell) {
                for w in mesh.corner_wedges(cn as usize) {
                    sum += self.wedge_facet_area[w] * self.wedge_facet_normal[w];
                    perimeter += self.wedge_facet_area[w];
                }
            }
            let magnitude = sum.length();
            if magnitude > CLOSURE_EPS * perimeter.max(1.0) {
                return Err(MeshError::ClosureViolation { cell, magnitude });
            }
        }
        Ok(())
    }

    /// 网格统计信息
    pub fn statistics(&self, mesh: &Mesh) -> MeshStatistics {
        let mut min_volume = f64::MAX;
        let mut max_volume = f64::MIN;
        let mut total_volume = 0.0;
        for &v in &self.cell_volume {
            min_volume = min_volume.min(v);
            max_volume = max_volume.max(v);
            total_volume += v;
        }

        let mut min_edge = f64::MAX;
        let mut max_edge = f64::MIN;
        for &l in &self.edge_length {
            min_edge = min_edge.min(l);
            max_edge = max_edge.max(l);
        }

        let n_exterior = mesh.edges().filter(|&e| mesh.is_exterior_edge(e)).count();

        MeshStatistics {
            n_cells: mesh.n_cells(),
            n_edges: mesh.n_edges(),
            n_exterior_edges: n_exterior,
            n_vertices: mesh.n_vertices(),
            n_corners: mesh.n_corners(),
            n_wedges: mesh.n_wedges(),
            total_volume,
            min_cell_volume: min_volume,
            max_cell_volume: max_volume,
            min_edge_length: min_edge,
            max_edge_length: max_edge,
        }
    }
}

/// 网格统计信息
#[derive(Debug, Clone)]
pub struct MeshStatistics {
    /// 单元数
    pub n_cells: usize,
    /// 边数
    pub n_edges: usize,
    /// 外部边数
    pub n_exterior_edges: usize,
    /// 顶点数
    pub n_vertices: usize,
    /// 角数
    pub n_corners: usize,
    /// 楔数
    pub n_wedges: usize,
    /// 总体积
    pub total_volume: f64,
    /// 最小单元体积
    pub min_cell_volume: f64,
    /// 最大单元体积
    pub max_cell_volume: f64,
    /// 最短边
    pub min_edge_length: f64,
    /// 最长边
    pub max_edge_length: f64,
}

impl std::fmt::Display for MeshStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 网格统计 ===")?;
        writeln!(f, "单元数: {}", self.n_cells)?;
        writeln!(
            f,
            "边数: {} (外部: {}), 顶点数: {}",
            self.n_edges, self.n_exterior_edges, self.n_vertices
        )?;
        writeln!(f, "角数: {}, 楔数: {}", self.n_corners, self.n_wedges)?;
        writeln!(f, "总体积: {:.6e}", self.total_volume)?;
        writeln!(
            f,
            "单元体积: [{:.3e}, {:.3e}]",
            self.min_cell_volume, self.max_cell_volume
        )?;
        write!(
            f,
            "边长: [{:.3e}, {:.3e}]",
            self.min_edge_length, self.max_edge_length
        )
    }
}

// ============================================================================
// 测试
// ============================================================================
