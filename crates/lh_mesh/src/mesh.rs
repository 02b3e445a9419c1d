// crates/lh_mesh/src/mesh.rs

//! 网格本体
//!
//! SoA 布局的非结构多边形网格。拓扑由 [`crate::builder::MeshBuilder`]
//! 一次构建，此后不可变；只有顶点坐标随拉格朗日运动更新。
//!
//! # 实体
//!
//! - 顶点: 坐标（可变）+ 边界标签集
//! - 边: 顶点对 + owner/neighbor 单元 + 边界标签集（二维下边即面）
//! - 单元: CCW 顶点环 + 形状标签 + 区域号
//! - 角: (单元, 顶点) 关联
//! - 楔: (单元, 边, 顶点) 关联；每个角拥有连续的两个楔
//!
//! # 坐标纪元
//!
//! 每次坐标变更使 `coord_epoch` 自增，几何缓存据此判断自身是否
//! 与当前坐标一致。

use glam::DVec2;

use crate::shapes::CellShape;
use crate::tags::TagSet;
use crate::topology::CsrConnectivity;
use lh_foundation::index::INVALID_INDEX;

/// 非结构多边形网格（SoA 布局）
#[derive(Debug, Clone)]
pub struct Mesh {
    // ===== 顶点数据 =====
    pub(crate) coords: Vec<DVec2>,
    pub(crate) vertex_tags: Vec<TagSet>,
    pub(crate) coord_epoch: u64,

    // ===== 单元数据 =====
    pub(crate) cell_shape: Vec<CellShape>,
    pub(crate) cell_region: Vec<u32>,
    /// 单元 -> 顶点环（CCW）
    pub(crate) cell_vertices: CsrConnectivity,
    /// 单元 -> 边（与环位置对齐：第 i 条边连接环顶点 i 与 i+1）
    pub(crate) cell_edges: CsrConnectivity,
    /// 单元 -> 角（与环位置对齐）
    pub(crate) cell_corners: CsrConnectivity,

    // ===== 边数据 =====
    /// 边的两个顶点（按 owner 单元的环方向排列）
    pub(crate) edge_vertices: Vec<[u32; 2]>,
    pub(crate) edge_owner: Vec<u32>,
    /// 相邻单元（INVALID_INDEX 表示外部边）
    pub(crate) edge_neighbor: Vec<u32>,
    pub(crate) edge_tags: Vec<TagSet>,

    // ===== 角数据 =====
    pub(crate) corner_cell: Vec<u32>,
    pub(crate) corner_vertex: Vec<u32>,

    // ===== 楔数据（角 cn 拥有楔 2cn 与 2cn+1，按边号升序） =====
    pub(crate) wedge_cell: Vec<u32>,
    pub(crate) wedge_edge: Vec<u32>,
    pub(crate) wedge_vertex: Vec<u32>,

    // ===== 顶点邻接 =====
    pub(crate) vertex_corners: CsrConnectivity,
    pub(crate) vertex_cells: CsrConnectivity,
    pub(crate) vertex_wedges: CsrConnectivity,

    // ===== 边邻接 =====
    pub(crate) edge_wedges: CsrConnectivity,
}

impl Mesh {
    // =========================================================================
    // 基本统计
    // =========================================================================

    /// 顶点数量
    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.coords.len()
    }

    /// 边数量
    #[inline]
    pub fn n_edges(&self) -> usize {
        self.edge_vertices.len()
    }

    /// 单元数量
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cell_shape.len()
    }

    /// 角数量
    #[inline]
    pub fn n_corners(&self) -> usize {
        self.corner_cell.len()
    }

    /// 楔数量
    #[inline]
    pub fn n_wedges(&self) -> usize {
        self.wedge_cell.len()
    }

    // =========================================================================
    // 迭代范围
    // =========================================================================

    /// 单元索引范围
    #[inline]
    pub fn cells(&self) -> std::ops::Range<usize> {
        0..self.n_cells()
    }

    /// 边索引范围
    #[inline]
    pub fn edges(&self) -> std::ops::Range<usize> {
        0..self.n_edges()
    }

    /// 顶点索引范围
    #[inline]
    pub fn vertices(&self) -> std::ops::Range<usize> {
        0..self.n_vertices()
    }

    /// 角索引范围
    #[inline]
    pub fn corners(&self) -> std::ops::Range<usize> {
        0..self.n_corners()
    }

    /// 楔索引范围
    #[inline]
    pub fn wedges(&self) -> std::ops::Range<usize> {
        0..self.n_wedges()
    }

    // =========================================================================
    // 顶点访问
    // =========================================================================

    /// 顶点坐标
    #[inline]
    pub fn coord(&self, vertex: usize) -> DVec2 {
        self.coords[vertex]
    }

    /// 全部顶点坐标
    #[inline]
    pub fn coords(&self) -> &[DVec2] {
        &self.coords
    }

    /// 顶点标签集
    #[inline]
    pub fn vertex_tags(&self, vertex: usize) -> TagSet {
        self.vertex_tags[vertex]
    }

    /// 顶点是否在边界上（标签集非空）
    #[inline]
    pub fn is_boundary_vertex(&self, vertex: usize) -> bool {
        !self.vertex_tags[vertex].is_empty()
    }

    /// 顶点关联的角
    #[inline]
    pub fn vertex_corners(&self, vertex: usize) -> &[u32] {
        self.vertex_corners.row(vertex)
    }

    /// 顶点关联的单元
    #[inline]
    pub fn vertex_cells(&self, vertex: usize) -> &[u32] {
        self.vertex_cells.row(vertex)
    }

    /// 顶点关联的楔
    #[inline]
    pub fn vertex_wedges(&self, vertex: usize) -> &[u32] {
        self.vertex_wedges.row(vertex)
    }

    // =========================================================================
    // 单元访问
    // =========================================================================

    /// 单元形状
    #[inline]
    pub fn cell_shape(&self, cell: usize) -> CellShape {
        self.cell_shape[cell]
    }

    /// 单元区域号
    #[inline]
    pub fn cell_region(&self, cell: usize) -> u32 {
        self.cell_region[cell]
    }

    /// 全部区域号
    #[inline]
    pub fn cell_regions(&self) -> &[u32] {
        &self.cell_region
    }

    /// 单元顶点环（CCW 规范序）
    #[inline]
    pub fn cell_vertices(&self, cell: usize) -> &[u32] {
        self.cell_vertices.row(cell)
    }

    /// 单元的边（与环位置对齐）
    #[inline]
    pub fn cell_edges(&self, cell: usize) -> &[u32] {
        self.cell_edges.row(cell)
    }

    /// 单元的角（与环位置对齐）
    #[inline]
    pub fn cell_corners(&self, cell: usize) -> &[u32] {
        self.cell_corners.row(cell)
    }

    /// 单元 -> 顶点连接性表
    #[inline]
    pub fn cell_vertex_table(&self) -> &CsrConnectivity {
        &self.cell_vertices
    }

    // =========================================================================
    // 边访问
    // =========================================================================

    /// 边的两个顶点（owner 环方向）
    #[inline]
    pub fn edge_vertices(&self, edge: usize) -> [u32; 2] {
        self.edge_vertices[edge]
    }

    /// 边的 owner 单元
    #[inline]
    pub fn edge_owner(&self, edge: usize) -> u32 {
        self.edge_owner[edge]
    }

    /// 边的相邻单元（外部边返回 None）
    #[inline]
    pub fn edge_neighbor(&self, edge: usize) -> Option<u32> {
        let n = self.edge_neighbor[edge];
        if n == INVALID_INDEX {
            None
        } else {
            Some(n)
        }
    }

    /// 是否为外部边（无相邻单元）
    #[inline]
    pub fn is_exterior_edge(&self, edge: usize) -> bool {
        self.edge_neighbor[edge] == INVALID_INDEX
    }

    /// 边标签集
    #[inline]
    pub fn edge_tags(&self, edge: usize) -> TagSet {
        self.edge_tags[edge]
    }

    /// 边是否在边界上（标签集非空）
    #[inline]
    pub fn is_boundary_edge(&self, edge: usize) -> bool {
        !self.edge_tags[edge].is_empty()
    }

    // =========================================================================
    // 角 / 楔访问
    // =========================================================================

    /// 角所属单元
    #[inline]
    pub fn corner_cell(&self, corner: usize) -> u32 {
        self.corner_cell[corner]
    }

    /// 角所属顶点
    #[inline]
    pub fn corner_vertex(&self, corner: usize) -> u32 {
        self.corner_vertex[corner]
    }

    /// 角拥有的两个楔（连续存储，按边号升序）
    #[inline]
    pub fn corner_wedges(&self, corner: usize) -> [usize; 2] {
        [2 * corner, 2 * corner + 1]
    }

    /// 楔所属单元
    #[inline]
    pub fn wedge_cell(&self, wedge: usize) -> u32 {
        self.wedge_cell[wedge]
    }

    /// 楔所属边
    #[inline]
    pub fn wedge_edge(&self, wedge: usize) -> u32 {
        self.wedge_edge[wedge]
    }

    /// 楔所属顶点
    #[inline]
    pub fn wedge_vertex(&self, wedge: usize) -> u32 {
        self.wedge_vertex[wedge]
    }

    /// 楔是否贴在边界边上
    #[inline]
    pub fn is_boundary_wedge(&self, wedge: usize) -> bool {
        self.is_boundary_edge(self.wedge_edge[wedge] as usize)
    }

    /// 边关联的楔（内部边 4 个，外部边 2 个）
    #[inline]
    pub fn edge_wedges(&self, edge: usize) -> &[u32] {
        self.edge_wedges.row(edge)
    }

    /// 单元拥有的楔（按角序，每角两个）
    pub fn cell_wedges(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        self.cell_corners
            .row(cell)
            .iter()
            .flat_map(|&cn| self.corner_wedges(cn as usize))
    }

    // =========================================================================
    // 坐标变更（拉格朗日运动）
    // =========================================================================

    /// 坐标纪元（每次变更自增）
    #[inline]
    pub fn coord_epoch(&self) -> u64 {
        self.coord_epoch
    }

    /// 按顶点速度位移全部坐标: x += dt * u
    pub fn displace_vertices(&mut self, velocity: &[DVec2], dt: f64) {
        debug_assert_eq!(velocity.len(), self.coords.len());
        for (x, u) in self.coords.iter_mut().zip(velocity) {
            *x += dt * *u;
        }
        self.coord_epoch += 1;
    }

    /// 整体替换坐标（用于恢复保存的坐标）
    pub fn set_coords(&mut self, coords: &[DVec2]) {
        debug_assert_eq!(coords.len(), self.coords.len());
        self.coords.copy_from_slice(coords);
        self.coord_epoch += 1;
    }

    // =========================================================================
    // 构建后校验
    // =========================================================================

    /// 校验角/楔关联的一致性
    ///
    /// 每个角的两个楔必须与该角同单元、同顶点；每个单元的角数
    /// 等于其环长；孤立角/楔视为拓扑不一致。
    pub fn validate_incidence(&self) -> Result<(), crate::error::MeshError> {
        use crate::error::MeshError;

        if self.n_wedges() != 2 * self.n_corners() {
            return Err(MeshError::TopologyInconsistency(format!(
                "楔数 {} 不等于角数 {} 的两倍",
                self.n_wedges(),
                self.n_corners()
            )));
        }

        for cell in self.cells() {
            if self.cell_corners.row_len(cell) != self.cell_vertices.row_len(cell) {
                return Err(MeshError::TopologyInconsistency(format!(
                    "单元 {} 角数与环长不一致",
                    cell
                )));
            }
        }

        for corner in self.corners() {
            for w in self.corner_wedges(corner) {
                if self.wedge_cell[w] != self.corner_cell[corner]
                    || self.wedge_vertex[w] != self.corner_vertex[corner]
                {
                    return Err(MeshError::TopologyInconsistency(format!(
                        "楔 {} 与角 {} 的单元/顶点关联不一致",
                        w, corner
                    )));
                }
            }
        }

        Ok(())
    }
}
