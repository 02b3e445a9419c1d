// crates/lh_physics/src/nodal.rs

//! 节点求解器
//!
//! Maire 型单元中心拉格朗日格式的核心：先逐角装配阻抗矩阵与法向
//! 系数，再逐顶点求解耦合该点全部相邻单元的小型线性系统，得到
//! 节点速度。
//!
//! # 角装配
//!
//! 对角 cn（单元 c，顶点 v），经典声学阻抗 `z = ρ_c·c_c`，在角的
//! 两个楔上累积：
//!
//! ```text
//! M_cn = Σ_w  z · l_w · (n_w ⊗ n_w)     (2x2 SPD)
//! N_cn = Σ_w  l_w · n_w
//! ```
//!
//! # 顶点系统
//!
//! ```text
//! M_v = Σ_cn M_cn
//! b_v = Σ_cn ( p_c · N_cn + M_cn · u_c )
//! ```
//!
//! 无约束顶点直接解 2x2；携带 k 个对称面标签的顶点解 (2+k) 维
//! 鞍点系统，约束法向按标签分别累积、互不合并。内部顶点的 M_v
//! 由构造保证 SPD。

use glam::{DMat2, DVec2};
use rayon::prelude::*;

use crate::boundary::BoundaryTable;
use crate::error::PhysicsError;
use crate::numerics::dense::{solve2, solve_qr};
use crate::state::HydroFields;
use lh_foundation::VertexIndex;
use lh_mesh::{GeometryCache, Mesh};

/// 对称面约束数上限（二维下超过 2 个独立约束必然过约束）
const MAX_CONSTRAINTS: usize = 2;

/// 节点速度初估：相邻单元速度的算术平均
///
/// 在首次装配前为输出与诊断提供合理的顶点速度。
pub fn estimate_nodal_state(mesh: &Mesh, fields: &mut HydroFields) {
    let cell_velocity = &fields.cell_velocity;
    fields
        .node_velocity
        .par_iter_mut()
        .enumerate()
        .for_each(|(v, uv)| {
            let cells = mesh.vertex_cells(v);
            let mut sum = DVec2::ZERO;
            for &c in cells {
                sum += cell_velocity[c as usize];
            }
            *uv = sum / cells.len().max(1) as f64;
        });
}

/// 逐角装配阻抗矩阵 `M_cn` 与法向系数 `N_cn`
pub fn assemble_corners(mesh: &Mesh, geom: &GeometryCache, fields: &mut HydroFields) {
    debug_assert!(geom.is_coherent(mesh));

    let cell_density = &fields.cell_density;
    let cell_sound_speed = &fields.cell_sound_speed;
    let corner_matrix = &mut fields.corner_matrix;
    let corner_normal = &mut fields.corner_normal;

    corner_matrix
        .par_iter_mut()
        .zip(corner_normal.par_iter_mut())
        .enumerate()
        .for_each(|(cn, (m_cn, n_cn))| {
            let c = mesh.corner_cell(cn) as usize;

            // 经典声学阻抗。Burton 形式 z = ρ(c + Γ|Δu·n|) 作为
            // 可能的扩展保留在 EOS 接口上，此处不使用。
            let z = cell_density[c] * cell_sound_speed[c];

            let mut m = DMat2::ZERO;
            let mut nv = DVec2::ZERO;
            for w in mesh.corner_wedges(cn) {
                let l = geom.wedge_facet_area[w];
                let n = geom.wedge_facet_normal[w];
                // z·l·(n ⊗ n)
                m += DMat2::from_cols(z * l * n.x * n, z * l * n.y * n);
                nv += l * n;
            }
            *m_cn = m;
            *n_cn = nv;
        });
}

/// 逐顶点求解节点速度
///
/// 边界顶点依次处理给定速度（短路）、给定压力（右端项修正）与
/// 对称面（拉格朗日约束）。奇异系统致命，诊断中带出顶点号及其
/// 标签集。
pub fn solve_nodal(
    mesh: &Mesh,
    geom: &GeometryCache,
    fields: &mut HydroFields,
    boundary: &BoundaryTable,
    time: f64,
) -> Result<(), PhysicsError> {
    debug_assert!(geom.is_coherent(mesh));

    let cell_pressure = &fields.cell_pressure;
    let cell_velocity = &fields.cell_velocity;
    let corner_matrix = &fields.corner_matrix;
    let corner_normal = &fields.corner_normal;

    fields
        .node_velocity
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(v, uv)| -> Result<(), PhysicsError> {
            let tags = mesh.vertex_tags(v);

            // ---- 给定速度: 直接取值，跳过装配 ----
            if !tags.is_empty() {
                let prescribed = tags
                    .iter()
                    .filter_map(|t| boundary.get(t))
                    .find(|bc| bc.has_prescribed_velocity());
                if let Some(bc) = prescribed {
                    *uv = bc.velocity(mesh.coord(v), time);
                    return Ok(());
                }
            }

            // ---- 装配顶点系统 ----
            let mut m_v = DMat2::ZERO;
            let mut rhs = DVec2::ZERO;
            for &cn in mesh.vertex_corners(v) {
                let cn = cn as usize;
                let c = mesh.corner_cell(cn) as usize;
                m_v += corner_matrix[cn];
                rhs += cell_pressure[c] * corner_normal[cn] + corner_matrix[cn] * cell_velocity[c];
            }

            // ---- 边界楔: 压力修正与对称面约束 ----
            // 约束法向按标签分别累积（标签升序，保证确定性）
            let mut sym_tags = [0u8; MAX_CONSTRAINTS];
            let mut sym_normals = [DVec2::ZERO; MAX_CONSTRAINTS];
            let mut n_sym = 0usize;

            if !tags.is_empty() {
                for &w in mesh.vertex_wedges(v) {
                    let w = w as usize;
                    if !mesh.is_boundary_wedge(w) {
                        continue;
                    }
                    let edge = mesh.wedge_edge(w) as usize;
                    let l = geom.wedge_facet_area[w];
                    let n = geom.wedge_facet_normal[w];
                    for tag in mesh.edge_tags(edge).iter() {
                        // 标签覆盖已在配置期校验
                        let Some(bc) = boundary.get(tag) else { continue };
                        if bc.has_prescribed_pressure() {
                            let x = geom.wedge_facet_centroid[w];
                            rhs -= l * bc.pressure(x, time) * n;
                        } else if bc.has_symmetry() {
                            match sym_tags[..n_sym].iter().position(|&t| t == tag) {
                                Some(i) => sym_normals[i] += l * n,
                                None => {
                                    if n_sym >= MAX_CONSTRAINTS {
                                        return Err(PhysicsError::DegenerateNodalSystem {
                                            vertex: VertexIndex::from_usize(v),
                                            tags: tags.to_string(),
                                            detail: "对称面约束数超过空间维数",
                                        });
                                    }
                                    sym_tags[n_sym] = tag;
                                    sym_normals[n_sym] = l * n;
                                    n_sym += 1;
                                }
                            }
                        }
                    }
                }
            }

            // ---- 求解 ----
            if n_sym == 0 {
                *uv = solve2(&m_v, rhs).ok_or(PhysicsError::DegenerateNodalSystem {
                    vertex: VertexIndex::from_usize(v),
                    tags: tags.to_string(),
                    detail: "顶点矩阵奇异",
                })?;
            } else {
                // 约束行按标签升序排列
                let mut order = [0usize, 1];
                if n_sym == 2 && sym_tags[0] > sym_tags[1] {
                    order.swap(0, 1);
                }

                let n = 2 + n_sym;
                let mut a = [0.0f64; 16];
                let mut b = [0.0f64; 4];
                // 左上块 M_v
                a[0] = m_v.col(0).x;
                a[1] = m_v.col(1).x;
                a[n] = m_v.col(0).y;
                a[n + 1] = m_v.col(1).y;
                b[0] = rhs.x;
                b[1] = rhs.y;
                // 约束块 S 与 S^T（右下块保持零）
                for (row, &oi) in order[..n_sym].iter().enumerate() {
                    let s = sym_normals[oi];
                    a[2 + row] = s.x;
                    a[n + 2 + row] = s.y;
                    a[(2 + row) * n] = s.x;
                    a[(2 + row) * n + 1] = s.y;
                }

                solve_qr(&mut a[..n * n], &mut b[..n], n).ok_or(
                    PhysicsError::DegenerateNodalSystem {
                        vertex: VertexIndex::from_usize(v),
                        tags: tags.to_string(),
                        detail: "对称面约束退化（平行约束面）",
                    },
                )?;
                *uv = DVec2::new(b[0], b[1]);
            }

            Ok(())
        })
}

// ============================================================================
// 测试
// ============================================================================
