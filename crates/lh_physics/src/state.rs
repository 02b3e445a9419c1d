// crates/lh_physics/src/state.rs

//! 流体状态场
//!
//! SoA 布局的稠密状态场，加上按 `(名字, 实体类别, 版本)` 的统一
//! 访问入口。热循环直接持有数组；写出器与诊断通过
//! [`HydroFields::view`] 按名查询。
//!
//! # 版本
//!
//! 版本 0 是工作状态；版本 1 保存预估步前的快照，供校正步从原始
//! 状态施加全步更新（单元速度、比内能与顶点坐标，质量在拉格朗日
//! 运动下不变）。
//!
//! # 布局
//!
//! ```text
//! cell_mass:     [M_0,  M_1,  ...]
//! cell_velocity: [u_0,  u_1,  ...]
//! node_velocity: [uv_0, uv_1, ...]
//! corner_matrix: [M_cn0, M_cn1, ...]
//! ```

use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

use lh_mesh::Mesh;

/// 实体类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// 单元
    Cell,
    /// 顶点
    Vertex,
    /// 角
    Corner,
}

/// 状态场错误
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// 未注册的场名
    #[error("未知状态场: ({name}, {kind:?}, 版本{version})")]
    UnknownField {
        /// 场名
        name: String,
        /// 实体类别
        kind: EntityKind,
        /// 版本号
        version: u8,
    },
}

/// 按名查询返回的场视图
#[derive(Debug, Clone, Copy)]
pub enum FieldView<'a> {
    /// 标量场
    Scalar(&'a [f64]),
    /// 向量场
    Vector(&'a [DVec2]),
}

impl<'a> FieldView<'a> {
    /// 场长度
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(s) => s.len(),
            Self::Vector(v) => v.len(),
        }
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 取标量切片（向量场返回 None）
    pub fn as_scalar(&self) -> Option<&'a [f64]> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// 取向量切片（标量场返回 None）
    pub fn as_vector(&self) -> Option<&'a [DVec2]> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }
}

/// 场元数据（写出器按此枚举导出）
#[derive(Debug, Clone, Serialize)]
pub struct FieldMeta {
    /// 场名
    pub name: &'static str,
    /// 实体类别
    pub kind: EntityKind,
    /// 单位
    pub unit: &'static str,
    /// 是否为守恒量
    pub is_conserved: bool,
}

/// 流体状态场（SoA）
#[derive(Debug, Clone, Default)]
pub struct HydroFields {
    // ===== 单元场（版本 0） =====
    /// 单元质量 M（拉格朗日运动下不变）
    pub cell_mass: Vec<f64>,
    /// 单元密度 ρ
    pub cell_density: Vec<f64>,
    /// 单元压力 p
    pub cell_pressure: Vec<f64>,
    /// 单元速度 u
    pub cell_velocity: Vec<DVec2>,
    /// 单元比内能 e
    pub cell_internal_energy: Vec<f64>,
    /// 单元温度 T
    pub cell_temperature: Vec<f64>,
    /// 单元声速 c
    pub cell_sound_speed: Vec<f64>,

    // ===== 单元残差 =====
    /// d(Mu)/dt
    pub residual_momentum: Vec<DVec2>,
    /// d(ME)/dt
    pub residual_energy: Vec<f64>,
    /// dV/dt
    pub residual_volume: Vec<f64>,

    // ===== 顶点场 =====
    /// 节点速度 u_v
    pub node_velocity: Vec<DVec2>,

    // ===== 角场 =====
    /// 角阻抗矩阵 M_cn
    pub corner_matrix: Vec<DMat2>,
    /// 角法向系数 N_cn
    pub corner_normal: Vec<DVec2>,

    // ===== 版本 1 快照（校正步用） =====
    /// 预估步前的单元速度
    pub cell_velocity_saved: Vec<DVec2>,
    /// 预估步前的单元比内能
    pub cell_internal_energy_saved: Vec<f64>,
    /// 预估步前的顶点坐标
    pub node_coordinates_saved: Vec<DVec2>,
}

impl HydroFields {
    /// 按网格规模分配全部场（零初始化）
    pub fn allocate(mesh: &Mesh) -> Self {
        let nc = mesh.n_cells();
        let nv = mesh.n_vertices();
        let ncn = mesh.n_corners();
        Self {
            cell_mass: vec![0.0; nc],
            cell_density: vec![0.0; nc],
            cell_pressure: vec![0.0; nc],
            cell_velocity: vec![DVec2::ZERO; nc],
            cell_internal_energy: vec![0.0; nc],
            cell_temperature: vec![0.0; nc],
            cell_sound_speed: vec![0.0; nc],
            residual_momentum: vec![DVec2::ZERO; nc],
            residual_energy: vec![0.0; nc],
            residual_volume: vec![0.0; nc],
            node_velocity: vec![DVec2::ZERO; nv],
            corner_matrix: vec![DMat2::ZERO; ncn],
            corner_normal: vec![DVec2::ZERO; ncn],
            cell_velocity_saved: vec![DVec2::ZERO; nc],
            cell_internal_energy_saved: vec![0.0; nc],
            node_coordinates_saved: vec![DVec2::ZERO; nv],
        }
    }

    /// 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cell_mass.len()
    }

    // =========================================================================
    // 校正步快照
    // =========================================================================

    /// 保存预估步前的解（版本 0 -> 版本 1）
    pub fn save_solution(&mut self) {
        self.cell_velocity_saved.copy_from_slice(&self.cell_velocity);
        self.cell_internal_energy_saved
            .copy_from_slice(&self.cell_internal_energy);
    }

    /// 恢复预估步前的解（版本 1 -> 版本 0）
    pub fn restore_solution(&mut self) {
        self.cell_velocity.copy_from_slice(&self.cell_velocity_saved);
        self.cell_internal_energy
            .copy_from_slice(&self.cell_internal_energy_saved);
    }

    /// 保存顶点坐标
    pub fn save_coordinates(&mut self, mesh: &Mesh) {
        self.node_coordinates_saved.copy_from_slice(mesh.coords());
    }

    /// 恢复顶点坐标
    pub fn restore_coordinates(&self, mesh: &mut Mesh) {
        mesh.set_coords(&self.node_coordinates_saved);
    }

    // =========================================================================
    // 按名访问
    // =========================================================================

    /// 按 `(名字, 实体类别, 版本)` 查询场视图
    ///
    /// 未注册的组合返回 [`StateError::UnknownField`]。
    pub fn view(&self, name: &str, kind: EntityKind, version: u8) -> Result<FieldView<'_>, StateError> {
        use EntityKind::*;
        let view = match (name, kind, version) {
            ("cell_mass", Cell, 0) => FieldView::Scalar(&self.cell_mass),
            ("cell_density", Cell, 0) => FieldView::Scalar(&self.cell_density),
            ("cell_pressure", Cell, 0) => FieldView::Scalar(&self.cell_pressure),
            ("cell_velocity", Cell, 0) => FieldView::Vector(&self.cell_velocity),
            ("cell_internal_energy", Cell, 0) => FieldView::Scalar(&self.cell_internal_energy),
            ("cell_temperature", Cell, 0) => FieldView::Scalar(&self.cell_temperature),
            ("cell_sound_speed", Cell, 0) => FieldView::Scalar(&self.cell_sound_speed),
            ("cell_residual_energy", Cell, 0) => FieldView::Scalar(&self.residual_energy),
            ("cell_residual_volume", Cell, 0) => FieldView::Scalar(&self.residual_volume),
            ("node_velocity", Vertex, 0) => FieldView::Vector(&self.node_velocity),
            ("corner_normal", Corner, 0) => FieldView::Vector(&self.corner_normal),
            ("cell_velocity", Cell, 1) => FieldView::Vector(&self.cell_velocity_saved),
            ("cell_internal_energy", Cell, 1) => {
                FieldView::Scalar(&self.cell_internal_energy_saved)
            }
            ("node_coordinates", Vertex, 1) => FieldView::Vector(&self.node_coordinates_saved),
            _ => {
                return Err(StateError::UnknownField {
                    name: name.to_string(),
                    kind,
                    version,
                })
            }
        };
        Ok(view)
    }

    /// 写出器导出的场清单
    pub fn output_fields() -> &'static [FieldMeta] {
        const FIELDS: &[FieldMeta] = &[
            FieldMeta {
                name: "cell_density",
                kind: EntityKind::Cell,
                unit: "kg/m^3",
                is_conserved: false,
            },
            FieldMeta {
                name: "cell_pressure",
                kind: EntityKind::Cell,
                unit: "Pa",
                is_conserved: false,
            },
            FieldMeta {
                name: "cell_velocity",
                kind: EntityKind::Cell,
                unit: "m/s",
                is_conserved: false,
            },
            FieldMeta {
                name: "cell_internal_energy",
                kind: EntityKind::Cell,
                unit: "J/kg",
                is_conserved: false,
            },
            FieldMeta {
                name: "cell_temperature",
                kind: EntityKind::Cell,
                unit: "K",
                is_conserved: false,
            },
            FieldMeta {
                name: "cell_sound_speed",
                kind: EntityKind::Cell,
                unit: "m/s",
                is_conserved: false,
            },
            FieldMeta {
                name: "cell_mass",
                kind: EntityKind::Cell,
                unit: "kg",
                is_conserved: true,
            },
        ];
        FIELDS
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lh_mesh::generation::{rectangle, SideTags};

    fn small_fields() -> (Mesh, HydroFields) {
        let mesh = rectangle(2, 2, [0.0, 1.0, 0.0, 1.0], SideTags::default())
            .build()
            .unwrap();
        let fields = HydroFields::allocate(&mesh);
        (mesh, fields)
    }

    #[test]
    fn test_allocation_sizes() {
        let (mesh, fields) = small_fields();
        assert_eq!(fields.cell_mass.len(), mesh.n_cells());
        assert_eq!(fields.node_velocity.len(), mesh.n_vertices());
        assert_eq!(fields.corner_matrix.len(), mesh.n_corners());
    }

    #[test]
    fn test_view_known_fields() {
        let (_, fields) = small_fields();
        let v = fields.view("cell_density", EntityKind::Cell, 0).unwrap();
        assert!(v.as_scalar().is_some());
        assert_eq!(v.len(), 4);

        let v = fields.view("node_velocity", EntityKind::Vertex, 0).unwrap();
        assert!(v.as_vector().is_some());
    }

    #[test]
    fn test_view_unknown_field() {
        let (_, fields) = small_fields();
        let err = fields.view("no_such_field", EntityKind::Cell, 0).unwrap_err();
        assert!(matches!(err, StateError::UnknownField { .. }));
        // 已知名字但错误版本同样未注册
        assert!(fields.view("cell_density", EntityKind::Cell, 1).is_err());
    }

    #[test]
    fn test_save_restore_solution() {
        let (_, mut fields) = small_fields();
        fields.cell_velocity[0] = DVec2::new(1.0, 2.0);
        fields.cell_internal_energy[0] = 3.0;
        fields.save_solution();

        fields.cell_velocity[0] = DVec2::new(9.0, 9.0);
        fields.cell_internal_energy[0] = 9.0;
        fields.restore_solution();

        assert_eq!(fields.cell_velocity[0], DVec2::new(1.0, 2.0));
        assert_eq!(fields.cell_internal_energy[0], 3.0);
    }

    #[test]
    fn test_save_restore_coordinates_bit_identical() {
        let (mut mesh, mut fields) = small_fields();
        let original: Vec<DVec2> = mesh.coords().to_vec();

        fields.save_coordinates(&mesh);
        let vel = vec![DVec2::new(0.37, -1.21); mesh.n_vertices()];
        mesh.displace_vertices(&vel, 0.013);
        fields.restore_coordinates(&mut mesh);

        // 位级一致恢复
        for (a, b) in mesh.coords().iter().zip(&original) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
        }
    }

    #[test]
    fn test_output_fields_resolvable() {
        let (_, fields) = small_fields();
        for meta in HydroFields::output_fields() {
            assert!(fields.view(meta.name, meta.kind, 0).is_ok(), "{}", meta.name);
        }
    }
}
