// crates/lh_physics/src/forces.rs

//! 子单元力与守恒量更新
//!
//! 角 cn（单元 c，顶点 v）上单元施加于顶点的子单元力：
//!
//! ```text
//! F_cn = p_c · N_cn + M_cn · (u_c − u_v)
//! ```
//!
//! 单元残差在角上累积：
//!
//! ```text
//! d(Mu)/dt = − Σ_cn F_cn
//! d(ME)/dt = − Σ_cn F_cn · u_v
//! dV/dt    =   Σ_cn N_cn · u_v
//! ```
//!
//! 质量在拉格朗日运动下不变。守恒量推进后由移动过的网格闭合
//! 状态: `ρ = M/V`, `e = (ME)/M − |u|²/2`，状态方程闭合 p、T、c。

use glam::DVec2;
use rayon::prelude::*;

use crate::eos::{CellThermo, EquationOfState};
use crate::error::PhysicsError;
use crate::state::HydroFields;
use lh_foundation::CellIndex;
use lh_mesh::{GeometryCache, Mesh};

/// 逐单元累积子单元力残差
pub fn evaluate_forces(mesh: &Mesh, fields: &mut HydroFields) {
    let cell_pressure = &fields.cell_pressure;
    let cell_velocity = &fields.cell_velocity;
    let node_velocity = &fields.node_velocity;
    let corner_matrix = &fields.corner_matrix;
    let corner_normal = &fields.corner_normal;

    let residual_momentum = &mut fields.residual_momentum;
    let residual_energy = &mut fields.residual_energy;
    let residual_volume = &mut fields.residual_volume;

    residual_momentum
        .par_iter_mut()
        .zip(residual_energy.par_iter_mut())
        .zip(residual_volume.par_iter_mut())
        .enumerate()
        .for_each(|(c, ((dmu, de), dv))| {
            let pc = cell_pressure[c];
            let uc = cell_velocity[c];

            let mut mom = DVec2::ZERO;
            let mut ener = 0.0;
            let mut vol = 0.0;
            for &cn in mesh.cell_corners(c) {
                let cn = cn as usize;
                let v = mesh.corner_vertex(cn) as usize;
                let uv = node_velocity[v];

                let force = pc * corner_normal[cn] + corner_matrix[cn] * (uc - uv);
                mom -= force;
                ener -= force.dot(uv);
                vol += corner_normal[cn].dot(uv);
            }
            *dmu = mom;
            *de = ener;
            *dv = vol;
        });
}

/// 以步长 `dt` 推进守恒量（动量与总能）
///
/// 以比速度与比内能表达: `u += dt·d(Mu)/dt / M`,
/// `E = e + |u|²/2` 按 `E += dt·d(ME)/dt / M` 推进。
pub fn apply_update(fields: &mut HydroFields, dt: f64) {
    let cell_mass = &fields.cell_mass;
    let residual_momentum = &fields.residual_momentum;
    let residual_energy = &fields.residual_energy;

    let cell_velocity = &mut fields.cell_velocity;
    let cell_internal_energy = &mut fields.cell_internal_energy;

    cell_velocity
        .par_iter_mut()
        .zip(cell_internal_energy.par_iter_mut())
        .enumerate()
        .for_each(|(c, (u, e))| {
            let inv_mass = 1.0 / cell_mass[c];
            let mut total = *e + 0.5 * u.length_squared();
            *u += dt * residual_momentum[c] * inv_mass;
            total += dt * residual_energy[c] * inv_mass;
            *e = total - 0.5 * u.length_squared();
        });
}

/// 由移动后的网格几何闭合热力学状态
///
/// `V` 取自几何缓存，`ρ = M/V`；密度、内能、压力或体积非正即
/// 致命，诊断带出单元号。
pub fn update_state_from_energy(
    mesh: &Mesh,
    geom: &GeometryCache,
    fields: &mut HydroFields,
    eos: &dyn EquationOfState,
) -> Result<(), PhysicsError> {
    debug_assert!(geom.is_coherent(mesh));

    let cell_mass = &fields.cell_mass;
    let cell_internal_energy = &fields.cell_internal_energy;

    let cell_density = &mut fields.cell_density;
    let cell_pressure = &mut fields.cell_pressure;
    let cell_temperature = &mut fields.cell_temperature;
    let cell_sound_speed = &mut fields.cell_sound_speed;

    cell_density
        .par_iter_mut()
        .zip(cell_pressure.par_iter_mut())
        .zip(cell_temperature.par_iter_mut())
        .zip(cell_sound_speed.par_iter_mut())
        .enumerate()
        .try_for_each(|(c, (((rho, p), t), cs))| -> Result<(), PhysicsError> {
            let volume = geom.cell_volume[c];
            if volume <= 0.0 {
                return Err(PhysicsError::NonPhysicalState {
                    cell: CellIndex::from_usize(c),
                    quantity: "volume",
                    value: volume,
                });
            }
            let density = cell_mass[c] / volume;
            if density <= 0.0 || !density.is_finite() {
                return Err(PhysicsError::NonPhysicalState {
                    cell: CellIndex::from_usize(c),
                    quantity: "density",
                    value: density,
                });
            }
            let energy = cell_internal_energy[c];
            if energy <= 0.0 || !energy.is_finite() {
                return Err(PhysicsError::NonPhysicalState {
                    cell: CellIndex::from_usize(c),
                    quantity: "internal_energy",
                    value: energy,
                });
            }

            let mut thermo = CellThermo {
                density,
                internal_energy: energy,
                ..Default::default()
            };
            eos.update_from_energy(&mut thermo);
            if thermo.pressure <= 0.0 || !thermo.pressure.is_finite() {
                return Err(PhysicsError::NonPhysicalState {
                    cell: CellIndex::from_usize(c),
                    quantity: "pressure",
                    value: thermo.pressure,
                });
            }

            *rho = thermo.density;
            *p = thermo.pressure;
            *t = thermo.temperature;
            *cs = thermo.sound_speed;
            Ok(())
        })
}

/// 由初始条件 (ρ, p) 闭合热力学状态（初始化路径）
pub fn update_state_from_pressure(
    fields: &mut HydroFields,
    eos: &dyn EquationOfState,
) -> Result<(), PhysicsError> {
    let cell_density = &fields.cell_density;
    let cell_pressure = &fields.cell_pressure;

    let cell_internal_energy = &mut fields.cell_internal_energy;
    let cell_temperature = &mut fields.cell_temperature;
    let cell_sound_speed = &mut fields.cell_sound_speed;

    cell_internal_energy
        .par_iter_mut()
        .zip(cell_temperature.par_iter_mut())
        .zip(cell_sound_speed.par_iter_mut())
        .enumerate()
        .try_for_each(|(c, ((e, t), cs))| -> Result<(), PhysicsError> {
            let density = cell_density[c];
            if density <= 0.0 || !density.is_finite() {
                return Err(PhysicsError::NonPhysicalState {
                    cell: CellIndex::from_usize(c),
                    quantity: "density",
                    value: density,
                });
            }
            let pressure = cell_pressure[c];
            if pressure <= 0.0 || !pressure.is_finite() {
                return Err(PhysicsError::NonPhysicalState {
                    cell: CellIndex::from_usize(c),
                    quantity: "pressure",
                    value: pressure,
                });
            }

            let mut thermo = CellThermo {
                density,
                pressure,
                ..Default::default()
            };
            eos.update_from_pressure(&mut thermo);
            *e = thermo.internal_energy;
            *t = thermo.temperature;
            *cs = thermo.sound_speed;
            Ok(())
        })
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::IdealGas;
    use glam::DVec2;
    use lh_mesh::generation::{rectangle, SideTags};

    fn uniform_setup(u: DVec2) -> (Mesh, GeometryCache, HydroFields, IdealGas) {
        let mesh = rectangle(3, 3, [0.0, 1.0, 0.0, 1.0], SideTags::default())
            .build()
            .unwrap();
        let geom = GeometryCache::compute(&mesh).unwrap();
        let mut fields = HydroFields::allocate(&mesh);
        let eos = IdealGas::from_gamma(1.4, 1.0);
        for c in mesh.cells() {
            fields.cell_density[c] = 1.0;
            fields.cell_pressure[c] = 1.0;
            fields.cell_velocity[c] = u;
            fields.cell_mass[c] = geom.cell_volume[c];
        }
        update_state_from_pressure(&mut fields, &eos).unwrap();
        (mesh, geom, fields, eos)
    }

    #[test]
    fn test_uniform_state_zero_residual() {
        // 均匀状态 + 均匀节点速度 -> 动量/能量残差为零
        let u = DVec2::new(1.0, 0.0);
        let (mesh, geom, mut fields, _) = uniform_setup(u);
        crate::nodal::assemble_corners(&mesh, &geom, &mut fields);
        fields.node_velocity.iter_mut().for_each(|uv| *uv = u);
        evaluate_forces(&mesh, &mut fields);

        for c in mesh.cells() {
            assert!(
                fields.residual_momentum[c].length() < 1e-12,
                "单元 {} 动量残差: {:?}",
                c,
                fields.residual_momentum[c]
            );
            assert!(fields.residual_energy[c].abs() < 1e-12);
            // 刚体平移下 dV/dt = Σ N_cn·u = (Σ N_cn)·u = 0
            assert!(fields.residual_volume[c].abs() < 1e-12);
        }
    }

    #[test]
    fn test_interior_vertex_force_balance() {
        // 节点求解的守恒机制: 求解后每个内部顶点上
        // Σ_{cn∋v} F_cn = b_v − M_v·u_v = 0
        use crate::boundary::{BoundaryCondition, BoundaryTable};

        let (mesh, geom, mut fields, _) = uniform_setup(DVec2::ZERO);
        fields.cell_pressure[4] = 2.0;
        crate::nodal::assemble_corners(&mesh, &geom, &mut fields);
        let table = BoundaryTable::new()
            .with(0, BoundaryCondition::symmetry("left"))
            .with(1, BoundaryCondition::symmetry("right"))
            .with(2, BoundaryCondition::symmetry("bottom"))
            .with(3, BoundaryCondition::symmetry("top"));
        crate::nodal::solve_nodal(&mesh, &geom, &mut fields, &table, 0.0).unwrap();

        for v in mesh.vertices().filter(|&v| !mesh.is_boundary_vertex(v)) {
            let uv = fields.node_velocity[v];
            let mut sum = DVec2::ZERO;
            for &cn in mesh.vertex_corners(v) {
                let cn = cn as usize;
                let c = mesh.corner_cell(cn) as usize;
                sum += fields.cell_pressure[c] * fields.corner_normal[cn]
                    + fields.corner_matrix[cn] * (fields.cell_velocity[c] - uv);
            }
            assert!(sum.length() < 1e-11, "顶点 {} 力不平衡: {:?}", v, sum);
        }
    }

    #[test]
    fn test_apply_update_conserves_kinetic_identity() {
        let (mesh, _, mut fields, _) = uniform_setup(DVec2::new(0.5, 0.0));
        // 人工残差：每单元恒定动量源
        for c in mesh.cells() {
            fields.residual_momentum[c] = DVec2::new(1.0, 0.0) * fields.cell_mass[c];
            fields.residual_energy[c] = 0.5 * fields.cell_mass[c];
        }
        let e_before = fields.cell_internal_energy[0];
        let u_before = fields.cell_velocity[0];
        apply_update(&mut fields, 0.1);

        let u_after = fields.cell_velocity[0];
        assert!((u_after - (u_before + DVec2::new(0.1, 0.0))).length() < 1e-14);
        // E 推进 0.05，动能变化吸收其余
        let e_total_before = e_before + 0.5 * u_before.length_squared();
        let e_total_after =
            fields.cell_internal_energy[0] + 0.5 * u_after.length_squared();
        assert!((e_total_after - e_total_before - 0.05).abs() < 1e-14);
    }

    #[test]
    fn test_update_state_detects_negative_energy() {
        let (mesh, geom, mut fields, eos) = uniform_setup(DVec2::ZERO);
        fields.cell_internal_energy[3] = -1.0;
        let err = update_state_from_energy(&mesh, &geom, &mut fields, &eos).unwrap_err();
        match err {
            PhysicsError::NonPhysicalState { cell, quantity, .. } => {
                assert_eq!(cell, CellIndex::new(3));
                assert_eq!(quantity, "internal_energy");
            }
            other => panic!("错误类型不符: {other}"),
        }
    }

    #[test]
    fn test_update_state_from_pressure_rejects_nonpositive() {
        let (_, _, mut fields, eos) = uniform_setup(DVec2::ZERO);
        fields.cell_pressure[1] = 0.0;
        let err = update_state_from_pressure(&mut fields, &eos).unwrap_err();
        assert!(matches!(
            err,
            PhysicsError::NonPhysicalState {
                quantity: "pressure",
                ..
            }
        ));
    }

    #[test]
    fn test_state_closure_roundtrip() {
        let (mesh, geom, mut fields, eos) = uniform_setup(DVec2::ZERO);
        update_state_from_energy(&mesh, &geom, &mut fields, &eos).unwrap();
        for c in mesh.cells() {
            assert!((fields.cell_density[c] - 1.0).abs() < 1e-12);
            assert!((fields.cell_pressure[c] - 1.0).abs() < 1e-12);
        }
    }
}
