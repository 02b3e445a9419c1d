// crates/lh_physics/src/driver.rs

//! 时间推进驱动
//!
//! 预估-校正两级推进。半步结果提供更好的节点速度估计；全步更新
//! 从保存的原始状态施加以保持守恒：
//!
//! ```text
//! 保存坐标; 保存解
//! 角装配; 节点求解; 力评估; Δt = 步长控制
//! 更新(Δt/2); 移动网格(Δt/2); 状态闭合
//! 角装配; 节点求解; 力评估
//! 恢复坐标; 恢复解
//! 更新(Δt); 移动网格(Δt); 状态闭合
//! ```
//!
//! 每 `output_freq` 步通过可插拔写出器输出一次；写出失败非致命，
//! 记日志后继续。任何致命错误使驱动回滚到该步开始时的状态再
//! 上抛，保证退出时状态停留在最后一个完整完成的时间步。

use std::time::Instant;

use glam::DVec2;
use log::{info, warn};

use crate::boundary::BoundaryTable;
use crate::eos::EquationOfState;
use crate::error::PhysicsError;
use crate::forces::{
    apply_update, evaluate_forces, update_state_from_energy, update_state_from_pressure,
};
use crate::nodal::{assemble_corners, estimate_nodal_state, solve_nodal};
use crate::numerics::KahanSum;
use crate::state::HydroFields;
use crate::timestep::{CflConfig, DtLimiter, TimeStepController};
use lh_mesh::{GeometryCache, Mesh};

/// 初始条件回调: `(x, t) -> (ρ, u, p)`
pub type IcsFn<'a> = dyn Fn(DVec2, f64) -> (f64, DVec2, f64) + 'a;

/// 时间推进控制参数
#[derive(Debug, Clone)]
pub struct TimeControls {
    /// CFL 系数组
    pub cfl: CflConfig,
    /// 终止时刻
    pub final_time: f64,
    /// 最大步数
    pub max_steps: usize,
    /// 输出间隔（步），0 关闭输出
    pub output_freq: usize,
    /// 步长下限
    pub dt_floor: f64,
}

impl Default for TimeControls {
    fn default() -> Self {
        Self {
            cfl: CflConfig::default(),
            final_time: 1.0,
            max_steps: usize::MAX,
            output_freq: 0,
            dt_floor: 1e-14,
        }
    }
}

/// 输出帧：写出器可见的全部解数据
pub struct SolutionFrame<'a> {
    /// 步号
    pub step: usize,
    /// 当前时刻
    pub time: f64,
    /// 网格（含当前坐标）
    pub mesh: &'a Mesh,
    /// 几何缓存
    pub geom: &'a GeometryCache,
    /// 状态场
    pub fields: &'a HydroFields,
}

/// 可插拔解写出器
///
/// 写出失败非致命：驱动记日志后继续推进。
pub trait SolutionWriter: Send {
    /// 写出一帧
    fn write(
        &mut self,
        frame: &SolutionFrame<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// 单步报告
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    /// 本步步长
    pub dt: f64,
    /// 胜出的限制因子
    pub limiter: DtLimiter,
    /// 步后时刻
    pub time: f64,
}

/// 推进结束摘要
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// 完成步数
    pub steps: usize,
    /// 终止时刻
    pub final_time: f64,
    /// 墙钟耗时 [s]
    pub elapsed_seconds: f64,
    /// 总质量相对漂移
    pub mass_drift: f64,
    /// 最后一步的限制因子
    pub last_limiter: Option<DtLimiter>,
}

/// 守恒量总计（Kahan 确定性归约）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservationTotals {
    /// 总质量 Σ M
    pub mass: f64,
    /// 总动量 Σ M·u
    pub momentum: DVec2,
    /// 总能量 Σ M·(e + |u|²/2)
    pub energy: f64,
}

/// 单元中心拉格朗日求解器
pub struct LagrangianSolver {
    mesh: Mesh,
    geom: GeometryCache,
    fields: HydroFields,
    eos: Box<dyn EquationOfState>,
    boundary: BoundaryTable,
    controller: TimeStepController,
    controls: TimeControls,
    writer: Option<Box<dyn SolutionWriter>>,
    time: f64,
    step_count: usize,
}

impl LagrangianSolver {
    /// 创建求解器
    ///
    /// 构建几何缓存、校验几何闭合与边界覆盖、分配状态场。
    pub fn new(
        mesh: Mesh,
        eos: Box<dyn EquationOfState>,
        boundary: BoundaryTable,
        controls: TimeControls,
    ) -> Result<Self, PhysicsError> {
        let geom = GeometryCache::compute(&mesh)?;
        geom.validate_closure(&mesh)?;
        boundary.validate_against(&mesh)?;
        let fields = HydroFields::allocate(&mesh);
        let controller = TimeStepController::new(controls.cfl, controls.dt_floor);

        info!(
            "求解器创建: {} 单元, {} 顶点, {} 角, EOS = {}",
            mesh.n_cells(),
            mesh.n_vertices(),
            mesh.n_corners(),
            eos.name()
        );

        Ok(Self {
            mesh,
            geom,
            fields,
            eos,
            boundary,
            controller,
            controls,
            writer: None,
            time: 0.0,
            step_count: 0,
        })
    }

    /// 挂接写出器
    pub fn with_writer(mut self, writer: Box<dyn SolutionWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// 设置初始条件
    ///
    /// 在单元形心处采样 `(ρ, u, p)`，令 `M = ρ·V`，再由压力路径
    /// 闭合热力学状态，并给出节点速度初估。
    pub fn initialize(&mut self, ics: &IcsFn<'_>) -> Result<(), PhysicsError> {
        for c in self.mesh.cells() {
            let (density, velocity, pressure) = ics(self.geom.cell_centroid[c], self.time);
            self.fields.cell_density[c] = density;
            self.fields.cell_velocity[c] = velocity;
            self.fields.cell_pressure[c] = pressure;
            self.fields.cell_mass[c] = density * self.geom.cell_volume[c];
        }
        update_state_from_pressure(&mut self.fields, self.eos.as_ref())?;
        estimate_nodal_state(&self.mesh, &mut self.fields);

        let totals = self.conservation_totals();
        info!(
            "初始条件: 质量 {:.6e}, 动量 ({:.3e}, {:.3e}), 能量 {:.6e}",
            totals.mass, totals.momentum.x, totals.momentum.y, totals.energy
        );
        Ok(())
    }

    /// 当前时刻
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 已完成步数
    #[inline]
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// 网格
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// 几何缓存
    #[inline]
    pub fn geometry(&self) -> &GeometryCache {
        &self.geom
    }

    /// 状态场
    #[inline]
    pub fn fields(&self) -> &HydroFields {
        &self.fields
    }

    /// 守恒量总计
    pub fn conservation_totals(&self) -> ConservationTotals {
        let mut mass = KahanSum::new();
        let mut mom_x = KahanSum::new();
        let mut mom_y = KahanSum::new();
        let mut energy = KahanSum::new();
        for c in self.mesh.cells() {
            let m = self.fields.cell_mass[c];
            let u = self.fields.cell_velocity[c];
            let e_total = self.fields.cell_internal_energy[c] + 0.5 * u.length_squared();
            mass.add(m);
            mom_x.add(m * u.x);
            mom_y.add(m * u.y);
            energy.add(m * e_total);
        }
        ConservationTotals {
            mass: mass.value(),
            momentum: DVec2::new(mom_x.value(), mom_y.value()),
            energy: energy.value(),
        }
    }

    /// 推进一个时间步（预估-校正）
    pub fn step(&mut self) -> Result<StepReport, PhysicsError> {
        // 步首快照（也是致命错误时的回滚点）
        self.fields.save_coordinates(&self.mesh);
        self.fields.save_solution();

        match self.step_inner() {
            Ok(report) => {
                self.time = report.time;
                self.step_count += 1;
                Ok(report)
            }
            Err(err) => {
                self.rollback();
                Err(err)
            }
        }
    }

    fn step_inner(&mut self) -> Result<StepReport, PhysicsError> {
        debug_assert!(self.geom.is_coherent(&self.mesh));

        // ---- 预估: 求解节点速度并确定步长 ----
        assemble_corners(&self.mesh, &self.geom, &mut self.fields);
        solve_nodal(
            &self.mesh,
            &self.geom,
            &mut self.fields,
            &self.boundary,
            self.time,
        )?;
        evaluate_forces(&self.mesh, &mut self.fields);
        let (dt, limiter) = self.controller.evaluate(&self.geom, &self.fields)?;

        // ---- 半步推进 ----
        apply_update(&mut self.fields, 0.5 * dt);
        self.mesh
            .displace_vertices(&self.fields.node_velocity, 0.5 * dt);
        self.geom.recompute(&self.mesh)?;
        update_state_from_energy(&self.mesh, &self.geom, &mut self.fields, self.eos.as_ref())?;

        // ---- 校正: 半步状态下重解节点速度 ----
        assemble_corners(&self.mesh, &self.geom, &mut self.fields);
        solve_nodal(
            &self.mesh,
            &self.geom,
            &mut self.fields,
            &self.boundary,
            self.time + 0.5 * dt,
        )?;
        evaluate_forces(&self.mesh, &mut self.fields);

        // ---- 从原始状态施加全步更新 ----
        self.fields.restore_coordinates(&mut self.mesh);
        self.fields.restore_solution();
        apply_update(&mut self.fields, dt);
        self.mesh.displace_vertices(&self.fields.node_velocity, dt);
        self.geom.recompute(&self.mesh)?;
        update_state_from_energy(&self.mesh, &self.geom, &mut self.fields, self.eos.as_ref())?;

        Ok(StepReport {
            dt,
            limiter,
            time: self.time + dt,
        })
    }

    /// 回滚到步首快照
    ///
    /// 致命错误路径。二次失败只能说明快照本身非物理，此时保持
    /// 现场不再修补。
    fn rollback(&mut self) {
        self.fields.restore_coordinates(&mut self.mesh);
        self.fields.restore_solution();
        if let Err(err) = self.geom.recompute(&self.mesh) {
            warn!("回滚后几何重算失败: {}", err);
            return;
        }
        if let Err(err) =
            update_state_from_energy(&self.mesh, &self.geom, &mut self.fields, self.eos.as_ref())
        {
            warn!("回滚后状态闭合失败: {}", err);
        }
    }

    /// 输出一帧（非致命）
    fn emit_output(&mut self) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let frame = SolutionFrame {
            step: self.step_count,
            time: self.time,
            mesh: &self.mesh,
            geom: &self.geom,
            fields: &self.fields,
        };
        if let Err(err) = writer.write(&frame) {
            warn!("第 {} 步输出失败（继续推进）: {}", self.step_count, err);
        }
    }

    /// 推进至终止条件
    ///
    /// 终止于 `t >= final_time` 或 `step >= max_steps`。
    pub fn run(&mut self) -> Result<RunSummary, PhysicsError> {
        let start = Instant::now();
        let initial = self.conservation_totals();
        let mut last_limiter = None;

        if self.controls.output_freq > 0 {
            self.emit_output();
        }

        while self.time < self.controls.final_time && self.step_count < self.controls.max_steps {
            let report = self.step()?;
            last_limiter = Some(report.limiter);

            let at_output = self.controls.output_freq > 0
                && self.step_count % self.controls.output_freq == 0;
            if at_output {
                let totals = self.conservation_totals();
                info!(
                    "步 {:6}: t = {:.6e}, dt = {:.3e} ({}), 质量 {:.6e}, 能量 {:.6e}",
                    self.step_count,
                    self.time,
                    report.dt,
                    report.limiter,
                    totals.mass,
                    totals.energy
                );
                self.emit_output();
            }
        }

        let final_totals = self.conservation_totals();
        let mass_drift = if initial.mass != 0.0 {
            ((final_totals.mass - initial.mass) / initial.mass).abs()
        } else {
            0.0
        };

        let summary = RunSummary {
            steps: self.step_count,
            final_time: self.time,
            elapsed_seconds: start.elapsed().as_secs_f64(),
            mass_drift,
            last_limiter,
        };

        info!(
            "推进完成: {} 步, t = {:.6e}, 耗时 {:.2} s, 质量漂移 {:.2e}",
            summary.steps, summary.final_time, summary.elapsed_seconds, summary.mass_drift
        );

        Ok(summary)
    }
}

// ============================================================================
// 测试
// ============================================================================
