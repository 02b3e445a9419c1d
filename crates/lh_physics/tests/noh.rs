// crates/lh_physics/tests/noh.rs

//! Noh 内爆验证
//!
//! 单位方域（四分之一平面），γ = 5/3，初态 (ρ, u, p) = (1, -x̂, p₀)
//! 径向汇聚流（p₀ 为冷却近似的小正压力）。x = 0 与 y = 0 为对称面，
//! 外边界给定精确远场速度。t = 0.6 时激波半径 = 0.2，波后密度 = 16，
//! 波前密度 ρ = 1 + t/r。

use glam::DVec2;
use lh_mesh::generation::{rectangle, SideTags};
use lh_physics::{
    BoundaryCondition, BoundaryTable, CflConfig, IdealGas, LagrangianSolver, TimeControls,
};

const GAMMA: f64 = 5.0 / 3.0;
const P0: f64 = 1e-6;
const T_FINAL: f64 = 0.6;

fn noh_ics(x: DVec2, _t: f64) -> (f64, DVec2, f64) {
    let r = x.length();
    (1.0, -x / r, P0)
}

fn radial_inflow(x: DVec2, _t: f64) -> DVec2 {
    let r = x.length();
    if r > 0.0 {
        -x / r
    } else {
        DVec2::ZERO
    }
}

fn run_noh(n: usize) -> LagrangianSolver {
    let mesh = rectangle(n, n, [0.0, 1.0, 0.0, 1.0], SideTags::default())
        .build()
        .unwrap();
    let boundary = BoundaryTable::new()
        .with(0, BoundaryCondition::symmetry("left"))
        .with(1, BoundaryCondition::prescribed_velocity("right", radial_inflow))
        .with(2, BoundaryCondition::symmetry("bottom"))
        .with(3, BoundaryCondition::prescribed_velocity("top", radial_inflow));
    let controls = TimeControls {
        cfl: CflConfig {
            acoustic: 0.25,
            volume: 0.08,
            growth: 0.1,
        },
        final_time: T_FINAL,
        max_steps: 50_000,
        output_freq: 0,
        dt_floor: 1e-12,
    };
    let mut solver = LagrangianSolver::new(
        mesh,
        Box::new(IdealGas::from_gamma(GAMMA, 1.0)),
        boundary,
        controls,
    )
    .unwrap();
    solver.initialize(&noh_ics).unwrap();
    solver.run().unwrap();
    solver
}

#[test]
fn noh_implosion_structure() {
    let solver = run_noh(24);
    let mesh = solver.mesh();
    let geom = solver.geometry();
    let fields = solver.fields();

    // ---- 质量守恒 ----
    let totals = solver.conservation_totals();
    assert!(
        ((totals.mass - 1.0) / 1.0).abs() < 1e-12,
        "质量漂移: {}",
        totals.mass
    );

    // ---- 波前区密度跟随解析压缩 ρ = 1 + t/r ----
    let mut checked = 0;
    for c in mesh.cells() {
        let r = geom.cell_centroid[c].length();
        if (0.4..0.7).contains(&r) {
            let expected = 1.0 + T_FINAL / r;
            let rho = fields.cell_density[c];
            assert!(
                ((rho - expected) / expected).abs() < 0.15,
                "r = {:.3} 波前密度 {} (期望 {:.3})",
                r,
                rho,
                expected
            );
            checked += 1;
        }
    }
    assert!(checked > 10);

    // ---- 波后高压缩区 ----
    let rho_max = fields
        .cell_density
        .iter()
        .cloned()
        .fold(0.0f64, f64::max);
    assert!(
        rho_max > 9.0,
        "波后峰值密度过低: {} (解析平台 16)",
        rho_max
    );

    // ---- 激波半径 ≈ 0.2（按压缩比 4 的等值半径定位） ----
    let mut shocked_r_max = 0.0f64;
    for c in mesh.cells() {
        if fields.cell_density[c] > 4.0 {
            shocked_r_max = shocked_r_max.max(geom.cell_centroid[c].length());
        }
    }
    assert!(
        (shocked_r_max - 0.2).abs() < 0.08,
        "激波半径偏差: {} (期望 ≈ 0.2, 网格尺度 {:.3})",
        shocked_r_max,
        1.0 / 24.0
    );

    // ---- 对角对称: 解在 x <-> y 交换下不变 ----
    // 结构化编号下对角镜像单元可直接换算
    let n = 24;
    for c in mesh.cells() {
        let (i, j) = (c % n, c / n);
        let cm = i * n + j;
        let rho = fields.cell_density[c];
        let rho_m = fields.cell_density[cm];
        assert!(
            (rho - rho_m).abs() < 1e-3 * rho.max(1.0),
            "对角对称破坏: 单元 {} vs {}: {} vs {}",
            c,
            cm,
            rho,
            rho_m
        );
    }

    // ---- 对称面约束: 轴上顶点的法向速度为零 ----
    for v in mesh.vertices() {
        let tags = mesh.vertex_tags(v);
        let uv = fields.node_velocity[v];
        // 标签 0 为 x = 0 对称面，标签 2 为 y = 0 对称面
        if tags.contains(0) {
            assert!(uv.x.abs() < 1e-10, "x 对称面顶点 {} 法向速度 {}", v, uv.x);
        }
        if tags.contains(2) {
            assert!(uv.y.abs() < 1e-10, "y 对称面顶点 {} 法向速度 {}", v, uv.y);
        }
    }
}
