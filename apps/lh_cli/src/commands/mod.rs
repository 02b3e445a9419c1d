// apps/lh_cli/src/commands/mod.rs

//! CLI 子命令

pub mod info;
pub mod run;

use anyhow::bail;
use glam::DVec2;
use lh_mesh::generation::{rectangle, strip, SideTags};
use lh_mesh::MeshImport;
use lh_physics::{BoundaryCondition, BoundaryTable};

/// 初始条件闭包类型
pub type CaseIcs = Box<dyn Fn(DVec2, f64) -> (f64, DVec2, f64)>;

/// 一个内置验证算例: 网格 + 状态方程参数 + 初始条件 + 边界表
pub struct Case {
    /// 算例名
    pub name: &'static str,
    /// 网格导入数据
    pub import: MeshImport,
    /// 绝热指数
    pub gamma: f64,
    /// 推荐终止时刻
    pub final_time: f64,
    /// 初始条件
    pub ics: CaseIcs,
    /// 边界条件表
    pub boundary: BoundaryTable,
}

/// 按名构建内置算例
///
/// `resolution` 为特征方向单元数。
pub fn build_case(name: &str, resolution: usize) -> anyhow::Result<Case> {
    match name {
        // Sod 激波管: 单层条带，γ = 1.4
        "sod" => {
            let nx = resolution;
            let dx = 1.0 / nx as f64;
            Ok(Case {
                name: "sod",
                import: strip(nx, -0.5, 0.5, dx, SideTags::default()),
                gamma: 1.4,
                final_time: 0.2,
                ics: Box::new(|x, _| {
                    if x.x < 0.0 {
                        (1.0, DVec2::ZERO, 1.0)
                    } else {
                        (0.125, DVec2::ZERO, 0.1)
                    }
                }),
                boundary: all_symmetry(),
            })
        }

        // Noh 内爆: 四分之一平面，γ = 5/3，外边界给定径向汇聚速度
        "noh" => {
            let inflow = |x: DVec2, _: f64| {
                let r = x.length();
                if r > 0.0 {
                    -x / r
                } else {
                    DVec2::ZERO
                }
            };
            Ok(Case {
                name: "noh",
                import: rectangle(resolution, resolution, [0.0, 1.0, 0.0, 1.0], SideTags::default()),
                gamma: 5.0 / 3.0,
                final_time: 0.6,
                ics: Box::new(|x, _| {
                    let r = x.length();
                    (1.0, -x / r, 1e-6)
                }),
                boundary: BoundaryTable::new()
                    .with(0, BoundaryCondition::symmetry("left"))
                    .with(1, BoundaryCondition::prescribed_velocity("right", inflow))
                    .with(2, BoundaryCondition::symmetry("bottom"))
                    .with(3, BoundaryCondition::prescribed_velocity("top", inflow)),
            })
        }

        // Sedov 点爆: 中心单元注入单位能量，γ = 1.4
        "sedov" => {
            let n = if resolution % 2 == 0 {
                resolution + 1
            } else {
                resolution
            };
            let half = 1.2;
            let h = 2.0 * half / n as f64;
            let gamma = 1.4;
            let cell_volume = h * h;
            Ok(Case {
                name: "sedov",
                import: rectangle(n, n, [-half, half, -half, half], SideTags::default()),
                gamma,
                final_time: 1.0,
                ics: Box::new(move |x, _| {
                    // 奇数网格下原点落在中心单元形心
                    let p = if x.length() < 0.5 * h {
                        (gamma - 1.0) / cell_volume
                    } else {
                        1e-6
                    };
                    (1.0, DVec2::ZERO, p)
                }),
                boundary: all_symmetry(),
            })
        }

        // 匀速平移: 零压力梯度，整域给定速度边界
        "translation" => {
            let u0 = DVec2::new(1.0, 0.0);
            let bc = move |_: DVec2, _: f64| u0;
            Ok(Case {
                name: "translation",
                import: rectangle(resolution, resolution, [0.0, 1.0, 0.0, 1.0], SideTags::default()),
                gamma: 1.4,
                final_time: 1.0,
                ics: Box::new(move |_, _| (1.0, u0, 1.0)),
                boundary: BoundaryTable::new()
                    .with(0, BoundaryCondition::prescribed_velocity("left", bc))
                    .with(1, BoundaryCondition::prescribed_velocity("right", bc))
                    .with(2, BoundaryCondition::prescribed_velocity("bottom", bc))
                    .with(3, BoundaryCondition::prescribed_velocity("top", bc)),
            })
        }

        other => bail!("未知算例 '{}' (可用: sod, noh, sedov, translation)", other),
    }
}

fn all_symmetry() -> BoundaryTable {
    BoundaryTable::new()
        .with(0, BoundaryCondition::symmetry("left"))
        .with(1, BoundaryCondition::symmetry("right"))
        .with(2, BoundaryCondition::symmetry("bottom"))
        .with(3, BoundaryCondition::symmetry("top"))
}
