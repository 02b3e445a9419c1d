// apps/lh_cli/src/commands/run.rs

//! 运行内置验证算例
//!
//! 构建算例网格与初边值条件，推进到终止时刻，按配置输出解帧，
//! 结束时打印守恒量对照表。
//!
//! 配置来源分两层：`--config` 给出的 JSON 文件（缺省时取算例
//! 推荐值构造默认配置），命令行选项逐项覆盖其中的对应字段。
//! 状态方程统一经 `EosConfig::build` 实例化。

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use tracing::info;

use lh_config::{EosConfig, OutputFormat, SimulationConfig};
use lh_physics::LagrangianSolver;

use super::build_case;

/// 运行参数
#[derive(Args)]
pub struct RunArgs {
    /// 算例名 (sod, noh, sedov, translation)
    #[arg(short, long, default_value = "sod")]
    pub case: String,

    /// 配置文件路径 (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 特征方向单元数
    #[arg(short, long, default_value = "100")]
    pub resolution: usize,

    /// 输出目录
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// 输出格式覆盖 (vtk, vtu, dat)
    #[arg(short, long)]
    pub format: Option<String>,

    /// 输出间隔覆盖（步），0 关闭输出
    #[arg(long)]
    pub output_freq: Option<usize>,

    /// 终止时刻覆盖
    #[arg(short = 't', long)]
    pub final_time: Option<f64>,

    /// 最大步数覆盖
    #[arg(long)]
    pub max_steps: Option<usize>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    info!("=== LagHydro 模拟启动 ===");

    let case = build_case(&args.case, args.resolution)?;
    info!("算例: {}, 分辨率: {}, γ = {}", case.name, args.resolution, case.gamma);

    // 配置: 文件优先，缺省时由算例推荐值构造
    let mut config = match &args.config {
        Some(path) => {
            info!("加载配置: {}", path.display());
            SimulationConfig::from_file(path)
                .with_context(|| format!("配置文件加载失败: {}", path.display()))?
        }
        None => SimulationConfig {
            prefix: format!("{}_", case.name),
            final_time: case.final_time,
            // γ = 1 + R/cv
            eos: EosConfig::IdealGas {
                gas_constant: case.gamma - 1.0,
                specific_heat: 1.0,
            },
            ..Default::default()
        },
    };

    // 命令行逐项覆盖
    if let Some(format) = &args.format {
        config.format = parse_format(format)?;
    }
    if let Some(freq) = args.output_freq {
        config.output_freq = freq;
    }
    if let Some(t) = args.final_time {
        config.final_time = t;
    }
    if let Some(steps) = args.max_steps {
        config.max_steps = steps;
    }
    config.validate().context("配置校验失败")?;

    let mesh = case.import.build().context("网格构建失败")?;
    info!(
        "网格: {} 单元, {} 顶点, {} 角, {} 楔",
        mesh.n_cells(),
        mesh.n_vertices(),
        mesh.n_corners(),
        mesh.n_wedges()
    );

    let eos = config.eos.build();
    let mut solver = LagrangianSolver::new(mesh, eos, case.boundary, config.time_controls())
        .context("求解器创建失败")?;

    if config.output_freq > 0 {
        let writer = lh_io::create_writer(
            config.format.extension(),
            args.output.clone(),
            config.prefix.clone(),
        )
        .context("写出器创建失败")?;
        solver = solver.with_writer(writer);
    }

    solver.initialize(case.ics.as_ref()).context("初始条件设置失败")?;
    let before = solver.conservation_totals();

    info!(
        "推进: t_final = {}, CFL = ({}, {}, {})",
        config.final_time, config.cfl.acoustic, config.cfl.volume, config.cfl.growth
    );

    let start = Instant::now();
    let summary = solver.run().context("推进失败")?;
    let after = solver.conservation_totals();

    info!("=== 模拟完成 ===");
    info!("总步数: {}", summary.steps);
    info!("终止时刻: {:.6e}", summary.final_time);
    info!("计算时间: {:.2} s", start.elapsed().as_secs_f64());
    info!(
        "质量:   {:.9e} -> {:.9e} (漂移 {:.2e})",
        before.mass, after.mass, summary.mass_drift
    );
    info!(
        "动量:   ({:.3e}, {:.3e}) -> ({:.3e}, {:.3e})",
        before.momentum.x, before.momentum.y, after.momentum.x, after.momentum.y
    );
    info!("能量:   {:.9e} -> {:.9e}", before.energy, after.energy);
    if let Some(limiter) = summary.last_limiter {
        info!("末步限制因子: {}", limiter);
    }

    Ok(())
}

fn parse_format(s: &str) -> anyhow::Result<OutputFormat> {
    match s {
        "vtk" => Ok(OutputFormat::Vtk),
        "vtu" => Ok(OutputFormat::Vtu),
        "dat" => Ok(OutputFormat::Dat),
        other => anyhow::bail!("不支持的输出格式 '{}' (可用: vtk, vtu, dat)", other),
    }
}
