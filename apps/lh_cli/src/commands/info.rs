// apps/lh_cli/src/commands/info.rs

//! 打印算例网格统计信息

use clap::Args;
use tracing::info;

use lh_mesh::GeometryCache;

use super::build_case;

/// 信息参数
#[derive(Args)]
pub struct InfoArgs {
    /// 算例名 (sod, noh, sedov, translation)
    #[arg(short, long, default_value = "sod")]
    pub case: String,

    /// 特征方向单元数
    #[arg(short, long, default_value = "100")]
    pub resolution: usize,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> anyhow::Result<()> {
    let case = build_case(&args.case, args.resolution)?;
    let mesh = case.import.build()?;
    let geom = GeometryCache::compute(&mesh)?;
    geom.validate_closure(&mesh)?;

    info!("算例: {}, γ = {}, 推荐 t_final = {}", case.name, case.gamma, case.final_time);
    for line in geom.statistics(&mesh).to_string().lines() {
        info!("{}", line);
    }
    info!("几何闭合校验: 通过");

    Ok(())
}
