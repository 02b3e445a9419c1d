// crates/lh_io/src/lib.rs

//! LagHydro 输出层
//!
//! 实现 [`lh_physics::SolutionWriter`] 的三种格式写出器：
//! - [`vtk`]: VTK 传统 ASCII 非结构网格
//! - [`vtu`]: VTK XML 非结构网格（ParaView 推荐格式）
//! - [`dat`]: Tecplot ASCII
//!
//! 写出器将坐标、单元速度、压力、密度、比内能、温度、声速与
//! 区域号写入 `{prefix}{step:07}.{ext}`。核心不解析网格文件，
//! 读取侧由调用方负责。

#![warn(clippy::all)]

pub mod dat;
pub mod error;
pub mod vtk;
pub mod vtu;

pub use dat::DatWriter;
pub use error::IoError;
pub use vtk::VtkWriter;
pub use vtu::VtuWriter;

use std::path::PathBuf;

use lh_physics::SolutionWriter;

/// 输出格式选择的写出器工厂
///
/// `format` 取 `{vtk, vtu, dat}` 之一（配置层已在解析期拒绝
/// 其余取值）。
pub fn create_writer(format: &str, directory: PathBuf, prefix: String) -> Option<Box<dyn SolutionWriter>> {
    match format {
        "vtk" => Some(Box::new(VtkWriter::new(directory, prefix))),
        "vtu" => Some(Box::new(VtuWriter::new(directory, prefix))),
        "dat" => Some(Box::new(DatWriter::new(directory, prefix))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_known_formats() {
        for fmt in ["vtk", "vtu", "dat"] {
            assert!(create_writer(fmt, PathBuf::from("."), "t".into()).is_some());
        }
    }

    #[test]
    fn test_factory_unknown_format() {
        assert!(create_writer("exo", PathBuf::from("."), "t".into()).is_none());
    }
}
