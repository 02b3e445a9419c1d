// crates/lh_io/src/vtk.rs

//! VTK 传统 ASCII 写出器
//!
//! 非结构网格 (DATASET UNSTRUCTURED_GRID)，单元数据为单元中心场。
//! 单元类型: 三角形 5、四边形 9、多边形 7。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use lh_mesh::CellShape;
use lh_physics::{SolutionFrame, SolutionWriter};

use crate::error::IoError;

/// VTK 单元类型编号
fn vtk_cell_type(shape: CellShape) -> u8 {
    match shape {
        CellShape::Triangle => 5,
        CellShape::Quad => 9,
        CellShape::Polygon => 7,
    }
}

/// VTK 传统格式写出器
#[derive(Debug, Clone)]
pub struct VtkWriter {
    directory: PathBuf,
    prefix: String,
}

impl VtkWriter {
    /// 创建写出器
    pub fn new(directory: PathBuf, prefix: String) -> Self {
        Self { directory, prefix }
    }

    /// 写出到任意字节流（测试入口）
    pub fn write_to<W: Write>(&self, w: &mut W, frame: &SolutionFrame<'_>) -> Result<(), IoError> {
        let mesh = frame.mesh;
        let fields = frame.fields;

        writeln!(w, "# vtk DataFile Version 3.0")?;
        writeln!(w, "laghydro step {} time {:.9e}", frame.step, frame.time)?;
        writeln!(w, "ASCII")?;
        writeln!(w, "DATASET UNSTRUCTURED_GRID")?;

        // 顶点
        writeln!(w, "POINTS {} double", mesh.n_vertices())?;
        for v in mesh.vertices() {
            let x = mesh.coord(v);
            writeln!(w, "{:.12e} {:.12e} 0.0", x.x, x.y)?;
        }

        // 单元连接
        let total: usize = mesh
            .cells()
            .map(|c| mesh.cell_vertices(c).len() + 1)
            .sum();
        writeln!(w, "CELLS {} {}", mesh.n_cells(), total)?;
        for c in mesh.cells() {
            let ring = mesh.cell_vertices(c);
            write!(w, "{}", ring.len())?;
            for &v in ring {
                write!(w, " {}", v)?;
            }
            writeln!(w)?;
        }

        writeln!(w, "CELL_TYPES {}", mesh.n_cells())?;
        for c in mesh.cells() {
            writeln!(w, "{}", vtk_cell_type(mesh.cell_shape(c)))?;
        }

        // 单元场
        writeln!(w, "CELL_DATA {}", mesh.n_cells())?;
        self.write_scalar(w, "density", &fields.cell_density)?;
        self.write_scalar(w, "pressure", &fields.cell_pressure)?;
        self.write_scalar(w, "internal_energy", &fields.cell_internal_energy)?;
        self.write_scalar(w, "temperature", &fields.cell_temperature)?;
        self.write_scalar(w, "sound_speed", &fields.cell_sound_speed)?;

        writeln!(w, "VECTORS velocity double")?;
        for u in &fields.cell_velocity {
            writeln!(w, "{:.12e} {:.12e} 0.0", u.x, u.y)?;
        }

        writeln!(w, "SCALARS region int 1")?;
        writeln!(w, "LOOKUP_TABLE default")?;
        for &r in mesh.cell_regions() {
            writeln!(w, "{}", r)?;
        }

        Ok(())
    }

    fn write_scalar<W: Write>(&self, w: &mut W, name: &str, data: &[f64]) -> Result<(), IoError> {
        writeln!(w, "SCALARS {} double 1", name)?;
        writeln!(w, "LOOKUP_TABLE default")?;
        for &v in data {
            writeln!(w, "{:.12e}", v)?;
        }
        Ok(())
    }
}

impl SolutionWriter for VtkWriter {
    fn write(
        &mut self,
        frame: &SolutionFrame<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self
            .directory
            .join(format!("{}{:07}.vtk", self.prefix, frame.step));
        let mut w = BufWriter::new(File::create(&path)?);
        self.write_to(&mut w, frame)?;
        w.flush()?;
        log::debug!("已写出 {}", path.display());
        Ok(())
    }
}

// ============================================================================
// 测试
// ============================================================================
