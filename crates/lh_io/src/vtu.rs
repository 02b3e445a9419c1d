// crates/lh_io/src/vtu.rs

//! VTU (VTK XML 非结构网格) 写出器
//!
//! ASCII DataArray，帧时间写入 FieldData 的 TimeValue，
//! 供 ParaView 时间序列识别。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use lh_mesh::CellShape;
use lh_physics::{SolutionFrame, SolutionWriter};

use crate::error::IoError;

/// VTU 单元类型编号
fn vtu_cell_type(shape: CellShape) -> u8 {
    match shape {
        CellShape::Triangle => 5,
        CellShape::Quad => 9,
        CellShape::Polygon => 7,
    }
}

/// VTU 写出器
#[derive(Debug, Clone)]
pub struct VtuWriter {
    directory: PathBuf,
    prefix: String,
}

impl VtuWriter {
    /// 创建写出器
    pub fn new(directory: PathBuf, prefix: String) -> Self {
        Self { directory, prefix }
    }

    /// 写出到任意字节流（测试入口）
    pub fn write_to<W: Write>(&self, w: &mut W, frame: &SolutionFrame<'_>) -> Result<(), IoError> {
        let mesh = frame.mesh;
        let fields = frame.fields;

        writeln!(w, r#"<?xml version="1.0"?>"#)?;
        writeln!(
            w,
            r#"<VTKFile type="UnstructuredGrid" version="0.1" byte_order="LittleEndian">"#
        )?;
        writeln!(w, r#"  <UnstructuredGrid>"#)?;
        writeln!(w, r#"    <FieldData>"#)?;
        writeln!(
            w,
            r#"      <DataArray type="Float64" Name="TimeValue" NumberOfTuples="1">{}</DataArray>"#,
            frame.time
        )?;
        writeln!(w, r#"    </FieldData>"#)?;
        writeln!(
            w,
            r#"    <Piece NumberOfPoints="{}" NumberOfCells="{}">"#,
            mesh.n_vertices(),
            mesh.n_cells()
        )?;

        // 顶点
        writeln!(w, r#"      <Points>"#)?;
        writeln!(
            w,
            r#"        <DataArray type="Float64" NumberOfComponents="3" format="ascii">"#
        )?;
        for v in mesh.vertices() {
            let x = mesh.coord(v);
            writeln!(w, "          {:.12e} {:.12e} 0", x.x, x.y)?;
        }
        writeln!(w, r#"        </DataArray>"#)?;
        writeln!(w, r#"      </Points>"#)?;

        // 单元
        writeln!(w, r#"      <Cells>"#)?;
        writeln!(
            w,
            r#"        <DataArray type="Int64" Name="connectivity" format="ascii">"#
        )?;
        for c in mesh.cells() {
            write!(w, "         ")?;
            for &v in mesh.cell_vertices(c) {
                write!(w, " {}", v)?;
            }
            writeln!(w)?;
        }
        writeln!(w, r#"        </DataArray>"#)?;
        writeln!(
            w,
            r#"        <DataArray type="Int64" Name="offsets" format="ascii">"#
        )?;
        let mut offset = 0usize;
        for c in mesh.cells() {
            offset += mesh.cell_vertices(c).len();
            writeln!(w, "          {}", offset)?;
        }
        writeln!(w, r#"        </DataArray>"#)?;
        writeln!(
            w,
            r#"        <DataArray type="UInt8" Name="types" format="ascii">"#
        )?;
        for c in mesh.cells() {
            writeln!(w, "          {}", vtu_cell_type(mesh.cell_shape(c)))?;
        }
        writeln!(w, r#"        </DataArray>"#)?;
        writeln!(w, r#"      </Cells>"#)?;

        // 单元场
        writeln!(w, r#"      <CellData>"#)?;
        self.write_scalar(w, "density", &fields.cell_density)?;
        self.write_scalar(w, "pressure", &fields.cell_pressure)?;
        self.write_scalar(w, "internal_energy", &fields.cell_internal_energy)?;
        self.write_scalar(w, "temperature", &fields.cell_temperature)?;
        self.write_scalar(w, "sound_speed", &fields.cell_sound_speed)?;

        writeln!(
            w,
            r#"        <DataArray type="Float64" Name="velocity" NumberOfComponents="3" format="ascii">"#
        )?;
        for u in &fields.cell_velocity {
            writeln!(w, "          {:.12e} {:.12e} 0", u.x, u.y)?;
        }
        writeln!(w, r#"        </DataArray>"#)?;

        writeln!(
            w,
            r#"        <DataArray type="Int32" Name="region" format="ascii">"#
        )?;
        for &r in mesh.cell_regions() {
            writeln!(w, "          {}", r)?;
        }
        writeln!(w, r#"        </DataArray>"#)?;
        writeln!(w, r#"      </CellData>"#)?;

        writeln!(w, r#"    </Piece>"#)?;
        writeln!(w, r#"  </UnstructuredGrid>"#)?;
        writeln!(w, r#"</VTKFile>"#)?;

        Ok(())
    }

    fn write_scalar<W: Write>(&self, w: &mut W, name: &str, data: &[f64]) -> Result<(), IoError> {
        writeln!(
            w,
            r#"        <DataArray type="Float64" Name="{}" format="ascii">"#,
            name
        )?;
        for &v in data {
            writeln!(w, "          {:.12e}", v)?;
        }
        writeln!(w, r#"        </DataArray>"#)?;
        Ok(())
    }
}

impl SolutionWriter for VtuWriter {
    fn write(
        &mut self,
        frame: &SolutionFrame<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self
            .directory
            .join(format!("{}{:07}.vtu", self.prefix, frame.step));
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
