// crates/lh_io/src/dat.rs

//! Tecplot ASCII 写出器
//!
//! FEPOLYGON 单区写出，面（边）基连接表，天然支持任意多边形单元：
//! 每个面给出两个端点（1 基）与左右单元，边界面右侧记 0。
//! 边端点按 owner 环方向存储，沿 a -> b 行走时 owner 在左侧，
//! 与 Tecplot 的左单元约定一致。单元场声明为 CELLCENTERED。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use lh_physics::{SolutionFrame, SolutionWriter};

use crate::error::IoError;

/// Tecplot 写出器
#[derive(Debug, Clone)]
pub struct DatWriter {
    directory: PathBuf,
    prefix: String,
}

impl DatWriter {
    /// 创建写出器
    pub fn new(directory: PathBuf, prefix: String) -> Self {
        Self { directory, prefix }
    }

    /// 写出到任意字节流（测试入口）
    pub fn write_to<W: Write>(&self, w: &mut W, frame: &SolutionFrame<'_>) -> Result<(), IoError> {
        let mesh = frame.mesh;
        let fields = frame.fields;

        writeln!(w, r#"TITLE = "laghydro step {}""#, frame.step)?;
        writeln!(
            w,
            r#"VARIABLES = "x" "y" "density" "pressure" "internal_energy" "temperature" "sound_speed" "u" "v" "region""#
        )?;
        writeln!(
            w,
            r#"ZONE T="step {}", SOLUTIONTIME={:.9e}, NODES={}, ELEMENTS={}, FACES={}, NUMCONNECTEDBOUNDARYFACES=0, TOTALNUMBOUNDARYCONNECTIONS=0, DATAPACKING=BLOCK, ZONETYPE=FEPOLYGON, VARLOCATION=([3-10]=CELLCENTERED)"#,
            frame.step,
            frame.time,
            mesh.n_vertices(),
            mesh.n_cells(),
            mesh.n_edges()
        )?;

        // 顶点坐标（BLOCK 布局按变量写）
        for v in mesh.vertices() {
            writeln!(w, "{:.12e}", mesh.coord(v).x)?;
        }
        for v in mesh.vertices() {
            writeln!(w, "{:.12e}", mesh.coord(v).y)?;
        }

        // 单元场
        for block in [
            &fields.cell_density,
            &fields.cell_pressure,
            &fields.cell_internal_energy,
            &fields.cell_temperature,
            &fields.cell_sound_speed,
        ] {
            for &v in block.iter() {
                writeln!(w, "{:.12e}", v)?;
            }
        }
        for u in &fields.cell_velocity {
            writeln!(w, "{:.12e}", u.x)?;
        }
        for u in &fields.cell_velocity {
            writeln!(w, "{:.12e}", u.y)?;
        }
        for &r in mesh.cell_regions() {
            writeln!(w, "{}", r)?;
        }

        // 面节点表（1 基，owner 环方向）
        for e in mesh.edges() {
            let [a, b] = mesh.edge_vertices(e);
            writeln!(w, "{} {}", a + 1, b + 1)?;
        }
        // 左单元表
        for e in mesh.edges() {
            writeln!(w, "{}", mesh.edge_owner(e) + 1)?;
        }
        // 右单元表（边界面记 0）
        for e in mesh.edges() {
            match mesh.edge_neighbor(e) {
                Some(nb) => writeln!(w, "{}", nb + 1)?,
                None => writeln!(w, "0")?,
            }
        }

        Ok(())
    }
}

impl SolutionWriter for DatWriter {
    fn write(
        &mut self,
        frame: &SolutionFrame<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self
            .directory
            .join(format!("{}{:07}.dat", self.prefix, frame.step));
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
