//! Wavefront OBJ output

use super::MeshSink;
use crate::error::Result;
use crate::model::MeshRecord;
use std::io::Write;

/// Writes mesh records as Wavefront OBJ
///
/// Each record becomes one `o` group with `v`, `vt`, `vn` and `f` lines.
/// OBJ indices are 1-based and shared by the whole file, so the writer keeps
/// track of how many vertices earlier records wrote.
pub struct ObjWriter<W: Write> {
    writer: W,
    vertices_written: usize,
}

impl<W: Write> ObjWriter<W> {
    /// Wrap a byte sink
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            vertices_written: 0,
        }
    }

    /// Number of vertices written so far
    pub fn vertices_written(&self) -> usize {
        self.vertices_written
    }

    /// Flush and return the inner writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_record(&mut self, record: &MeshRecord) -> std::io::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "o {}", record.name)?;
        if let Some(address) = record.address.as_ref().filter(|a| !a.is_empty()) {
            writeln!(w, "# address: {}", address)?;
        }

        for v in &record.vertices {
            writeln!(w, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for uv in &record.uvs {
            writeln!(w, "vt {} {}", uv.u, uv.v)?;
        }
        for n in &record.normals {
            writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
        }

        let base = self.vertices_written + 1;
        for t in &record.triangles {
            let (a, b, c) = (t.v1 + base, t.v2 + base, t.v3 + base);
            writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
        Ok(())
    }
}

impl<W: Write> MeshSink for ObjWriter<W> {
    fn accept(&mut self, record: &MeshRecord) -> Result<()> {
        self.write_record(record)?;
        self.vertices_written += record.vertex_count();
        Ok(())
    }
}
