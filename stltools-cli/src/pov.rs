//! POV-ray `mesh` and `mesh2` output
//!
//! POV-ray uses a left-handed frame, so x and y are swapped on output.
use std::io::{self, Write};

use stltools_core::{IndexedMesh, RawMesh, Vertex};

use crate::Provenance;

/// POV-ray identifier for a solid name: `m_` followed by the name with
/// everything but ASCII letters, digits and `_` replaced by `_`.
pub fn identifier(name: &str) -> String {
    let body: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("m_{body}")
}

fn vector(p: &Vertex) -> String {
    format!("<{}, {}, {}>", p.y, p.x, p.z)
}

/// Write `mesh` as a list of triangles.
pub fn write_mesh<W: Write>(writer: &mut W, mesh: &RawMesh) -> io::Result<()> {
    writeln!(writer, "# declare {} = mesh {{", identifier(&mesh.name))?;
    for facet in &mesh.facets {
        let [v0, v1, v2] = facet.vertices();
        writeln!(writer, "  triangle {{")?;
        writeln!(writer, "    {},", vector(v0))?;
        writeln!(writer, "    {},", vector(v1))?;
        writeln!(writer, "    {}", vector(v2))?;
        writeln!(writer, "  }}")?;
    }
    writeln!(writer, "}}")
}

/// Write `mesh` as a vertex pool plus index triples.
pub fn write_mesh2<W: Write>(writer: &mut W, mesh: &IndexedMesh) -> io::Result<()> {
    writeln!(writer, "# declare {} = mesh2 {{", identifier(&mesh.name))?;

    let points = mesh.points.iter().map(vector);
    write_block(writer, "vertex_vectors", mesh.points.len(), points)?;

    let faces = mesh.ifacets.iter().map(|f| {
        let [a, b, c] = f.vertices;
        format!("<{a}, {b}, {c}>")
    });
    write_block(writer, "face_indices", mesh.ifacets.len(), faces)?;

    writeln!(writer, "}}")
}

/// `name { count, item, item }` with one entry per line.
fn write_block<W, I>(writer: &mut W, name: &str, count: usize, items: I) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = String>,
{
    writeln!(writer, "  {name} {{")?;
    write!(writer, "    {count}")?;
    for item in items {
        write!(writer, ",\n    {item}")?;
    }
    writeln!(writer, "\n  }}")
}

/// Write a complete include file: provenance comments, statistics and
/// either a `mesh2` (when `indexed`) or a `mesh` object.
pub fn write_document<W: Write>(
    writer: &mut W,
    provenance: &Provenance,
    mesh: &RawMesh,
    indexed: bool,
) -> io::Result<()> {
    writeln!(writer, "// Generated by {}", provenance.generator())?;
    writeln!(writer, "// on {}.", provenance.timestamp)?;
    writeln!(writer, "// Source file name: '{}'", provenance.source.display())?;

    if indexed {
        let mesh = IndexedMesh::from_raw(mesh);
        writeln!(writer, "{}", mesh.stats("// "))?;
        write_mesh2(writer, &mesh)
    } else {
        writeln!(writer, "{}", mesh.stats("// "))?;
        write_mesh(writer, mesh)
    }
}
