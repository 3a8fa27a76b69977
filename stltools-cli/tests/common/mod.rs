//! Shared fixtures for the converter integration tests
#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use stltools_core::RawMesh;

/// ASCII STL text for `mesh`.
pub fn ascii_stl(mesh: &RawMesh) -> String {
    let mut text = format!("solid {}\n", mesh.name);
    for facet in &mesh.facets {
        let n = facet.normal();
        writeln!(text, "  facet normal {} {} {}", n.x, n.y, n.z).unwrap();
        writeln!(text, "    outer loop").unwrap();
        for v in facet.vertices() {
            writeln!(text, "      vertex {} {} {}", v.x, v.y, v.z).unwrap();
        }
        writeln!(text, "    endloop").unwrap();
        writeln!(text, "  endfacet").unwrap();
    }
    writeln!(text, "endsolid {}", mesh.name).unwrap();
    text
}

/// Binary STL bytes for `mesh`, with `header` at the start of the 80-byte header.
pub fn binary_stl(mesh: &RawMesh, header: &str) -> Vec<u8> {
    let mut data = vec![0u8; 80];
    data[..header.len()].copy_from_slice(header.as_bytes());
    data.extend_from_slice(&(mesh.len() as u32).to_le_bytes());
    for facet in &mesh.facets {
        data.extend_from_slice(&[0u8; 12]);
        for v in facet.vertices() {
            for c in [v.x, v.y, v.z] {
                data.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }
    data
}

/// Write the 2×2×2 test cube as `cube.stl` in `dir`.
pub fn write_cube(dir: &Path) -> PathBuf {
    let path = dir.join("cube.stl");
    fs::write(&path, ascii_stl(&RawMesh::cube(2.0))).unwrap();
    path
}
