//! PostScript output of a projected, depth-sorted mesh
use std::io::{self, Write};

use stltools_core::{depth_sort, projected_facets, ProjectedFacet, RawMesh, Zpar};

use crate::Provenance;

/// Millimetres per PostScript point
const MM_PER_POINT: f64 = 25.4 / 72.0;

/// Procedures used by the facet lines
const PROLOG: &str = "\
.5 setlinewidth
/g {setgray} def
/f {moveto} def
/s {lineto} def
/t {lineto closepath gsave fill grestore stroke} def
";

/// Painter's-algorithm renderer that turns a mesh into a PostScript page
pub struct PostScriptRenderer {
    zpar: Zpar,
    facets: Vec<ProjectedFacet>,
    total: usize,
    stats: String,
}

impl PostScriptRenderer {
    /// Project `mesh` onto the xy plane, viewed from +z, and sort the
    /// visible facets far to near.
    pub fn new(mesh: &RawMesh) -> Self {
        let zpar = Zpar::from_extents(&mesh.extents());
        let mut facets = projected_facets(mesh, &zpar);
        depth_sort(&mut facets);

        Self {
            zpar,
            facets,
            total: mesh.len(),
            stats: mesh.stats("% "),
        }
    }

    pub fn zpar(&self) -> &Zpar {
        &self.zpar
    }

    /// Visible facets, back to front
    pub fn facets(&self) -> &[ProjectedFacet] {
        &self.facets
    }

    pub fn draw<W: Write>(&self, writer: &mut W, provenance: &Provenance) -> io::Result<()> {
        let Zpar { w, h, s, .. } = self.zpar;

        writeln!(writer, "%!PS-Adobe-1.0")?;
        writeln!(writer, "%%BoundingBox: 0 0 {:.0} {:.0}", w.ceil(), h.ceil())?;
        writeln!(
            writer,
            "% Generated by {} on {}.",
            provenance.generator(),
            provenance.timestamp
        )?;
        writeln!(writer, "% Source file name: '{}'", provenance.source.display())?;
        writeln!(writer, "{}", self.stats)?;
        writeln!(writer, "% The scale factor used is: {s} PostScript points/STL-unit")?;
        writeln!(
            writer,
            "% This becomes a picture of {:.0}×{:.0} PostScript points; {:.0}×{:.0} mm.",
            w,
            h,
            w * MM_PER_POINT,
            h * MM_PER_POINT
        )?;
        writeln!(
            writer,
            "% {} of {} facets are visible.",
            self.facets.len(),
            self.total
        )?;
        writer.write_all(PROLOG.as_bytes())?;

        for f in &self.facets {
            let [p0, p1, p2] = f.points;
            writeln!(
                writer,
                "{:4.2} g {:.3} {:.3} f {:.3} {:.3} s {:.3} {:.3} t",
                f.gray, p0[0], p0[1], p1[0], p1[1], p2[0], p2[1]
            )?;
        }

        // showpage must be the last line of the page
        writeln!(writer, "showpage")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use stltools_core::Xform;

    fn render(mesh: &RawMesh) -> String {
        let provenance = Provenance::now("stl2ps", Path::new("cube.stl"));
        let mut out = Vec::new();
        PostScriptRenderer::new(mesh).draw(&mut out, &provenance).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_head_on_cube_page() {
        let text = render(&RawMesh::cube(2.0));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "%!PS-Adobe-1.0");
        assert_eq!(lines[1], "%%BoundingBox: 0 0 500 500");
        assert!(text.contains("% Source file name: 'cube.stl'"));
        assert!(text.contains("% Number of facets: 12"));
        assert!(text.contains("% The scale factor used is: 250 PostScript points/STL-unit"));
        assert!(text.contains("% 2 of 12 facets are visible."));
        assert!(text.contains("/t {lineto closepath gsave fill grestore stroke} def"));
        assert_eq!(*lines.last().unwrap(), "showpage");
    }

    #[test]
    fn test_facet_lines() {
        let text = render(&RawMesh::cube(2.0));
        let facet_lines: Vec<&str> = text.lines().filter(|l| l.ends_with(" t")).collect();
        assert_eq!(
            facet_lines,
            vec![
                "1.00 g 0.000 0.000 f 500.000 0.000 s 500.000 500.000 t",
                "1.00 g 0.000 0.000 f 500.000 500.000 s 0.000 500.000 t",
            ]
        );
    }

    #[test]
    fn test_facets_are_drawn_far_to_near() {
        let mut xform = Xform::new();
        xform.rotx(30.0).roty(20.0);
        let renderer = PostScriptRenderer::new(&RawMesh::cube(2.0).transformed(&xform));

        let depths: Vec<f64> = renderer.facets().iter().map(|f| f.depth).collect();
        assert!(depths.windows(2).all(|d| d[0] <= d[1]));
        assert!(renderer.facets().len() >= 4);
    }

    #[test]
    fn test_empty_mesh_still_makes_a_page() {
        let text = render(&RawMesh::new("empty"));
        assert!(text.contains("% 0 of 0 facets are visible."));
        assert!(text.ends_with("showpage\n"));
        let pr = PostScriptRenderer::new(&RawMesh::new("empty"));
        assert!(pr.zpar().w.is_finite() && pr.zpar().w > 0.0);
    }
}
