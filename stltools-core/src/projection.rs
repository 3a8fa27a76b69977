//! Orthographic projection onto the xy plane for painter's-algorithm output
//!
//! The viewer sits on the +z axis looking down -z. Facets facing away from
//! the viewer are culled; the rest are ordered far to near. This is a
//! backface cull plus a depth sort, not hidden-surface removal: overlapping
//! or interpenetrating front-facing facets are only as correct as their
//! sort order.
use tracing::debug;

use crate::geometry::{Extents, RawMesh, Vertex};

/// Size in PostScript points of the longer side of the picture.
pub const DEFAULT_BUDGET: f64 = 500.0;

/// Smallest extent (model units) used for a flat bounding box.
pub const MIN_EXTENT: f64 = 1e-6;

/// Normals with a z component at or below this are edge-on or facing away.
pub const EDGE_ON: f64 = 1e-9;

/// Viewport size and scale for projecting a bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zpar {
    /// Output width in points
    pub w: f64,
    /// Output height in points
    pub h: f64,
    /// Points per model unit
    pub s: f64,
    xmin: f64,
    ymin: f64,
}

impl Zpar {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self::with_budget(xmin, xmax, ymin, ymax, DEFAULT_BUDGET)
    }

    /// Fit the box into `budget` points on its longer side, keeping the
    /// aspect ratio. Flat boxes use [`MIN_EXTENT`] for the missing extent;
    /// non-finite bounds are treated as a zero box at the origin.
    pub fn with_budget(xmin: f64, xmax: f64, ymin: f64, ymax: f64, budget: f64) -> Self {
        let (xmin, xmax) = finite_span(xmin, xmax);
        let (ymin, ymax) = finite_span(ymin, ymax);
        let budget = if budget.is_finite() && budget > 0.0 {
            budget
        } else {
            DEFAULT_BUDGET
        };

        let width = (xmax - xmin).max(MIN_EXTENT);
        let height = (ymax - ymin).max(MIN_EXTENT);
        let s = budget / width.max(height);

        Self {
            w: width * s,
            h: height * s,
            s,
            xmin,
            ymin,
        }
    }

    pub fn from_extents(extents: &Extents) -> Self {
        Self::new(extents.xmin, extents.xmax, extents.ymin, extents.ymax)
    }

    /// Map a point to viewport coordinates; `(xmin, ymin)` lands on the origin.
    pub fn project(&self, point: &Vertex) -> [f64; 2] {
        [(point.x - self.xmin) * self.s, (point.y - self.ymin) * self.s]
    }
}

fn finite_span(min: f64, max: f64) -> (f64, f64) {
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}

/// A facet projected onto the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedFacet {
    /// Viewport coordinates of the three vertices
    pub points: [[f64; 2]; 3],
    /// z of the three vertices
    pub depths: [f64; 3],
    /// Sort key: the largest of `depths`
    pub depth: f64,
    /// Gray level in [0, 1]; 1 faces the viewer head-on
    pub gray: f64,
    /// Position of the source facet in the mesh
    pub index: usize,
}

/// Project the facets of `mesh` that face the viewer, in mesh order.
///
/// A facet is kept when the z component of its normal exceeds [`EDGE_ON`],
/// so edge-on and degenerate facets are dropped too.
pub fn projected_facets(mesh: &RawMesh, pr: &Zpar) -> Vec<ProjectedFacet> {
    let visible: Vec<ProjectedFacet> = mesh
        .facets
        .iter()
        .enumerate()
        .filter(|(_, f)| f.normal().z > EDGE_ON)
        .map(|(index, f)| {
            let vertices = f.vertices();
            let depths = [vertices[0].z, vertices[1].z, vertices[2].z];
            ProjectedFacet {
                points: [
                    pr.project(&vertices[0]),
                    pr.project(&vertices[1]),
                    pr.project(&vertices[2]),
                ],
                depths,
                depth: depths[0].max(depths[1]).max(depths[2]),
                gray: f.normal().z.clamp(0.0, 1.0),
                index,
            }
        })
        .collect();

    debug!(visible = visible.len(), total = mesh.len(), "projected facets");
    visible
}

/// Order facets back to front (ascending depth key). The sort is stable,
/// so facets with equal keys keep their relative order.
pub fn depth_sort(facets: &mut [ProjectedFacet]) {
    facets.sort_by(|a, b| a.depth.total_cmp(&b.depth));
}
