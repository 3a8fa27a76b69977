//! Geometry primitives for STL meshes
use nalgebra::{Point3, Vector3};

use crate::transform::Xform;

/// A mesh vertex
pub type Vertex = Point3<f64>;

/// A triangle facet defined by three vertices and its derived unit normal
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    vertices: [Vertex; 3],
    normal: Vector3<f64>,
}

impl Facet {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        let vertices = [v0, v1, v2];
        Self {
            normal: calculate_normal(&vertices),
            vertices,
        }
    }

    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    /// Unit normal following the right-hand rule over v0, v1, v2.
    /// Zero for facets without area.
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    pub fn is_degenerate(&self) -> bool {
        self.normal == Vector3::zeros()
    }
}

fn calculate_normal(vertices: &[Vertex; 3]) -> Vector3<f64> {
    let edge1 = vertices[1] - vertices[0];
    let edge2 = vertices[2] - vertices[0];

    edge1
        .cross(&edge2)
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros)
}

/// Axis-aligned bounding box of a point set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl Extents {
    /// Bounding box of `points`; an empty set gives a zero box at the origin.
    pub fn of_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vertex>,
    {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        let mut any = false;

        for p in points {
            any = true;
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        if !any {
            return Self {
                xmin: 0.0,
                xmax: 0.0,
                ymin: 0.0,
                ymax: 0.0,
                zmin: 0.0,
                zmax: 0.0,
            };
        }

        Self {
            xmin: min[0],
            xmax: max[0],
            ymin: min[1],
            ymax: max[1],
            zmin: min[2],
            zmax: max[2],
        }
    }

    pub(crate) fn stats_line(&self, prefix: &str) -> String {
        format!(
            "{prefix}Bounding box: {} <= x <= {}, {} <= y <= {}, {} <= z <= {}",
            self.xmin, self.xmax, self.ymin, self.ymax, self.zmin, self.zmax
        )
    }
}

/// A mesh as read from an STL file: a name and facets in source order
#[derive(Debug, Clone, PartialEq)]
pub struct RawMesh {
    pub name: String,
    pub facets: Vec<Facet>,
}

impl RawMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            facets: Vec::new(),
        }
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            facets: Vec::with_capacity(capacity),
        }
    }

    pub fn add_facet(&mut self, facet: Facet) {
        self.facets.push(facet);
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn extents(&self) -> Extents {
        Extents::of_points(self.facets.iter().flat_map(|f| f.vertices.iter()))
    }

    /// Summary as comment lines, each starting with `prefix`.
    pub fn stats(&self, prefix: &str) -> String {
        [
            format!("{prefix}Name of the solid: '{}'", self.name),
            format!("{prefix}Number of facets: {}", self.len()),
            self.extents().stats_line(prefix),
        ]
        .join("\n")
    }

    /// Returns a copy of the mesh with every vertex mapped through `xform`.
    ///
    /// Normals are recomputed from the new vertices. When the transform
    /// mirrors space, v1 and v2 of every facet are swapped so the winding
    /// still yields outward normals.
    pub fn transformed(&self, xform: &Xform) -> RawMesh {
        let reflects = xform.reflects();
        let facets = self
            .facets
            .iter()
            .map(|f| {
                let [v0, v1, v2] = f.vertices.map(|v| xform.apply_point(&v));
                if reflects {
                    Facet::new(v0, v2, v1)
                } else {
                    Facet::new(v0, v1, v2)
                }
            })
            .collect();

        RawMesh {
            name: self.name.clone(),
            facets,
        }
    }

    /// Create an axis-aligned cube centred on the origin, for testing
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let v = |x: f64, y: f64, z: f64| Point3::new(x * half, y * half, z * half);
        let mut mesh = Self::with_capacity("cube", 12);

        // Front face
        mesh.add_facet(Facet::new(v(-1.0, -1.0, 1.0), v(1.0, -1.0, 1.0), v(1.0, 1.0, 1.0)));
        mesh.add_facet(Facet::new(v(-1.0, -1.0, 1.0), v(1.0, 1.0, 1.0), v(-1.0, 1.0, 1.0)));

        // Back face
        mesh.add_facet(Facet::new(v(-1.0, -1.0, -1.0), v(-1.0, 1.0, -1.0), v(1.0, 1.0, -1.0)));
        mesh.add_facet(Facet::new(v(-1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, -1.0, -1.0)));

        // Top face
        mesh.add_facet(Facet::new(v(-1.0, 1.0, -1.0), v(-1.0, 1.0, 1.0), v(1.0, 1.0, 1.0)));
        mesh.add_facet(Facet::new(v(-1.0, 1.0, -1.0), v(1.0, 1.0, 1.0), v(1.0, 1.0, -1.0)));

        // Bottom face
        mesh.add_facet(Facet::new(v(-1.0, -1.0, -1.0), v(1.0, -1.0, -1.0), v(1.0, -1.0, 1.0)));
        mesh.add_facet(Facet::new(v(-1.0, -1.0, -1.0), v(1.0, -1.0, 1.0), v(-1.0, -1.0, 1.0)));

        // Right face
        mesh.add_facet(Facet::new(v(1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, 1.0, 1.0)));
        mesh.add_facet(Facet::new(v(1.0, -1.0, -1.0), v(1.0, 1.0, 1.0), v(1.0, -1.0, 1.0)));

        // Left face
        mesh.add_facet(Facet::new(v(-1.0, -1.0, -1.0), v(-1.0, -1.0, 1.0), v(-1.0, 1.0, 1.0)));
        mesh.add_facet(Facet::new(v(-1.0, -1.0, -1.0), v(-1.0, 1.0, 1.0), v(-1.0, 1.0, -1.0)));

        mesh
    }
}
