//! Indexed meshes: a shared vertex pool referenced by integer triples
use std::collections::HashMap;

use nalgebra::Vector3;
use tracing::debug;

use crate::geometry::{Extents, Facet, RawMesh, Vertex};

/// A facet expressed as indices into an [`IndexedMesh`]'s pools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedFacet {
    /// Indices into `IndexedMesh::points`
    pub vertices: [usize; 3],
    /// Index into `IndexedMesh::normals`
    pub normal: usize,
    /// Position of the originating facet in the raw mesh. Not used by emitters.
    pub facet: usize,
}

/// A mesh whose vertices are stored once and shared between facets
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh {
    pub name: String,
    /// Unique points in order of first occurrence
    pub points: Vec<Vertex>,
    /// Unique facet normals in order of first occurrence
    pub normals: Vec<Vector3<f64>>,
    pub ifacets: Vec<IndexedFacet>,
}

/// Exact bit pattern of a coordinate triple. `0.0` and `-0.0` differ.
type Key = [u64; 3];

fn key(c: [f64; 3]) -> Key {
    c.map(f64::to_bits)
}

/// Insertion-ordered set of coordinate triples.
struct Pool<T> {
    lookup: HashMap<Key, usize>,
    items: Vec<T>,
}

impl<T: Copy> Pool<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(capacity),
            items: Vec::with_capacity(capacity),
        }
    }

    fn index_of(&mut self, item: T, coords: [f64; 3]) -> usize {
        let next = self.items.len();
        let index = *self.lookup.entry(key(coords)).or_insert(next);
        if index == next {
            self.items.push(item);
        }
        index
    }
}

impl IndexedMesh {
    /// Build an indexed mesh from `raw`, merging bit-identical vertices.
    ///
    /// Facets keep their order and every facet is kept, degenerate ones
    /// included. No tolerance is applied, so vertices that differ only in
    /// their last bits stay separate points.
    pub fn from_raw(raw: &RawMesh) -> Self {
        let mut points = Pool::with_capacity(raw.len() * 3);
        let mut normals = Pool::with_capacity(raw.len());
        let mut ifacets = Vec::with_capacity(raw.len());

        for (n, facet) in raw.facets.iter().enumerate() {
            let vertices = (*facet.vertices()).map(|v| points.index_of(v, [v.x, v.y, v.z]));
            let normal = facet.normal();
            let normal = normals.index_of(normal, [normal.x, normal.y, normal.z]);
            ifacets.push(IndexedFacet {
                vertices,
                normal,
                facet: n,
            });
        }

        debug!(
            name = %raw.name,
            facets = raw.len(),
            points = points.items.len(),
            normals = normals.items.len(),
            "indexed mesh"
        );

        Self {
            name: raw.name.clone(),
            points: points.items,
            normals: normals.items,
            ifacets,
        }
    }

    /// Expand back into a raw mesh, one facet per indexed facet.
    pub fn to_raw(&self) -> RawMesh {
        let mut raw = RawMesh::with_capacity(self.name.clone(), self.ifacets.len());
        for f in &self.ifacets {
            let [a, b, c] = f.vertices;
            raw.add_facet(Facet::new(self.points[a], self.points[b], self.points[c]));
        }
        raw
    }

    pub fn len(&self) -> usize {
        self.ifacets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ifacets.is_empty()
    }

    pub fn extents(&self) -> Extents {
        Extents::of_points(&self.points)
    }

    /// Summary as comment lines, each starting with `prefix`.
    pub fn stats(&self, prefix: &str) -> String {
        [
            format!("{prefix}Name of the solid: '{}'", self.name),
            format!("{prefix}Number of facets: {}", self.len()),
            format!("{prefix}Number of unique vertices: {}", self.points.len()),
            self.extents().stats_line(prefix),
        ]
        .join("\n")
    }
}
