//! stltools core library
//!
//! Stateless mesh handling shared by the converters: STL parsing, vertex
//! indexing, affine transforms, and projection with depth sorting.

pub mod error;
pub mod geometry;
pub mod indexed;
pub mod projection;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use error::{StlError, StlResult};
pub use geometry::{Extents, Facet, RawMesh, Vertex};
pub use indexed::{IndexedFacet, IndexedMesh};
pub use projection::{depth_sort, projected_facets, ProjectedFacet, Zpar};
pub use transform::Xform;
