//! Affine transforms built from a sequence of elementary operations
use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::geometry::Vertex;

/// Accumulated 4x4 affine transform.
///
/// Operations apply to a point in the order they were added: after
/// `rotx(a)` followed by `rotz(b)`, a point is first rotated about x and the
/// result is then rotated about z. Each new operation is therefore
/// pre-multiplied onto the accumulated matrix (`M = Op * M`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xform {
    matrix: Matrix4<f64>,
}

impl Xform {
    /// The identity transform
    pub fn new() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Rotate by `degrees` about the x axis (right-handed).
    pub fn rotx(&mut self, degrees: f64) -> &mut Self {
        self.compose(Matrix4::new_rotation(Vector3::new(degrees.to_radians(), 0.0, 0.0)))
    }

    /// Rotate by `degrees` about the y axis (right-handed).
    pub fn roty(&mut self, degrees: f64) -> &mut Self {
        self.compose(Matrix4::new_rotation(Vector3::new(0.0, degrees.to_radians(), 0.0)))
    }

    /// Rotate by `degrees` about the z axis (right-handed).
    pub fn rotz(&mut self, degrees: f64) -> &mut Self {
        self.compose(Matrix4::new_rotation(Vector3::new(0.0, 0.0, degrees.to_radians())))
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        self.compose(Matrix4::new_translation(&Vector3::new(dx, dy, dz)))
    }

    /// Scale along each axis. A negative factor mirrors.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self {
        self.compose(Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)))
    }

    fn compose(&mut self, op: Matrix4<f64>) -> &mut Self {
        self.matrix = op * self.matrix;
        self
    }

    pub fn apply_point(&self, point: &Vertex) -> Vertex {
        self.matrix.transform_point(point)
    }

    /// Apply the linear part only (no translation).
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transform_vector(vector)
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }

    /// True when the transform turns a right-handed frame into a left-handed one.
    pub fn reflects(&self) -> bool {
        let linear: Matrix3<f64> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        linear.determinant() < 0.0
    }
}

impl Default for Xform {
    fn default() -> Self {
        Self::new()
    }
}
