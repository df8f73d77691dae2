//! Oriented frames (origin + right/up/backward axes)
//!
//! A `Basis` caches its axis matrix and the inverse so points and vectors can
//! be moved between world space and frame-local space cheaply. Local
//! coordinates are (x = right, y = up, z = backward); travel is along -z.

use glam::{Mat3, Mat4, Vec3};
use serde::Serialize;

use super::vector::VectorExt;

/// An oriented local coordinate frame with cached forward/inverse transforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Basis {
    origin: Vec3,
    right: Vec3,
    up: Vec3,
    /// Points opposite the direction of travel
    backward: Vec3,
    /// Local -> world (columns are the axes)
    #[serde(skip)]
    transform: Mat3,
    /// World -> local
    #[serde(skip)]
    invert: Mat3,
}

impl Default for Basis {
    /// Identity frame at the world origin
    fn default() -> Self {
        Self::identity_at(Vec3::ZERO)
    }
}

impl Basis {
    fn identity_at(origin: Vec3) -> Self {
        Self {
            origin,
            right: Vec3::X,
            up: Vec3::Y,
            backward: Vec3::Z,
            transform: Mat3::IDENTITY,
            invert: Mat3::IDENTITY,
        }
    }

    /// Frame at `origin` looking along `direction` with `up` as the rough up hint.
    ///
    /// Right is `direction x up`, then up is rebuilt as `backward x right` so
    /// the three axes are orthogonal even when the hint is not.
    pub fn from_direction(origin: Vec3, direction: Vec3, up: Vec3) -> Self {
        let up = up.normalize_or_zero();
        let backward = (-direction).normalize_or_zero();
        let right = direction.cross(up).normalize_or_zero();
        let up = backward.cross(right);
        Self::setup(origin, right, up, backward)
    }

    /// Frame from explicit axes (each normalized, not orthogonalized)
    pub fn from_axes(origin: Vec3, right: Vec3, up: Vec3, backward: Vec3) -> Self {
        Self::setup(
            origin,
            right.normalize_or_zero(),
            up.normalize_or_zero(),
            backward.normalize_or_zero(),
        )
    }

    /// Compute the cached transforms. A singular axis matrix falls back to
    /// the identity rotation at the same origin.
    fn setup(origin: Vec3, right: Vec3, up: Vec3, backward: Vec3) -> Self {
        let transform = Mat3::from_cols(right, up, backward);
        match revert_matrix(&transform) {
            Some(invert) => Self {
                origin,
                right,
                up,
                backward,
                transform,
                invert,
            },
            None => {
                log::warn!(
                    "Degenerate frame at {:?} (right={:?} up={:?} backward={:?}), using identity axes",
                    origin,
                    right,
                    up,
                    backward
                );
                Self::identity_at(origin)
            }
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn backward(&self) -> Vec3 {
        self.backward
    }

    /// Direction of travel (`-backward`)
    #[inline]
    pub fn forward(&self) -> Vec3 {
        -self.backward
    }

    /// Linear blend of origin and axes by `coef` in [0, 1].
    ///
    /// Axes are renormalized but not re-orthogonalized, which is only accurate
    /// for small angles between the two frames. Out-of-range `coef` yields the
    /// identity frame.
    pub fn merge(&self, other: &Basis, coef: f32) -> Basis {
        if !(0.0..=1.0).contains(&coef) {
            return Basis::default();
        }
        let keep = 1.0 - coef;
        Basis::from_axes(
            self.origin * keep + other.origin * coef,
            self.right * keep + other.right * coef,
            self.up * keep + other.up * coef,
            self.backward * keep + other.backward * coef,
        )
    }

    /// Local vector -> world vector
    #[inline]
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.transform * v
    }

    /// World vector -> local vector
    #[inline]
    pub fn revert_vector(&self, v: Vec3) -> Vec3 {
        self.invert * v
    }

    /// Local point -> world point
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform * p + self.origin
    }

    /// World point -> local point
    #[inline]
    pub fn revert_point(&self, p: Vec3) -> Vec3 {
        self.invert * (p - self.origin)
    }

    /// Rotate all three axes (X, then Y, then Z) and refresh the caches
    pub fn rotate(&mut self, rx: f32, ry: f32, rz: f32) {
        *self = Self::setup(
            self.origin,
            self.right.rotated(rx, ry, rz),
            self.up.rotated(rx, ry, rz),
            self.backward.rotated(rx, ry, rz),
        );
    }

    /// World -> local matrix, for placing a camera at this frame
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_mat3(self.invert) * Mat4::from_translation(-self.origin)
    }

    /// Local -> world matrix, for drawing a model in this frame
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.origin) * Mat4::from_mat3(self.transform)
    }
}

/// Invert a 3x3 matrix, `None` when the determinant is exactly zero
pub fn revert_matrix(m: &Mat3) -> Option<Mat3> {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    Some(m.inverse())
}
