//! Vector helpers on top of `glam::Vec3`
//!
//! glam covers add/sub/scale/cross/length. What it lacks for the track and
//! vehicle code is the fixed X-then-Y-then-Z Euler rotation and rescaling to
//! an arbitrary length.

use glam::Vec3;

/// Extra vector operations used by the circuit and vehicle code
pub trait VectorExt {
    /// Rotate about X, then Y, then Z (radians). A zero angle skips its axis.
    fn rotated(self, rx: f32, ry: f32, rz: f32) -> Self;

    /// Rescale to length `n` (zero vector stays zero)
    fn with_length(self, n: f32) -> Self;
}

impl VectorExt for Vec3 {
    fn rotated(self, rx: f32, ry: f32, rz: f32) -> Self {
        let Vec3 { mut x, mut y, mut z } = self;

        if rx != 0.0 {
            let (s, c) = rx.sin_cos();
            let y2 = y * c - z * s;
            z = y * s + z * c;
            y = y2;
        }
        if ry != 0.0 {
            let (s, c) = ry.sin_cos();
            let x2 = x * c - z * s;
            z = x * s + z * c;
            x = x2;
        }
        if rz != 0.0 {
            let (s, c) = rz.sin_cos();
            let x2 = x * c - y * s;
            y = x * s + y * c;
            x = x2;
        }

        Vec3::new(x, y, z)
    }

    #[inline]
    fn with_length(self, n: f32) -> Self {
        self.normalize_or_zero() * n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_rotate_about_y() {
        // Forward (-Z) turned a quarter about Y ends up on +X
        let v = Vec3::new(0.0, 0.0, -1.0).rotated(0.0, FRAC_PI_2, 0.0);
        assert!(approx(v, Vec3::X), "got {v:?}");
    }

    #[test]
    fn test_rotation_order_is_x_then_y() {
        // X first takes +Y to +Z, then Y takes +Z to -X
        let v = Vec3::Y.rotated(FRAC_PI_2, FRAC_PI_2, 0.0);
        assert!(approx(v, Vec3::new(-1.0, 0.0, 0.0)), "got {v:?}");
    }

    #[test]
    fn test_zero_rotation_is_exact() {
        let v = Vec3::new(0.3, -1.7, 2.9);
        assert_eq!(v.rotated(0.0, 0.0, 0.0), v);
    }

    #[test]
    fn test_with_length() {
        let v = Vec3::new(3.0, 0.0, 4.0).with_length(10.0);
        assert!(approx(v, Vec3::new(6.0, 0.0, 8.0)));
        assert_eq!(Vec3::ZERO.with_length(5.0), Vec3::ZERO);
    }
}
