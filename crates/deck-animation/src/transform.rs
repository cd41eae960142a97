//! 2D affine transforms for card placement.
//!
//! A card's on-screen pose is a `Transform2D` relative to its resting frame:
//! background cards are scaled down, dragged cards are translated and rotated.
//! Animation blends transforms in decomposed form so rotation takes the short
//! way around and scale stays positive.
//!
//! ```
//! use deck_animation::transform::Transform2D;
//!
//! let pose = Transform2D::translate(40.0, 0.0).then(&Transform2D::rotate_deg(10.0));
//! let (x, _) = pose.apply_point(0.0, 0.0);
//! assert!((x - 40.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::interpolate::{Interpolate, lerp};

/// A 2D affine transformation matrix.
///
/// Stored as a 3x2 matrix (the bottom row `[0, 0, 1]` is implicit):
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// The identity transform.
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Translation by `(tx, ty)`.
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    /// Non-uniform scale.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Uniform scale.
    pub const fn scale_uniform(s: f64) -> Self {
        Self::scale(s, s)
    }

    /// Rotation in radians.
    pub fn rotate(angle_rad: f64) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Rotation in degrees.
    pub fn rotate_deg(angle_deg: f64) -> Self {
        Self::rotate(angle_deg * PI / 180.0)
    }

    /// Build a matrix from translate/rotate/scale components.
    pub fn from_decomposed(parts: &DecomposedTransform) -> Self {
        let (sin, cos) = parts.rotate.sin_cos();
        Self {
            a: cos * parts.scale_x,
            b: sin * parts.scale_x,
            c: -sin * parts.scale_y,
            d: cos * parts.scale_y,
            tx: parts.translate_x,
            ty: parts.translate_y,
        }
    }

    /// Compose with another transform (`self * other`): `other` applies first.
    pub fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    /// Apply to a point.
    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Split into translate, rotate and scale. Skew is not represented.
    pub fn decompose(&self) -> DecomposedTransform {
        let scale_x = (self.a * self.a + self.b * self.b).sqrt();
        let rotate = if scale_x == 0.0 {
            0.0
        } else {
            self.b.atan2(self.a)
        };

        let (sin, cos) = rotate.sin_cos();
        let scale_y = if cos.abs() > sin.abs() {
            self.d / cos
        } else if sin.abs() > f64::EPSILON {
            -self.c / sin
        } else {
            (self.c * self.c + self.d * self.d).sqrt()
        };

        DecomposedTransform {
            translate_x: self.tx,
            translate_y: self.ty,
            scale_x,
            scale_y,
            rotate,
        }
    }

    /// Component-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.a - other.a).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.c - other.c).abs() < epsilon
            && (self.d - other.d).abs() < epsilon
            && (self.tx - other.tx).abs() < epsilon
            && (self.ty - other.ty).abs() < epsilon
    }

    /// Whether this is the identity within `epsilon`.
    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Self::identity(), epsilon)
    }
}

impl Interpolate for Transform2D {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *to;
        }
        self.decompose().interpolate(&to.decompose(), t).to_matrix()
    }
}

/// Decomposed transform components, interpolated independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in radians.
    pub rotate: f64,
}

impl Default for DecomposedTransform {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
        }
    }
}

impl DecomposedTransform {
    /// Convert back to a matrix.
    pub fn to_matrix(&self) -> Transform2D {
        Transform2D::from_decomposed(self)
    }
}

impl Interpolate for DecomposedTransform {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            translate_x: lerp(self.translate_x, to.translate_x, t),
            translate_y: lerp(self.translate_y, to.translate_y, t),
            scale_x: lerp(self.scale_x, to.scale_x, t),
            scale_y: lerp(self.scale_y, to.scale_y, t),
            rotate: interpolate_angle(self.rotate, to.rotate, t),
        }
    }
}

/// Interpolate between two angles along the shortest arc.
fn interpolate_angle(from: f64, to: f64, t: f64) -> f64 {
    let mut diff = to - from;
    while diff > PI {
        diff -= 2.0 * PI;
    }
    while diff < -PI {
        diff += 2.0 * PI;
    }
    from + diff * t
}
