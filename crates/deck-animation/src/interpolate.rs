//! Interpolation between animatable values.

/// Types that can be blended between two values.
///
/// `t == 0.0` yields `self`, `t == 1.0` yields `to`.
pub trait Interpolate: Sized {
    /// Interpolate between `self` and `to` at factor `t`.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

/// Linear interpolation helper.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for (f64, f64) {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        (lerp(self.0, to.0, t), lerp(self.1, to.1, t))
    }
}
