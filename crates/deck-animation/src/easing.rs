//! Easing curves applied to keyframe progress.
//!
//! The named curves match the standard cubic-bezier presets used by UI
//! toolkits (`ease`, `ease-in`, `ease-out`, `ease-in-out`).
//!
//! ```
//! use deck_animation::easing::EasingFunction;
//!
//! let eased = EasingFunction::EaseOut.evaluate(0.5);
//! assert!(eased > 0.5);
//! ```

use serde::{Deserialize, Serialize};

/// Easing function for keyframe timing.
///
/// Maps linear progress in `0.0..=1.0` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing.
    #[default]
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Custom curve with control points `(x1, y1)` and `(x2, y2)`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl EasingFunction {
    /// Evaluate the curve at `t`, clamped to `0.0..=1.0`.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }

    /// Custom cubic bezier. `x1` and `x2` are clamped into `0.0..=1.0` so the
    /// curve stays a function of time.
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::CubicBezier {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }
}

/// Evaluate a cubic bezier timing curve at `progress`.
///
/// Solves for the curve parameter matching `progress` on the x axis with
/// Newton-Raphson, then reads y at that parameter.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_axis(y1, y2, t)
}

fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_axis(x1, x2, t) - target_x;
        if x.abs() < 1e-9 {
            break;
        }

        let dx = bezier_derivative(x1, x2, t);
        if dx.abs() < 1e-9 {
            break;
        }

        t = (t - x / dx).clamp(0.0, 1.0);
    }

    t
}

/// `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`
#[inline]
fn bezier_axis(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_linear() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.evaluate(0.0), 0.0);
        assert_eq!(easing.evaluate(0.25), 0.25);
        assert_eq!(easing.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in [
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ] {
            assert!(approx_eq(easing.evaluate(0.0), 0.0), "{easing:?}");
            assert!(approx_eq(easing.evaluate(1.0), 1.0), "{easing:?}");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(EasingFunction::Linear.evaluate(-1.0), 0.0);
        assert_eq!(EasingFunction::Linear.evaluate(3.0), 1.0);
    }

    #[test]
    fn test_curve_shapes() {
        assert!(EasingFunction::EaseIn.evaluate(0.5) < 0.5);
        assert!(EasingFunction::EaseOut.evaluate(0.5) > 0.5);
        assert!(approx_eq(EasingFunction::EaseInOut.evaluate(0.5), 0.5));
    }

    #[test]
    fn test_custom_bezier_matches_preset() {
        let custom = EasingFunction::cubic_bezier(0.42, 0.0, 0.58, 1.0);
        for t in [0.1, 0.3, 0.7, 0.9] {
            assert!(approx_eq(
                custom.evaluate(t),
                EasingFunction::EaseInOut.evaluate(t)
            ));
        }
    }

    #[test]
    fn test_custom_bezier_clamps_x() {
        let custom = EasingFunction::cubic_bezier(-2.0, 0.0, 4.0, 1.0);
        assert_eq!(
            custom,
            EasingFunction::CubicBezier {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0
            }
        );
    }
}
