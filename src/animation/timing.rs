//! Easing curves for fixed-duration channels.
//!
//! A [`SpringConfig`](super::SpringConfig) with a duration set drops the
//! physics model and follows one of these curves over exactly that duration.
//!
//! - [`Easing::Linear`] - Constant speed
//! - [`Easing::EaseIn`] - Starts slow, ends fast
//! - [`Easing::EaseOut`] - Starts fast, ends slow
//! - [`Easing::EaseInOut`] - Slow start and end, fast middle
//! - [`Easing::CubicBezier`] - CSS-style cubic bezier curve
//! - [`Easing::Custom`] - User-defined function
//!
//! ## Example
//!
//! ```
//! use slide_wipe::animation::{Easing, SpringConfig};
//!
//! let belt = SpringConfig::BELT.duration(240.0, Easing::EaseInOut);
//! assert_eq!(belt.duration_ms, Some(240.0));
//! ```

use std::sync::Arc;

/// Curve mapping normalized time to normalized progress
#[derive(Clone)]
pub enum Easing {
    /// Linear interpolation (constant speed)
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    /// Starts slow, speeds up, then slows down
    EaseInOut,
    /// CSS cubic-bezier curve (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// Custom curve
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl Easing {
    /// Evaluate the curve at time t (0.0 to 1.0)
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            Easing::Custom(f) => f(t),
        }
    }

    /// Create a custom curve from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        Easing::Custom(Arc::new(f))
    }
}

impl std::fmt::Debug for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Easing::Linear => write!(f, "Linear"),
            Easing::EaseIn => write!(f, "EaseIn"),
            Easing::EaseOut => write!(f, "EaseOut"),
            Easing::EaseInOut => write!(f, "EaseInOut"),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            Easing::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Solve the bezier for `t` on the x axis with Newton-Raphson, then sample y.
/// Assumes x1 and x2 lie in [0, 1].
fn cubic_bezier(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let mut t = x;
    for _ in 0..8 {
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= (bezier_axis(t, x1, x2) - x) / slope;
    }
    bezier_axis(t, y1, y2)
}

fn bezier_axis(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}
