//! Easing curves for the spin animation

use serde::{Deserialize, Serialize};

/// Time-to-progress curve, both axes in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    /// CSS-style `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for Easing {
    fn default() -> Self {
        Self::EASE
    }
}

impl Easing {
    /// The CSS `ease` curve: slow start, fast middle, long gentle stop
    pub const EASE: Easing = Easing::CubicBezier {
        x1: 0.25,
        y1: 0.1,
        x2: 0.25,
        y2: 1.0,
    };

    /// Progress for normalized time `t` (clamped to [0, 1])
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let u = solve_for_x(t, x1, x2);
                bezier(u, y1, y2)
            }
        }
    }

    /// CSS `transition-timing-function` value
    pub fn css(&self) -> String {
        match *self {
            Easing::Linear => "linear".to_string(),
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

/// One axis of a cubic bezier anchored at 0 and 1
#[inline]
fn bezier(u: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - u;
    3.0 * inv * inv * u * p1 + 3.0 * inv * u * u * p2 + u * u * u
}

#[inline]
fn bezier_slope(u: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - u;
    3.0 * inv * inv * p1 + 6.0 * inv * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`
fn solve_for_x(x: f32, x1: f32, x2: f32) -> f32 {
    const EPSILON: f32 = 1e-6;

    // Newton-Raphson converges in a few steps for well-behaved curves
    let mut u = x;
    for _ in 0..8 {
        let err = bezier(u, x1, x2) - x;
        if err.abs() < EPSILON {
            return u;
        }
        let slope = bezier_slope(u, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        u -= err / slope;
    }

    // Bisection fallback (x is monotonic in u for x1, x2 in [0, 1])
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    u = x;
    for _ in 0..32 {
        let value = bezier(u, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = u;
        } else {
            hi = u;
        }
        u = (lo + hi) / 2.0;
    }
    u
}
