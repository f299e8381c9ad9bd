//! Monotonic blend curves used for crossfades and reveals.
//!
//! Every curve maps `[0, 1]` onto `[0, 1]` with both endpoints fixed, so a
//! blend driven by one of them never overshoots at a boundary.

use crate::constants::EASE_OUT_CONTROL;
use crate::error::ConfigError;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    SmoothStep,
    QuadOut,
    CubicBezier(CubicBezier),
}

impl Easing {
    /// The page's signature ease-out curve.
    pub fn ease_out() -> Self {
        let [x1, y1, x2, y2] = EASE_OUT_CONTROL;
        Easing::CubicBezier(CubicBezier { x1, y1, x2, y2 })
    }

    pub fn apply(self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicBezier(b) => b.sample(t),
        }
    }
}

impl FromStr for Easing {
    type Err = ConfigError;

    /// Accepts `linear`, `smoothstep`, `quad-out`, `ease-out` or four
    /// comma-separated bezier control values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ConfigError::Attribute {
            key: "ease".to_string(),
            value: s.to_string(),
        };
        match s.trim() {
            "linear" => Ok(Easing::Linear),
            "smoothstep" => Ok(Easing::SmoothStep),
            "quad-out" => Ok(Easing::QuadOut),
            "ease-out" => Ok(Easing::ease_out()),
            other => {
                let parts = other
                    .split(',')
                    .map(|p| p.trim().parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| bad())?;
                match parts.as_slice() {
                    [x1, y1, x2, y2] => Ok(Easing::CubicBezier(CubicBezier::new(
                        *x1, *y1, *x2, *y2,
                    )?)),
                    _ => Err(bad()),
                }
            }
        }
    }
}

/// CSS-style cubic bezier with implicit endpoints `(0, 0)` and `(1, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// Only curves whose y control points are nondecreasing inside `[0, 1]`
    /// are accepted; those are guaranteed monotonic.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, ConfigError> {
        let unit = |v: f32| (0.0..=1.0).contains(&v);
        if unit(x1) && unit(x2) && unit(y1) && unit(y2) && y1 <= y2 {
            Ok(Self { x1, y1, x2, y2 })
        } else {
            Err(ConfigError::Bezier([x1, y1, x2, y2]))
        }
    }

    #[inline]
    fn axis(a: f32, b: f32, s: f32) -> f32 {
        let u = 1.0 - s;
        3.0 * u * u * s * a + 3.0 * u * s * s * b + s * s * s
    }

    fn sample(&self, t: f32) -> f32 {
        // x(s) is nondecreasing for control points inside [0, 1]; bisect for s.
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        for _ in 0..32 {
            let mid = 0.5 * (lo + hi);
            if Self::axis(self.x1, self.x2, mid) < t {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Self::axis(self.y1, self.y2, 0.5 * (lo + hi)).clamp(0.0, 1.0)
    }
}
