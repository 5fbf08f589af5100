//! Easing functions for animations
//!
//! Curves are plain `Copy` values. Tracks and drivers own their own copies,
//! there is no shared curve registry.

use std::fmt;
use std::str::FromStr;

use crate::error::{AnimationError, Result};

/// A cubic bezier timing curve with anchors fixed at (0, 0) and (1, 1).
///
/// Only the two control handles are stored. The x-values of both handles are
/// guaranteed to lie in `[0, 1]`, which keeps `x(s)` monotonic so the solver in
/// [`CubicBezier::apply`] always converges. The y-values are free, curves may
/// overshoot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// CSS `ease-in`
    pub const EASE_IN: CubicBezier = CubicBezier::unchecked(0.42, 0.0, 1.0, 1.0);
    /// Quintic ease-in-out approximation
    pub const EASE_IN_OUT_QUINT: CubicBezier = CubicBezier::unchecked(0.86, 0.0, 0.07, 1.0);
    /// Circular ease-out approximation
    pub const EASE_OUT_CIRC: CubicBezier = CubicBezier::unchecked(0.075, 0.82, 0.165, 1.0);
    /// Material standard curve
    pub const FAST_OUT_SLOW_IN: CubicBezier = CubicBezier::unchecked(0.4, 0.0, 0.2, 1.0);
    /// Material accelerate curve
    pub const FAST_OUT_LINEAR_IN: CubicBezier = CubicBezier::unchecked(0.4, 0.0, 1.0, 1.0);

    const fn unchecked(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a curve from its two control handles.
    ///
    /// Fails when either x control lies outside `[0, 1]` or any control is
    /// not finite.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self> {
        let finite = [x1, y1, x2, y2].iter().all(|v| v.is_finite());
        if !finite || !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(AnimationError::InvalidBezier { x1, y1, x2, y2 });
        }
        Ok(Self::unchecked(x1, y1, x2, y2))
    }

    /// Control handles as `(x1, y1, x2, y2)`
    pub fn controls(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Evaluate the curve at `t`.
    ///
    /// Uses Newton-Raphson with binary-search fallback for robustness.
    /// Computes in f64 internally to avoid f32 precision jitter at 120fps.
    pub fn apply(&self, t: f32) -> f32 {
        // Endpoints are always exact
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        let x = t as f64;
        let x1 = self.x1 as f64;
        let y1 = self.y1 as f64;
        let x2 = self.x2 as f64;
        let y2 = self.y2 as f64;

        // Solve for parameter `p` where bezier_x(p) == x using Newton-Raphson,
        // falling back to binary search if the slope is too flat.
        let mut p = x;
        for _ in 0..8 {
            let err = bezier_sample(p, x1, x2) - x;
            if err.abs() < 1e-7 {
                return bezier_sample(p, y1, y2) as f32;
            }
            let slope = bezier_slope(p, x1, x2);
            if slope.abs() < 1e-7 {
                break;
            }
            p -= err / slope;
        }

        // Binary search fallback (always converges)
        let mut lo = 0.0_f64;
        let mut hi = 1.0_f64;
        p = x;
        for _ in 0..32 {
            let val = bezier_sample(p, x1, x2);
            if (val - x).abs() < 1e-7 {
                break;
            }
            if val < x {
                lo = p;
            } else {
                hi = p;
            }
            p = (lo + hi) * 0.5;
        }

        bezier_sample(p, y1, y2) as f32
    }
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    // Horner form: ((1-3p2+3p1)t + 3p2-6p1)t + 3p1) * t
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of cubic bezier: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// `t^p`
    Power(f32),
    CubicBezier(CubicBezier),
}

/// Named presets, in the order `tempo presets` lists them
pub const PRESETS: &[(&str, Easing)] = &[
    ("linear", Easing::Linear),
    ("decelerate", Easing::Power(2.0)),
    ("ease-in", Easing::CubicBezier(CubicBezier::EASE_IN)),
    (
        "ease-in-out-quint",
        Easing::CubicBezier(CubicBezier::EASE_IN_OUT_QUINT),
    ),
    ("ease-out-circ", Easing::CubicBezier(CubicBezier::EASE_OUT_CIRC)),
    (
        "fast-out-slow-in",
        Easing::CubicBezier(CubicBezier::FAST_OUT_SLOW_IN),
    ),
    (
        "fast-out-linear-in",
        Easing::CubicBezier(CubicBezier::FAST_OUT_LINEAR_IN),
    ),
];

impl Easing {
    pub const EASE_IN: Easing = Easing::CubicBezier(CubicBezier::EASE_IN);
    pub const EASE_IN_OUT_QUINT: Easing = Easing::CubicBezier(CubicBezier::EASE_IN_OUT_QUINT);
    pub const EASE_OUT_CIRC: Easing = Easing::CubicBezier(CubicBezier::EASE_OUT_CIRC);
    pub const FAST_OUT_SLOW_IN: Easing = Easing::CubicBezier(CubicBezier::FAST_OUT_SLOW_IN);
    pub const FAST_OUT_LINEAR_IN: Easing = Easing::CubicBezier(CubicBezier::FAST_OUT_LINEAR_IN);
    /// Quadratic power curve, slow start
    pub const DECELERATE: Easing = Easing::Power(2.0);

    /// Validated cubic bezier easing
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self> {
        CubicBezier::new(x1, y1, x2, y2).map(Easing::CubicBezier)
    }

    /// Validated power easing
    pub fn power(exponent: f32) -> Result<Self> {
        let easing = Easing::Power(exponent);
        easing.validate()?;
        Ok(easing)
    }

    /// Check that the curve can be evaluated.
    ///
    /// `Power` is a public variant, so an exponent built without
    /// [`Easing::power`] is only caught here.
    pub fn validate(&self) -> Result<()> {
        match self {
            Easing::Power(p) if !p.is_finite() || *p <= 0.0 => Err(AnimationError::InvalidPower(*p)),
            Easing::CubicBezier(bezier) => {
                let (x1, y1, x2, y2) = bezier.controls();
                CubicBezier::new(x1, y1, x2, y2).map(|_| ())
            }
            _ => Ok(()),
        }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::Power(p) => t.clamp(0.0, 1.0).powf(*p),
            Easing::CubicBezier(bezier) => bezier.apply(t),
        }
    }

    /// The curve in the form [`FromStr`] accepts, ignoring preset names
    pub fn curve(&self) -> String {
        match self {
            Easing::Linear => "linear".to_string(),
            Easing::Power(p) => format!("power({p})"),
            Easing::CubicBezier(bezier) => {
                let (x1, y1, x2, y2) = bezier.controls();
                format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }

    /// Preset name, if this curve is one of [`PRESETS`]
    pub fn name(&self) -> Option<&'static str> {
        PRESETS
            .iter()
            .find(|(_, easing)| easing == self)
            .map(|(name, _)| *name)
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    /// Parse a preset name, `power(p)` or `cubic-bezier(x1, y1, x2, y2)`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((_, easing)) = PRESETS.iter().find(|(name, _)| name.eq_ignore_ascii_case(s)) {
            return Ok(*easing);
        }

        let args = |prefix: &str| -> Option<Vec<f32>> {
            let inner = s.strip_prefix(prefix)?.strip_suffix(')')?;
            inner
                .split(',')
                .map(|part| part.trim().parse::<f32>().ok())
                .collect()
        };

        if let Some(values) = args("cubic-bezier(") {
            if let [x1, y1, x2, y2] = values[..] {
                return Easing::cubic_bezier(x1, y1, x2, y2);
            }
        }
        if let Some(values) = args("power(") {
            if let [p] = values[..] {
                return Easing::power(p);
            }
        }

        Err(AnimationError::UnknownEasing(s.to_string()))
    }
}

impl fmt::Display for Easing {
    /// Preset name when there is one, otherwise the curve in parsable form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.curve()),
        }
    }
}
