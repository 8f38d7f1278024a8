//! Response curves
//!
//! A [`Curve`] is an ordered list of control points sampled with clamped
//! linear interpolation. The locomotion solver samples its curves over the
//! `[-1, 1]` alignment domain, but the sampler itself works on any range.

use serde::{Deserialize, Serialize};

/// A single control point of a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Errors that can occur when building a curve
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("curve needs at least one control point")]
    Empty,

    #[error("control point {0} is not finite")]
    NotFinite(usize),

    #[error("control point {0} does not come strictly after the previous one")]
    Unordered(usize),
}

/// Ordered control-point sampler with clamped interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    /// Build a curve from control points sorted by strictly increasing time
    pub fn new(keys: Vec<Keyframe>) -> Result<Self, CurveError> {
        if keys.is_empty() {
            return Err(CurveError::Empty);
        }

        for (i, key) in keys.iter().enumerate() {
            if !key.time.is_finite() || !key.value.is_finite() {
                return Err(CurveError::NotFinite(i));
            }
            if i > 0 && key.time <= keys[i - 1].time {
                return Err(CurveError::Unordered(i));
            }
        }

        Ok(Self { keys })
    }

    /// A curve returning `value` everywhere
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![Keyframe::new(-1.0, value), Keyframe::new(1.0, value)],
        }
    }

    /// A straight line from `from` at -1 to `to` at 1
    pub fn linear(from: f32, to: f32) -> Self {
        Self {
            keys: vec![Keyframe::new(-1.0, from), Keyframe::new(1.0, to)],
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Sample the curve at `t`, holding the end values outside the key range
    pub fn evaluate(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];

        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; guaranteed to be in 1..len by the checks above
        let upper = self.keys.partition_point(|key| key.time <= t);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let span = b.time - a.time;
        let f = (t - a.time) / span;
        a.value + (b.value - a.value) * f
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::constant(1.0)
    }
}

impl TryFrom<Vec<Keyframe>> for Curve {
    type Error = CurveError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}
