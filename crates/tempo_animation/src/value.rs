//! Animated value kinds
//!
//! Interpolation is defined per kind. The set is closed on purpose: a track
//! animates either a scalar or a 2D offset, and the renderer decides what the
//! numbers mean.

/// A value carried by a keyframe or produced by a sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Scalar(f32),
    Offset { x: f32, y: f32 },
}

/// Discriminant of [`Value`], used to check that a track is homogeneous
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Offset,
}

impl Value {
    pub fn offset(x: f32, y: f32) -> Self {
        Value::Offset { x, y }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Offset { .. } => ValueKind::Offset,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Offset { .. } => None,
        }
    }

    pub fn as_offset(&self) -> Option<(f32, f32)> {
        match self {
            Value::Offset { x, y } => Some((*x, *y)),
            Value::Scalar(_) => None,
        }
    }

    /// Interpolate towards `other` by `t`.
    ///
    /// Kinds must match; a mismatched `other` is ignored and `self` returned.
    /// Tracks reject mixed kinds when built, so sampling never hits that case.
    pub fn lerp(&self, other: &Value, t: f32) -> Value {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(lerp(*a, *b, t)),
            (Value::Offset { x: ax, y: ay }, Value::Offset { x: bx, y: by }) => Value::Offset {
                x: lerp(*ax, *bx, t),
                y: lerp(*ay, *by, t),
            },
            _ => *self,
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Scalar(value)
    }
}

impl From<(f32, f32)> for Value {
    fn from((x, y): (f32, f32)) -> Self {
        Value::Offset { x, y }
    }
}
