//! Animation error types

use thiserror::Error;

/// Errors raised while building tracks or driving runs.
///
/// Everything except [`AnimationError::InvalidState`] is a configuration
/// error: it is returned when a curve or track is built or registered, never
/// from a tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Track was built without any keyframes
    #[error("track `{0}` has no keyframes")]
    EmptyTrack(String),

    /// Keyframe offsets are not strictly ascending
    #[error("track `{track}`: keyframe at {offset_ms}ms does not come after {previous_ms}ms")]
    NonMonotonicKeyframes {
        track: String,
        previous_ms: u32,
        offset_ms: u32,
    },

    /// Keyframe offset lies past the end of the track
    #[error("track `{track}`: keyframe at {offset_ms}ms exceeds duration {duration_ms}ms")]
    KeyframeOutOfRange {
        track: String,
        offset_ms: u32,
        duration_ms: u32,
    },

    /// Track or driver duration is zero
    #[error("`{0}` must have a duration greater than zero")]
    ZeroDuration(String),

    /// Keyframes of one track mix scalar and offset values
    #[error("track `{0}` mixes scalar and offset keyframe values")]
    MixedValueKinds(String),

    /// Cubic bezier control x-values outside [0, 1] or non-finite controls
    #[error("invalid cubic bezier ({x1}, {y1}, {x2}, {y2}): x controls must lie in [0, 1]")]
    InvalidBezier { x1: f32, y1: f32, x2: f32, y2: f32 },

    /// Power curve exponent is not a positive finite number
    #[error("invalid power curve exponent {0}")]
    InvalidPower(f32),

    /// A track with this name is already registered
    #[error("track `{0}` is already registered")]
    DuplicateTrack(String),

    /// No easing preset with this name
    #[error("unknown easing `{0}`")]
    UnknownEasing(String),

    /// Operation not allowed in the driver's current state
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
