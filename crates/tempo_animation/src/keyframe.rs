//! Keyframe tracks
//!
//! A track describes how one named property varies over a run. Sampling is a
//! pure function of `(track, elapsed_ms)`, so a track can be scrubbed in any
//! direction and replayed at any time.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::value::Value;

/// A single keyframe
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Time in milliseconds from the start of the track
    pub offset_ms: u32,
    /// Value at this keyframe
    pub value: Value,
    /// Easing for the segment that starts at this keyframe (linear if unset)
    pub easing: Option<Easing>,
}

impl Keyframe {
    pub fn new(offset_ms: u32, value: impl Into<Value>) -> Self {
        Self {
            offset_ms,
            value: value.into(),
            easing: None,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }
}

/// Builder for creating keyframe tracks with a fluent API
///
/// Keyframes are kept in the order they are added; [`build`](Self::build)
/// rejects anything that is not strictly ascending instead of re-sorting it.
///
/// # Example
///
/// ```
/// use tempo_animation::{Easing, KeyframeTrack};
///
/// let track = KeyframeTrack::builder("arrow", 4000)
///     .at_with_ease(0, 60.0, Easing::DECELERATE)
///     .at(300, 69.0)
///     .at(4000, 60.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(track.sample_at(300.0).as_scalar(), Some(69.0));
/// ```
#[derive(Clone, Debug)]
pub struct KeyframeTrackBuilder {
    name: String,
    duration_ms: u32,
    delay_ms: u32,
    keyframes: Vec<Keyframe>,
}

impl KeyframeTrackBuilder {
    pub fn new(name: impl Into<String>, duration_ms: u32) -> Self {
        Self {
            name: name.into(),
            duration_ms,
            delay_ms: 0,
            keyframes: Vec::new(),
        }
    }

    /// Add a keyframe with a linear segment after it
    pub fn at(mut self, offset_ms: u32, value: impl Into<Value>) -> Self {
        self.keyframes.push(Keyframe::new(offset_ms, value));
        self
    }

    /// Add a keyframe whose following segment uses `easing`
    pub fn at_with_ease(mut self, offset_ms: u32, value: impl Into<Value>, easing: Easing) -> Self {
        self.keyframes
            .push(Keyframe::new(offset_ms, value).with_easing(easing));
        self
    }

    /// Set delay before the track starts (in milliseconds)
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Validate and build the track
    pub fn build(self) -> Result<KeyframeTrack> {
        let Self {
            name,
            duration_ms,
            delay_ms,
            keyframes,
        } = self;

        if duration_ms == 0 {
            return Err(AnimationError::ZeroDuration(name));
        }
        let Some(first) = keyframes.first() else {
            return Err(AnimationError::EmptyTrack(name));
        };

        let kind = first.value.kind();
        for (i, kf) in keyframes.iter().enumerate() {
            if kf.offset_ms > duration_ms {
                return Err(AnimationError::KeyframeOutOfRange {
                    track: name,
                    offset_ms: kf.offset_ms,
                    duration_ms,
                });
            }
            if i > 0 && kf.offset_ms <= keyframes[i - 1].offset_ms {
                return Err(AnimationError::NonMonotonicKeyframes {
                    track: name,
                    previous_ms: keyframes[i - 1].offset_ms,
                    offset_ms: kf.offset_ms,
                });
            }
            if kf.value.kind() != kind {
                return Err(AnimationError::MixedValueKinds(name));
            }
            if let Some(easing) = &kf.easing {
                easing.validate()?;
            }
        }

        Ok(KeyframeTrack {
            name,
            keyframes,
            duration_ms,
            delay_ms,
        })
    }
}

/// A validated, immutable keyframe track
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeTrack {
    name: String,
    keyframes: Vec<Keyframe>,
    duration_ms: u32,
    delay_ms: u32,
}

impl KeyframeTrack {
    /// Create a new builder
    pub fn builder(name: impl Into<String>, duration_ms: u32) -> KeyframeTrackBuilder {
        KeyframeTrackBuilder::new(name, duration_ms)
    }

    /// A single-keyframe track that always samples to `value`
    pub fn constant(name: impl Into<String>, duration_ms: u32, value: impl Into<Value>) -> Result<Self> {
        Self::builder(name, duration_ms).at(0, value).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Delay plus duration
    pub fn end_ms(&self) -> u32 {
        self.delay_ms.saturating_add(self.duration_ms)
    }

    /// Value of the first keyframe, held while the track waits for its delay
    pub fn initial_value(&self) -> Value {
        self.keyframes[0].value
    }

    /// Sample the track at a time relative to its own start (delay excluded)
    pub fn sample_at(&self, elapsed_ms: f32) -> Value {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, self.duration_ms as f32)
        } else {
            0.0
        };

        // Index of the first keyframe strictly after `elapsed`
        let next = self
            .keyframes
            .partition_point(|kf| kf.offset_ms as f32 <= elapsed);

        if next == 0 {
            return self.keyframes[0].value;
        }
        let prev_kf = &self.keyframes[next - 1];
        let Some(next_kf) = self.keyframes.get(next) else {
            return prev_kf.value;
        };

        let span = (next_kf.offset_ms - prev_kf.offset_ms) as f32;
        let t = if span > 0.0 {
            (elapsed - prev_kf.offset_ms as f32) / span
        } else {
            1.0
        };
        let eased = prev_kf.easing.unwrap_or_default().apply(t);

        prev_kf.value.lerp(&next_kf.value, eased)
    }

    /// Sample the track at run time, honouring its start delay
    pub fn sample_in_run(&self, run_elapsed_ms: f32) -> Value {
        let local = run_elapsed_ms - self.delay_ms as f32;
        if local < 0.0 {
            return self.initial_value();
        }
        self.sample_at(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(track: &KeyframeTrack, at: f32) -> f32 {
        track.sample_at(at).as_scalar().unwrap()
    }

    fn ramp() -> KeyframeTrack {
        KeyframeTrack::builder("ramp", 4000)
            .at(0, 0.0)
            .at(2000, 150.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_ramp_scenario() {
        let track = ramp();
        assert_eq!(scalar(&track, 1000.0), 75.0);
        assert_eq!(scalar(&track, 3000.0), 150.0);
        assert_eq!(scalar(&track, 5000.0), 150.0);
    }

    #[test]
    fn test_clamping_law() {
        let track = ramp();
        assert_eq!(track.sample_at(-250.0), track.sample_at(0.0));
        assert_eq!(track.sample_at(9000.0), track.sample_at(4000.0));
        assert_eq!(track.sample_at(f32::NAN), track.sample_at(0.0));
    }

    #[test]
    fn test_sample_at_keyframe_is_exact() {
        let track = KeyframeTrack::builder("eased", 1000)
            .at_with_ease(0, 3.0, Easing::EASE_IN_OUT_QUINT)
            .at_with_ease(250, -7.5, Easing::DECELERATE)
            .at_with_ease(600, 42.25, Easing::FAST_OUT_SLOW_IN)
            .at(1000, 1.0)
            .build()
            .unwrap();

        for kf in track.keyframes() {
            assert_eq!(track.sample_at(kf.offset_ms as f32), kf.value);
        }
    }

    #[test]
    fn test_hold_before_first_keyframe() {
        let track = KeyframeTrack::builder("late", 1000)
            .at(400, 5.0)
            .at(800, 10.0)
            .build()
            .unwrap();
        assert_eq!(scalar(&track, 100.0), 5.0);
        assert_eq!(scalar(&track, 600.0), 7.5);
        assert_eq!(scalar(&track, 900.0), 10.0);
    }

    #[test]
    fn test_single_keyframe_is_static() {
        let track = KeyframeTrack::constant("static", 500, 12.0).unwrap();
        for at in [-10.0, 0.0, 250.0, 500.0, 800.0] {
            assert_eq!(scalar(&track, at), 12.0);
        }
    }

    #[test]
    fn test_segment_easing_applies_to_following_segment() {
        let track = KeyframeTrack::builder("quad", 100)
            .at_with_ease(0, 0.0, Easing::DECELERATE)
            .at(50, 100.0)
            .at(100, 0.0)
            .build()
            .unwrap();
        // First segment is t^2, second is linear
        assert_eq!(scalar(&track, 25.0), 25.0);
        assert_eq!(scalar(&track, 75.0), 50.0);
    }

    #[test]
    fn test_sampling_is_continuous_between_keyframes() {
        let track = KeyframeTrack::builder("smooth", 4000)
            .at_with_ease(0, 0.0, Easing::FAST_OUT_SLOW_IN)
            .at_with_ease(1500, 300.0, Easing::EASE_IN)
            .at(4000, -100.0)
            .build()
            .unwrap();

        let mut prev = scalar(&track, 0.0);
        for step in 1..=4000 {
            let value = scalar(&track, step as f32);
            assert!((value - prev).abs() < 2.0, "jump at {step}ms: {prev} -> {value}");
            prev = value;
        }
    }

    #[test]
    fn test_sampling_is_repeatable_and_scrubbable() {
        let track = ramp();
        let forward: Vec<_> = (0..40).map(|i| track.sample_at(i as f32 * 100.0)).collect();
        let backward: Vec<_> = (0..40)
            .rev()
            .map(|i| track.sample_at(i as f32 * 100.0))
            .collect();
        assert_eq!(forward, backward.into_iter().rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_offset_track_interpolates_both_axes() {
        let track = KeyframeTrack::builder("cloud", 1000)
            .at(0, (0.0, -100.0))
            .at(1000, (50.0, 100.0))
            .build()
            .unwrap();
        assert_eq!(track.sample_at(500.0), Value::offset(25.0, 0.0));
    }

    #[test]
    fn test_delay_holds_initial_value() {
        let track = KeyframeTrack::builder("delayed", 1000)
            .at(0, 10.0)
            .at(1000, 20.0)
            .delay(300)
            .build()
            .unwrap();
        assert_eq!(track.sample_in_run(100.0), Value::Scalar(10.0));
        assert_eq!(track.sample_in_run(800.0), Value::Scalar(15.0));
        assert_eq!(track.end_ms(), 1300);
    }

    #[test]
    fn test_build_errors() {
        assert_eq!(
            KeyframeTrack::builder("empty", 100).build(),
            Err(AnimationError::EmptyTrack("empty".into()))
        );
        assert_eq!(
            KeyframeTrack::builder("zero", 0).at(0, 1.0).build(),
            Err(AnimationError::ZeroDuration("zero".into()))
        );
        assert!(matches!(
            KeyframeTrack::builder("dup", 100).at(0, 1.0).at(50, 2.0).at(50, 3.0).build(),
            Err(AnimationError::NonMonotonicKeyframes { offset_ms: 50, .. })
        ));
        assert!(matches!(
            KeyframeTrack::builder("back", 100).at(60, 1.0).at(20, 2.0).build(),
            Err(AnimationError::NonMonotonicKeyframes { previous_ms: 60, .. })
        ));
        assert!(matches!(
            KeyframeTrack::builder("long", 100).at(0, 1.0).at(150, 2.0).build(),
            Err(AnimationError::KeyframeOutOfRange { offset_ms: 150, .. })
        ));
        assert_eq!(
            KeyframeTrack::builder("mixed", 100).at(0, 1.0).at(100, (1.0, 2.0)).build(),
            Err(AnimationError::MixedValueKinds("mixed".into()))
        );
        assert_eq!(
            KeyframeTrack::builder("pow", 100)
                .at_with_ease(0, 1.0, Easing::Power(-1.0))
                .build(),
            Err(AnimationError::InvalidPower(-1.0))
        );
    }
}
