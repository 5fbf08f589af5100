//! Animation presets for the bundled widgets
//!
//! Pre-built drivers with their keyframe tables: the cloud upload indicator
//! and the iOS-style activity spinner.

use crate::driver::{AnimationDriver, DriverConfig, RepeatMode};
use crate::easing::Easing;
use crate::error::Result;
use crate::keyframe::KeyframeTrack;

/// Length of one upload run
pub const UPLOAD_DURATION_MS: u32 = 4_000;
/// Length of one spinner revolution
pub const SPINNER_PERIOD_MS: u32 = 700;
/// Delay of the left cloud relative to the other upload tracks
pub const LEFT_CLOUD_DELAY_MS: u32 = 300;

/// Track names registered by [`AnimationPreset::file_upload`]
pub mod tracks {
    pub const MIDDLE_CLOUD: &str = "middle_cloud";
    pub const LEFT_CLOUD: &str = "left_cloud";
    pub const RIGHT_CLOUD: &str = "right_cloud";
    pub const ARROW: &str = "arrow";
}

/// Sizes the upload keyframes are derived from, in renderer units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UploadLayout {
    /// Side of the circular clip box
    pub box_size: f32,
    /// Side of one cloud image
    pub cloud_size: f32,
}

impl Default for UploadLayout {
    fn default() -> Self {
        Self {
            box_size: 150.0,
            cloud_size: 90.0,
        }
    }
}

/// Time at `fraction` of a run lasting `duration_ms`
fn at(duration_ms: u32, fraction: f32) -> u32 {
    (duration_ms as f32 * fraction).round() as u32
}

/// Pre-built animation presets
pub struct AnimationPreset;

impl AnimationPreset {
    // ========================================================================
    // File upload
    // ========================================================================

    /// Upload indicator driver: one 4s run eased with a quintic in-out curve
    pub fn file_upload(layout: UploadLayout) -> Result<AnimationDriver> {
        AnimationDriver::with_tracks(
            Self::upload_config(),
            Self::upload_tracks(layout, UPLOAD_DURATION_MS)?,
        )
    }

    /// Driver configuration of the upload run
    pub fn upload_config() -> DriverConfig {
        DriverConfig::new(UPLOAD_DURATION_MS).easing(Easing::EASE_IN_OUT_QUINT)
    }

    /// Keyframe tracks of the upload indicator for a run of `duration_ms`.
    ///
    /// Keyframe times and the left cloud delay are fractions of the run, so
    /// the choreography keeps its shape at any duration. Very short runs
    /// collapse neighbouring keyframes and fail to build.
    pub fn upload_tracks(layout: UploadLayout, duration_ms: u32) -> Result<Vec<KeyframeTrack>> {
        let left_delay = at(
            duration_ms,
            LEFT_CLOUD_DELAY_MS as f32 / UPLOAD_DURATION_MS as f32,
        );
        Ok(vec![
            Self::middle_cloud(layout, duration_ms)?,
            Self::side_cloud(tracks::LEFT_CLOUD, layout.box_size * -0.15, left_delay, layout, duration_ms)?,
            Self::side_cloud(tracks::RIGHT_CLOUD, layout.box_size * 0.55, 0, layout, duration_ms)?,
            Self::arrow(layout, duration_ms)?,
        ])
    }

    /// Middle cloud dips, jumps out through the bottom, reappears from the top
    fn middle_cloud(layout: UploadLayout, duration_ms: u32) -> Result<KeyframeTrack> {
        let rest = layout.box_size / 2.0 - layout.cloud_size / 2.0;
        let at = |fraction| at(duration_ms, fraction);
        KeyframeTrack::builder(tracks::MIDDLE_CLOUD, duration_ms)
            .at(0, (rest, rest))
            .at_with_ease(at(0.2), (rest, rest), Easing::FAST_OUT_LINEAR_IN)
            .at(at(0.3), (rest, rest * 5.0))
            .at(at(0.3025), (rest, rest * -5.0))
            .at_with_ease(at(0.7), (rest, rest * -5.0), Easing::FAST_OUT_SLOW_IN)
            .at(duration_ms, (rest, rest))
            .build()
    }

    /// Side clouds sweep top to bottom twice and then stay hidden below
    fn side_cloud(
        name: &str,
        x: f32,
        delay_ms: u32,
        layout: UploadLayout,
        duration_ms: u32,
    ) -> Result<KeyframeTrack> {
        let edge = layout.box_size;
        let length = duration_ms.saturating_sub(delay_ms);
        let at = |fraction| at(duration_ms, fraction);
        KeyframeTrack::builder(name, length)
            .at(0, (x, -edge))
            .at_with_ease(at(0.2), (x, -edge), Easing::EASE_IN)
            .at(at(0.4), (x, edge))
            .at(at(0.4025), (x, -edge))
            .at_with_ease(at(0.5), (x, -edge), Easing::EASE_IN)
            .at(at(0.7), (x, edge))
            .at(length, (x, edge))
            .delay(delay_ms)
            .build()
    }

    /// Arrow nudges down, then rises slowly while the upload runs
    fn arrow(layout: UploadLayout, duration_ms: u32) -> Result<KeyframeTrack> {
        let rest = layout.box_size / 2.0 - 15.0;
        let at = |fraction| at(duration_ms, fraction);
        KeyframeTrack::builder(tracks::ARROW, duration_ms)
            .at_with_ease(0, rest, Easing::DECELERATE)
            .at(at(0.075), rest * 1.15)
            .at_with_ease(at(0.2), rest * 1.15, Easing::EASE_OUT_CIRC)
            .at_with_ease(at(0.8), rest * 0.6, Easing::FAST_OUT_SLOW_IN)
            .at(duration_ms, rest)
            .build()
    }

    // ========================================================================
    // Spinner
    // ========================================================================

    /// Spinner driver: linear 700ms revolutions forever, no tracks
    pub fn ios_spinner() -> Result<AnimationDriver> {
        AnimationDriver::new(DriverConfig::new(SPINNER_PERIOD_MS).repeat(RepeatMode::Infinite))
    }
}
