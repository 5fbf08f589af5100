//! File upload indicator
//!
//! A circular progress arc around three clouds and an arrow. One click starts
//! a 4s run; the arc, label and every cloud follow the same run clock.

use serde::Serialize;
use tempo_animation::presets::tracks;
use tempo_animation::{
    AnimationDriver, AnimationPreset, Frame, Result, RunId, Samples, UploadLayout,
};

use crate::widget::AnimatedWidget;

/// Arc starts at twelve o'clock
pub const ARC_START_DEG: f32 = -90.0;
/// Progress from which the arc fades out
pub const ARC_FADE_FROM: f32 = 0.98;

/// Everything the upload renderer needs for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UploadVisuals {
    /// Eased run progress in `[0, 1]`
    pub progress: f32,
    /// True only while a run is live
    pub in_progress: bool,
    pub arc_start_deg: f32,
    pub arc_sweep_deg: f32,
    pub arc_alpha: f32,
    /// `"42%"` while uploading, `"Completed"` at the end
    pub label: String,
    pub middle_cloud: (f32, f32),
    pub left_cloud: (f32, f32),
    pub right_cloud: (f32, f32),
    pub arrow_y: f32,
}

impl UploadVisuals {
    fn from_samples(progress: f32, in_progress: bool, samples: &Samples) -> Self {
        let offset = |name: &str| {
            samples
                .iter()
                .find(|s| s.track == name)
                .and_then(|s| s.value.as_offset())
                .unwrap_or_default()
        };
        let arrow_y = samples
            .iter()
            .find(|s| s.track == tracks::ARROW)
            .and_then(|s| s.value.as_scalar())
            .unwrap_or_default();

        Self {
            progress,
            in_progress,
            arc_start_deg: ARC_START_DEG,
            arc_sweep_deg: 360.0 * progress,
            arc_alpha: arc_alpha(progress),
            label: progress_label(progress),
            middle_cloud: offset(tracks::MIDDLE_CLOUD),
            left_cloud: offset(tracks::LEFT_CLOUD),
            right_cloud: offset(tracks::RIGHT_CLOUD),
            arrow_y,
        }
    }
}

/// Arc opacity: solid until [`ARC_FADE_FROM`], then fades to zero at 1.0
pub fn arc_alpha(progress: f32) -> f32 {
    if progress < ARC_FADE_FROM {
        1.0
    } else {
        ((1.0 - progress) / (1.0 - ARC_FADE_FROM)).clamp(0.0, 1.0)
    }
}

/// Percentage label, truncated towards zero
pub fn progress_label(progress: f32) -> String {
    if progress < 1.0 {
        format!("{}%", (progress * 100.0) as i32)
    } else {
        "Completed".to_string()
    }
}

/// Upload indicator view model
pub struct FileUploadIndicator {
    driver: AnimationDriver,
    visuals: UploadVisuals,
}

impl FileUploadIndicator {
    pub fn new(layout: UploadLayout) -> Result<Self> {
        Ok(Self::with_driver(AnimationPreset::file_upload(layout)?))
    }

    /// Wrap a driver carrying the upload tracks (e.g. one built from config)
    pub fn with_driver(driver: AnimationDriver) -> Self {
        // At rest every element sits where a finished run leaves it
        let rest = driver.sample_at(driver.config().duration_ms as f32);
        let visuals = UploadVisuals::from_samples(0.0, false, &rest);
        Self { driver, visuals }
    }

    /// Start (or restart) the upload; progress snaps to zero first
    pub fn click(&mut self) -> Result<RunId> {
        let run = self.driver.start()?;
        self.visuals.progress = 0.0;
        self.visuals.arc_sweep_deg = 0.0;
        self.visuals.arc_alpha = arc_alpha(0.0);
        self.visuals.label = progress_label(0.0);
        self.visuals.in_progress = true;
        tracing::debug!("Upload run {} started", run.get());
        Ok(run)
    }

    fn apply(&mut self, frame: &Frame) {
        self.visuals =
            UploadVisuals::from_samples(frame.progress, !frame.completed, &frame.samples);
    }

    /// Offset of a named cloud in the current visuals
    pub fn cloud(&self, track: &str) -> Option<(f32, f32)> {
        match track {
            tracks::MIDDLE_CLOUD => Some(self.visuals.middle_cloud),
            tracks::LEFT_CLOUD => Some(self.visuals.left_cloud),
            tracks::RIGHT_CLOUD => Some(self.visuals.right_cloud),
            _ => None,
        }
    }
}

impl AnimatedWidget for FileUploadIndicator {
    type Visuals = UploadVisuals;

    fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    fn visuals(&self) -> UploadVisuals {
        self.visuals.clone()
    }

    fn tick(&mut self, delta_ms: f32) -> Option<UploadVisuals> {
        let frame = self.driver.tick(delta_ms)?;
        self.apply(&frame);
        Some(self.visuals.clone())
    }

    /// Abort the upload; the in-progress flag clears immediately
    fn cancel(&mut self) -> Result<()> {
        self.driver.cancel()?;
        self.visuals.in_progress = false;
        Ok(())
    }
}
