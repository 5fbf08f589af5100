//! iOS-style activity spinner
//!
//! Twelve rounded ticks arranged in a ring. The brightest tick walks around
//! the ring once per 700ms revolution and the others trail behind it.

use serde::Serialize;
use tempo_animation::{AnimationDriver, AnimationPreset, Result};

use crate::widget::AnimatedWidget;

/// Tick opacities, starting at twelve o'clock and going clockwise
pub const TICK_ALPHAS: [f32; 12] = [
    0.18, 0.18, 0.18, 0.18, 0.25, 0.32, 0.38, 0.44, 0.51, 0.57, 0.18, 0.18,
];

/// Number of ticks in the ring
pub const TICK_COUNT: usize = TICK_ALPHAS.len();

/// One tick of the ring
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpinnerTick {
    /// Clockwise rotation from twelve o'clock
    pub angle_deg: f32,
    pub alpha: f32,
}

/// Spinner state for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpinnerVisuals {
    pub progress: f32,
    pub ticks: [SpinnerTick; TICK_COUNT],
}

impl SpinnerVisuals {
    pub fn at(progress: f32) -> Self {
        let alphas = tick_alphas(progress);
        let step = 360.0 / TICK_COUNT as f32;
        let ticks = std::array::from_fn(|i| SpinnerTick {
            angle_deg: step * i as f32,
            alpha: alphas[i],
        });
        Self { progress, ticks }
    }
}

/// Rotate [`TICK_ALPHAS`] by the number of ticks already passed
pub fn tick_alphas(progress: f32) -> [f32; TICK_COUNT] {
    let active = (TICK_COUNT as f32 * progress.clamp(0.0, 1.0)).floor() as i64;
    std::array::from_fn(|count| {
        let index = (count as i64 - active).rem_euclid(TICK_COUNT as i64) as usize;
        TICK_ALPHAS[index]
    })
}

/// Spinner view model; spins from construction until stopped
pub struct IosSpinner {
    driver: AnimationDriver,
}

impl IosSpinner {
    pub fn new() -> Result<Self> {
        Self::with_driver(AnimationPreset::ios_spinner()?)
    }

    /// Spin with a custom driver (e.g. a different period)
    pub fn with_driver(mut driver: AnimationDriver) -> Result<Self> {
        driver.start()?;
        Ok(Self { driver })
    }

    /// Resume spinning from the top of a revolution
    pub fn restart(&mut self) -> Result<()> {
        self.driver.start().map(|_| ())
    }
}

impl AnimatedWidget for IosSpinner {
    type Visuals = SpinnerVisuals;

    fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    fn visuals(&self) -> SpinnerVisuals {
        SpinnerVisuals::at(self.driver.progress())
    }

    fn tick(&mut self, delta_ms: f32) -> Option<SpinnerVisuals> {
        let frame = self.driver.tick(delta_ms)?;
        Some(SpinnerVisuals::at(frame.progress))
    }

    /// Stop spinning; visuals freeze on the current revolution
    fn cancel(&mut self) -> Result<()> {
        self.driver.cancel()
    }
}
