//! Progress driver
//!
//! Owns one run at a time and advances it from externally supplied frame
//! deltas. Each tick returns a [`Frame`]; returning from `tick` is the only
//! suspension point, there is no internal clock or thread.
//!
//! ```text
//!   Idle ──start──▶ Running ──elapsed ≥ duration──▶ Completed
//!    ▲                │  ▲                              │
//!    └────cancel──────┘  └───────────start──────────────┘
//! ```

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::keyframe::KeyframeTrack;
use crate::timeline::{Samples, Timeline, TrackId};

/// Driver lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverState {
    #[default]
    Idle,
    Running,
    Completed,
}

impl DriverState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverState::Idle => "idle",
            DriverState::Running => "running",
            DriverState::Completed => "completed",
        }
    }
}

/// How many times a run plays before completing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Once,
    /// Play `n` iterations; `Count(0)` behaves like `Once`
    Count(u32),
    /// Never completes, only cancel stops it
    Infinite,
}

impl RepeatMode {
    fn iterations(&self) -> Option<u32> {
        match self {
            RepeatMode::Once => Some(1),
            RepeatMode::Count(n) => Some((*n).max(1)),
            RepeatMode::Infinite => None,
        }
    }
}

/// What `progress()` reports after a run is cancelled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdleValue {
    /// Keep the last emitted progress
    #[default]
    Hold,
    /// Drop back to zero
    Reset,
}

/// How `start`/`cancel` react when called in the wrong state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatePolicy {
    /// `cancel` while not running is a no-op, `start` while running restarts
    #[default]
    Lenient,
    /// Both return [`AnimationError::InvalidState`]
    Strict,
}

/// Driver configuration
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Length of one iteration in milliseconds
    pub duration_ms: u32,
    /// Curve applied to the primary progress value
    pub easing: Easing,
    pub repeat: RepeatMode,
    pub idle: IdleValue,
    pub policy: StatePolicy,
}

impl DriverConfig {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            easing: Easing::Linear,
            repeat: RepeatMode::Once,
            idle: IdleValue::Hold,
            policy: StatePolicy::Lenient,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn repeat(mut self, repeat: RepeatMode) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn idle(mut self, idle: IdleValue) -> Self {
        self.idle = idle;
        self
    }

    pub fn policy(mut self, policy: StatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration_ms == 0 {
            return Err(AnimationError::ZeroDuration("driver".into()));
        }
        self.easing.validate()
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new(300)
    }
}

/// Identifier of one run; increases with every `start`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Output of one tick
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub run: RunId,
    /// Elapsed time within the current iteration
    pub elapsed_ms: f32,
    /// Zero-based iteration index
    pub iteration: u32,
    /// Eased primary progress in `[0, 1]`
    pub progress: f32,
    pub samples: Samples,
    /// Set on the frame that finished the run
    pub completed: bool,
}

impl Frame {
    /// Look up a sample by track name
    pub fn sample(&self, track: &str) -> Option<&crate::value::Value> {
        self.samples
            .iter()
            .find(|s| s.track == track)
            .map(|s| &s.value)
    }
}

/// Callback fired once when a run completes
pub type CompletionCallback = Box<dyn FnMut(RunId) + Send>;

struct Run {
    id: RunId,
    elapsed_ms: f32,
    iteration: u32,
}

/// Drives one animated widget instance
pub struct AnimationDriver {
    config: DriverConfig,
    timeline: Timeline,
    state: DriverState,
    run: Option<Run>,
    progress: f32,
    next_run: u64,
    on_complete: SmallVec<[CompletionCallback; 2]>,
}

impl AnimationDriver {
    pub fn new(config: DriverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            timeline: Timeline::new(),
            state: DriverState::Idle,
            run: None,
            progress: 0.0,
            next_run: 0,
            on_complete: SmallVec::new(),
        })
    }

    /// Create a driver with tracks already registered
    pub fn with_tracks(
        config: DriverConfig,
        tracks: impl IntoIterator<Item = KeyframeTrack>,
    ) -> Result<Self> {
        let mut driver = Self::new(config)?;
        for track in tracks {
            driver.register_track(track)?;
        }
        Ok(driver)
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Register a track with this driver's timeline
    pub fn register_track(&mut self, track: KeyframeTrack) -> Result<TrackId> {
        if track.end_ms() > self.config.duration_ms {
            tracing::warn!(
                "Track `{}` ends at {}ms, after the {}ms run; it will be cut short",
                track.name(),
                track.end_ms(),
                self.config.duration_ms
            );
        }
        self.timeline.register(track)
    }

    /// Register a callback fired once for every run that completes
    pub fn on_complete<F: FnMut(RunId) + Send + 'static>(&mut self, callback: F) {
        self.on_complete.push(Box::new(callback));
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// True only while a run is live
    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Current eased progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.run.as_ref().map(|r| r.id)
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.run.as_ref().map_or(0.0, |r| r.elapsed_ms)
    }

    /// Start a new run.
    ///
    /// Progress snaps to zero before the run begins. A live run is cancelled
    /// first (without completion) unless the policy is strict.
    pub fn start(&mut self) -> Result<RunId> {
        if self.state == DriverState::Running {
            if self.config.policy == StatePolicy::Strict {
                return Err(self.invalid_state("start"));
            }
            tracing::debug!("Restarting animation; cancelling live run");
            self.halt();
        }

        self.progress = 0.0;
        self.next_run += 1;
        let id = RunId(self.next_run);
        self.run = Some(Run {
            id,
            elapsed_ms: 0.0,
            iteration: 0,
        });
        self.state = DriverState::Running;
        tracing::debug!("Animation run {} started", id.0);
        Ok(id)
    }

    /// Stop the live run without firing completion
    pub fn cancel(&mut self) -> Result<()> {
        if self.state != DriverState::Running {
            if self.config.policy == StatePolicy::Strict {
                return Err(self.invalid_state("cancel"));
            }
            tracing::debug!("Cancel ignored while {}", self.state.as_str());
            return Ok(());
        }
        self.halt();
        Ok(())
    }

    fn halt(&mut self) {
        if let Some(run) = self.run.take() {
            tracing::debug!("Animation run {} cancelled at {}ms", run.id.0, run.elapsed_ms);
        }
        self.state = DriverState::Idle;
        if self.config.idle == IdleValue::Reset {
            self.progress = 0.0;
        }
    }

    fn invalid_state(&self, operation: &'static str) -> AnimationError {
        AnimationError::InvalidState {
            operation,
            state: self.state.as_str(),
        }
    }

    /// Advance the live run by `delta_ms` and sample every track.
    ///
    /// Returns `None` when no run is live, so a cancelled or completed run
    /// never produces further frames.
    pub fn tick(&mut self, delta_ms: f32) -> Option<Frame> {
        if self.state != DriverState::Running {
            return None;
        }
        let run = self.run.as_mut()?;

        let delta = if delta_ms.is_finite() && delta_ms >= 0.0 {
            delta_ms
        } else {
            tracing::warn!("Ignoring invalid frame delta {}", delta_ms);
            0.0
        };
        run.elapsed_ms += delta;

        let duration = self.config.duration_ms as f32;
        if run.elapsed_ms >= duration {
            // `as` saturates, so one huge delta cannot overflow the counter
            let wraps = (run.elapsed_ms / duration).floor() as u32;
            let remaining = self
                .config
                .repeat
                .iterations()
                .map(|total| total - 1 - run.iteration);
            match remaining {
                Some(remaining) if wraps > remaining => {
                    run.iteration += remaining;
                    run.elapsed_ms = duration;
                }
                _ => {
                    run.elapsed_ms = run.elapsed_ms.rem_euclid(duration);
                    run.iteration = run.iteration.saturating_add(wraps);
                }
            }
        }

        let completed = run.elapsed_ms >= duration;
        if completed {
            run.elapsed_ms = duration;
        }

        let (id, elapsed_ms, iteration) = (run.id, run.elapsed_ms, run.iteration);
        self.progress = if completed {
            1.0
        } else {
            self.config
                .easing
                .apply((elapsed_ms / duration).clamp(0.0, 1.0))
                .clamp(0.0, 1.0)
        };

        let frame = Frame {
            run: id,
            elapsed_ms,
            iteration,
            progress: self.progress,
            samples: self.timeline.sample_all(elapsed_ms),
            completed,
        };

        if completed {
            self.state = DriverState::Completed;
            tracing::debug!("Animation run {} completed", id.0);
            for callback in self.on_complete.iter_mut() {
                callback(id);
            }
        }

        Some(frame)
    }

    /// Sample every track at an arbitrary time without touching the run
    pub fn sample_at(&self, elapsed_ms: f32) -> Samples {
        self.timeline.sample_all(elapsed_ms)
    }

    /// Tick with a fixed step until the run ends.
    ///
    /// The iterator is finite unless the repeat mode is infinite. A step
    /// that is not a positive finite number yields no frames.
    pub fn frames(&mut self, step_ms: f32) -> Frames<'_> {
        Frames {
            driver: self,
            step_ms,
        }
    }
}

/// Fixed-step frame iterator returned by [`AnimationDriver::frames`]
pub struct Frames<'a> {
    driver: &'a mut AnimationDriver,
    step_ms: f32,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if !(self.step_ms.is_finite() && self.step_ms > 0.0) {
            return None;
        }
        self.driver.tick(self.step_ms)
    }
}
