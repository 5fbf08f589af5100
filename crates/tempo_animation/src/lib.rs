//! Tempo Animation Engine
//!
//! Keyframe tracks, easing curves, and a tick-driven progress driver that
//! keeps several animated properties in sync with one progress value.
//!
//! # Features
//!
//! - **Easing**: linear, power and validated cubic bezier curves with named presets
//! - **Keyframe Tracks**: pure, scrubbable sampling of scalar or 2D offset values
//! - **Timelines**: many tracks sampled from one shared clock, with per-track delays
//! - **Drivers**: `Idle → Running → Completed` runs advanced by external frame ticks
//!
//! # Example
//!
//! ```
//! use tempo_animation::{AnimationDriver, DriverConfig, DriverState, KeyframeTrack};
//!
//! let track = KeyframeTrack::builder("offset", 4000)
//!     .at(0, 0.0)
//!     .at(2000, 150.0)
//!     .build()
//!     .unwrap();
//!
//! let mut driver = AnimationDriver::with_tracks(DriverConfig::new(4000), [track]).unwrap();
//! driver.start().unwrap();
//!
//! let frame = driver.tick(1000.0).unwrap();
//! assert_eq!(frame.sample("offset").and_then(|v| v.as_scalar()), Some(75.0));
//!
//! driver.tick(3000.0);
//! assert_eq!(driver.state(), DriverState::Completed);
//! ```

pub mod driver;
pub mod easing;
pub mod error;
pub mod keyframe;
pub mod presets;
pub mod scheduler;
pub mod timeline;
pub mod value;

pub use driver::{
    AnimationDriver, DriverConfig, DriverState, Frame, IdleValue, RepeatMode, RunId, StatePolicy,
};
pub use easing::{CubicBezier, Easing};
pub use error::{AnimationError, Result};
pub use keyframe::{Keyframe, KeyframeTrack, KeyframeTrackBuilder};
pub use presets::{AnimationPreset, UploadLayout};
pub use scheduler::{AnimationScheduler, DriverId};
pub use timeline::{Sample, Samples, Timeline, TrackId};
pub use value::{Value, ValueKind};
