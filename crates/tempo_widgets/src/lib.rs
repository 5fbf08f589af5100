//! Tempo Widget Library
//!
//! View models for animated widgets. Each widget owns one animation driver
//! and turns its frames into plain visual properties for a renderer.

pub mod spinner;
pub mod upload;
pub mod widget;

pub use spinner::{IosSpinner, SpinnerTick, SpinnerVisuals};
pub use upload::{FileUploadIndicator, UploadVisuals};
pub use widget::AnimatedWidget;
