//! Base widget trait

use tempo_animation::{AnimationDriver, Result};

/// A widget whose visual state is derived from one animation driver.
///
/// Widgets never draw. They turn frames into plain visual properties that a
/// renderer maps onto positions, sweep angles, opacities and labels.
pub trait AnimatedWidget {
    /// Snapshot of everything the renderer needs for one frame
    type Visuals;

    /// The driver that owns this widget's run
    fn driver(&self) -> &AnimationDriver;

    /// Current visuals without advancing time
    fn visuals(&self) -> Self::Visuals;

    /// Advance by one frame; `None` when no run is live
    fn tick(&mut self, delta_ms: f32) -> Option<Self::Visuals>;

    /// Stop the live run; no completion is reported for it
    fn cancel(&mut self) -> Result<()>;

    /// Whether the widget still needs frames
    fn is_animating(&self) -> bool {
        self.driver().is_running()
    }
}
