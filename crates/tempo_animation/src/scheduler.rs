//! Animation scheduler
//!
//! Owns one driver per animated widget instance and forwards frame deltas to
//! all of them. Ticks are processed one driver at a time on the calling
//! thread.

use slotmap::{new_key_type, SlotMap};
use std::time::Instant;

use crate::driver::{AnimationDriver, Frame};

new_key_type! {
    pub struct DriverId;
}

/// The animation scheduler that ticks all registered drivers
pub struct AnimationScheduler {
    drivers: SlotMap<DriverId, AnimationDriver>,
    last_frame: Instant,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            drivers: SlotMap::with_key(),
            last_frame: Instant::now(),
        }
    }

    pub fn add_driver(&mut self, driver: AnimationDriver) -> DriverId {
        self.drivers.insert(driver)
    }

    pub fn get_driver(&self, id: DriverId) -> Option<&AnimationDriver> {
        self.drivers.get(id)
    }

    pub fn get_driver_mut(&mut self, id: DriverId) -> Option<&mut AnimationDriver> {
        self.drivers.get_mut(id)
    }

    pub fn remove_driver(&mut self, id: DriverId) -> Option<AnimationDriver> {
        self.drivers.remove(id)
    }

    /// Tick all drivers with the wall-clock time since the previous tick
    pub fn tick(&mut self) -> Vec<(DriverId, Frame)> {
        let now = Instant::now();
        let dt_ms = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        self.advance(dt_ms)
    }

    /// Tick all drivers by an explicit delta (in milliseconds)
    pub fn tick_by(&mut self, dt_ms: f32) -> Vec<(DriverId, Frame)> {
        self.last_frame = Instant::now();
        self.advance(dt_ms)
    }

    fn advance(&mut self, dt_ms: f32) -> Vec<(DriverId, Frame)> {
        self.drivers
            .iter_mut()
            .filter_map(|(id, driver)| driver.tick(dt_ms).map(|frame| (id, frame)))
            .collect()
    }

    /// Check if any driver still has a live run
    pub fn has_active_animations(&self) -> bool {
        self.drivers.iter().any(|(_, d)| d.is_running())
    }

    /// Get the number of drivers in the scheduler
    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}
