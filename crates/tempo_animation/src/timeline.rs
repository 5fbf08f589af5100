//! Timeline orchestration for multiple keyframe tracks
//!
//! Every track in a timeline is sampled from the same elapsed time. Tracks
//! only differ by their own start delay.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{AnimationError, Result};
use crate::keyframe::KeyframeTrack;
use crate::value::Value;

new_key_type! {
    pub struct TrackId;
}

/// One sampled track value for a single tick
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub track: String,
    pub value: Value,
}

/// Samples produced by one tick, in registration order
pub type Samples = SmallVec<[Sample; 8]>;

/// A set of tracks sampled against one shared clock
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    tracks: SlotMap<TrackId, KeyframeTrack>,
    by_name: FxHashMap<String, TrackId>,
    order: Vec<TrackId>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a track; names must be unique within the timeline
    pub fn register(&mut self, track: KeyframeTrack) -> Result<TrackId> {
        if self.by_name.contains_key(track.name()) {
            return Err(AnimationError::DuplicateTrack(track.name().to_string()));
        }

        let name = track.name().to_string();
        let id = self.tracks.insert(track);
        self.by_name.insert(name, id);
        self.order.push(id);
        Ok(id)
    }

    /// Remove a track
    pub fn unregister(&mut self, id: TrackId) -> Option<KeyframeTrack> {
        let track = self.tracks.remove(id)?;
        self.by_name.remove(track.name());
        self.order.retain(|other| *other != id);
        Some(track)
    }

    pub fn get(&self, id: TrackId) -> Option<&KeyframeTrack> {
        self.tracks.get(id)
    }

    pub fn find(&self, name: &str) -> Option<TrackId> {
        self.by_name.get(name).copied()
    }

    /// Iterate over tracks in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &KeyframeTrack)> {
        self.order.iter().map(move |id| (*id, &self.tracks[*id]))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Time at which the last track reaches its final keyframe
    pub fn end_ms(&self) -> u32 {
        self.tracks
            .values()
            .map(KeyframeTrack::end_ms)
            .max()
            .unwrap_or(0)
    }

    /// Sample every track at the same run time
    pub fn sample_all(&self, elapsed_ms: f32) -> Samples {
        self.iter()
            .map(|(_, track)| Sample {
                track: track.name().to_string(),
                value: track.sample_in_run(elapsed_ms),
            })
            .collect()
    }
}
