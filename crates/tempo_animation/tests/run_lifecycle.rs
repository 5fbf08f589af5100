//! Integration tests for driver + timeline + scheduler
//!
//! These tests verify that:
//! - All tracks of a run observe the same elapsed time on every tick
//! - Completion fires exactly once and only for runs that finish
//! - Cancellation stops the frame stream immediately
//! - Scrubbing a driver matches what live ticks produced

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempo_animation::presets::tracks;
use tempo_animation::{
    AnimationDriver, AnimationError, AnimationPreset, AnimationScheduler, DriverConfig,
    DriverState, Easing, KeyframeTrack, UploadLayout, Value,
};

fn line(name: &str, to: f32, delay_ms: u32) -> KeyframeTrack {
    KeyframeTrack::builder(name, 2000)
        .at(0, 0.0)
        .at(2000, to)
        .delay(delay_ms)
        .build()
        .unwrap()
}

/// Four ticks of 1000ms complete a 4000ms run
#[test]
fn test_progress_driver_scenario() {
    let mut driver = AnimationDriver::new(DriverConfig::new(4000)).unwrap();
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();
    driver.on_complete(move |_| {
        fired_clone.fetch_add(1, Ordering::SeqCst);
    });

    driver.start().unwrap();
    for _ in 0..4 {
        driver.tick(1000.0);
    }

    assert_eq!(driver.state(), DriverState::Completed);
    assert_eq!(driver.progress(), 1.0);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

/// Cancelling at 2000ms ends the sample stream without completion
#[test]
fn test_cancel_mid_run_scenario() {
    let mut driver =
        AnimationDriver::with_tracks(DriverConfig::new(4000), [line("x", 100.0, 0)]).unwrap();
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();
    driver.on_complete(move |_| {
        fired_clone.fetch_add(1, Ordering::SeqCst);
    });

    driver.start().unwrap();
    let frames: Vec<_> = driver.frames(500.0).take(4).collect();
    assert_eq!(frames.last().unwrap().elapsed_ms, 2000.0);

    driver.cancel().unwrap();
    assert_eq!(driver.frames(500.0).count(), 0);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn test_tracks_share_one_clock() {
    let mut driver = AnimationDriver::with_tracks(
        DriverConfig::new(2000),
        [line("a", 100.0, 0), line("b", 200.0, 0), line("c", 100.0, 500)],
    )
    .unwrap();

    driver.start().unwrap();
    for frame in driver.frames(125.0) {
        let a = frame.sample("a").and_then(Value::as_scalar).unwrap();
        let b = frame.sample("b").and_then(Value::as_scalar).unwrap();
        let c = frame.sample("c").and_then(Value::as_scalar).unwrap();

        assert_eq!(b, a * 2.0, "at {}ms", frame.elapsed_ms);
        let expected_c = ((frame.elapsed_ms - 500.0).max(0.0) / 2000.0) * 100.0;
        assert!((c - expected_c).abs() < 1e-3, "at {}ms", frame.elapsed_ms);
    }
}

#[test]
fn test_failed_registration_keeps_other_tracks() {
    let mut driver = AnimationDriver::new(DriverConfig::new(1000)).unwrap();
    driver.register_track(line("kept", 10.0, 0)).unwrap();

    let empty = KeyframeTrack::builder("broken", 1000).build();
    assert!(matches!(empty, Err(AnimationError::EmptyTrack(_))));
    assert!(matches!(
        driver.register_track(line("kept", 20.0, 0)),
        Err(AnimationError::DuplicateTrack(_))
    ));

    driver.start().unwrap();
    let frame = driver.tick(1000.0).unwrap();
    assert_eq!(frame.samples.len(), 1);
    assert_eq!(frame.sample("kept"), Some(&Value::Scalar(5.0)));
}

#[test]
fn test_scrubbing_matches_live_frames() {
    let mut driver = AnimationPreset::file_upload(UploadLayout::default()).unwrap();
    driver.start().unwrap();
    let live: Vec<_> = driver.frames(50.0).collect();

    for frame in live.iter().rev() {
        assert_eq!(driver.sample_at(frame.elapsed_ms), frame.samples);
    }
}

#[test]
fn test_upload_progress_is_eased() {
    let mut driver = AnimationPreset::file_upload(UploadLayout::default()).unwrap();
    driver.start().unwrap();
    let frame = driver.tick(1000.0).unwrap();
    let expected = Easing::EASE_IN_OUT_QUINT.apply(0.25);
    assert!((frame.progress - expected).abs() < 1e-6);
    assert!(frame.progress < 0.25);
    assert!(frame.sample(tracks::ARROW).is_some());
}

#[test]
fn test_scheduler_drives_independent_widgets() {
    let mut scheduler = AnimationScheduler::new();
    let upload = scheduler.add_driver(AnimationPreset::file_upload(UploadLayout::default()).unwrap());
    let spinner = scheduler.add_driver(AnimationPreset::ios_spinner().unwrap());

    scheduler.get_driver_mut(upload).unwrap().start().unwrap();
    scheduler.get_driver_mut(spinner).unwrap().start().unwrap();

    let mut upload_frames = 0;
    for _ in 0..300 {
        for (id, _) in scheduler.tick_by(16.0) {
            if id == upload {
                upload_frames += 1;
            }
        }
    }

    assert_eq!(upload_frames, 250);
    assert_eq!(
        scheduler.get_driver(upload).unwrap().state(),
        DriverState::Completed
    );
    assert!(scheduler.get_driver(spinner).unwrap().is_running());
}
