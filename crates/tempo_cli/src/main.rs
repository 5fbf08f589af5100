//! Tempo CLI
//!
//! Plays the bundled widget animations headlessly on a simulated clock and
//! prints every frame, so keyframe tables can be inspected without a renderer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tempo_animation::easing::PRESETS;
use tempo_animation::{AnimationDriver, AnimationPreset, Easing, RunId, Value};
use tempo_widgets::{AnimatedWidget, FileUploadIndicator, IosSpinner, SpinnerVisuals, UploadVisuals};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::{PlaybackConfig, TempoConfig};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Tempo - headless keyframe animation player")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one widget run and print its frames
    Play {
        /// Widget to animate
        #[arg(value_enum)]
        widget: WidgetKind,

        /// Config file (defaults to ./tempo.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Simulated frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Override the iteration length
        #[arg(long)]
        duration_ms: Option<u32>,

        /// Override the progress easing (preset name, power(p), cubic-bezier(...))
        #[arg(long)]
        easing: Option<String>,

        /// Cancel the run after this much simulated time
        #[arg(long)]
        cancel_at: Option<u32>,

        /// Stop after this much simulated time
        #[arg(long)]
        max_ms: Option<u32>,

        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// List the easing presets
    Presets,

    /// Sample one upload track at a point of the run
    Sample {
        /// Track name (middle_cloud, left_cloud, right_cloud, arrow)
        track: String,

        /// Elapsed run time in milliseconds
        elapsed_ms: f32,

        /// Config file (defaults to ./tempo.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WidgetKind {
    Upload,
    Spinner,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Play {
            widget,
            config,
            fps,
            duration_ms,
            easing,
            cancel_at,
            max_ms,
            json,
        } => {
            let mut config = TempoConfig::load(config.as_deref())?;
            if let Some(fps) = fps {
                config.playback.fps = fps;
            }
            if let Some(max_ms) = max_ms {
                config.playback.max_ms = max_ms;
            }
            if cancel_at.is_some() {
                config.playback.cancel_at_ms = cancel_at;
            }
            if duration_ms.is_some() {
                config.driver.duration_ms = duration_ms;
            }
            if easing.is_some() {
                config.driver.easing = easing;
            }
            play_command(widget, &config, json)
        }
        Commands::Presets => presets_command(),
        Commands::Sample {
            track,
            elapsed_ms,
            config,
        } => sample_command(&track, elapsed_ms, config),
    }
}

fn play_command(widget: WidgetKind, config: &TempoConfig, json: bool) -> Result<()> {
    let mut driver = build_driver(widget, config)?;
    driver.on_complete(|run: RunId| info!("Run {} completed", run.get()));

    let frames = match widget {
        WidgetKind::Upload => {
            let mut indicator = FileUploadIndicator::with_driver(driver);
            indicator.click()?;
            play(&mut indicator, &config.playback, json, upload_line)?
        }
        WidgetKind::Spinner => {
            let mut spinner = IosSpinner::with_driver(driver)?;
            play(&mut spinner, &config.playback, json, spinner_line)?
        }
    };

    info!("Played {} frames", frames);
    Ok(())
}

/// Preset driver for a widget with the configured overrides applied
fn build_driver(widget: WidgetKind, config: &TempoConfig) -> Result<AnimationDriver> {
    let preset = match widget {
        WidgetKind::Upload => AnimationPreset::upload_config(),
        WidgetKind::Spinner => AnimationPreset::ios_spinner()?.config().clone(),
    };
    let driver_config = config.driver.apply(preset)?;
    debug!(
        "{:?} driver: {}ms, easing {}",
        widget, driver_config.duration_ms, driver_config.easing
    );

    let tracks = match widget {
        WidgetKind::Upload => {
            AnimationPreset::upload_tracks(config.upload.layout(), driver_config.duration_ms)
                .with_context(|| {
                    format!("Upload run of {}ms is too short", driver_config.duration_ms)
                })?
        }
        WidgetKind::Spinner => Vec::new(),
    };
    AnimationDriver::with_tracks(driver_config, tracks).context("Failed to build driver")
}

/// Tick a widget at the configured frame rate until its run ends, returning
/// the number of frames printed
fn play<W>(
    widget: &mut W,
    playback: &PlaybackConfig,
    json: bool,
    render: fn(&W::Visuals) -> String,
) -> Result<usize>
where
    W: AnimatedWidget,
    W::Visuals: Serialize,
{
    let frame_ms = playback.frame_ms();
    let mut out = io::stdout().lock();
    let mut elapsed = 0.0;
    let mut frames = 0;

    while elapsed < playback.max_ms as f32 {
        if let Some(cancel_at) = playback.cancel_at_ms {
            if elapsed >= cancel_at as f32 && widget.is_animating() {
                widget.cancel()?;
                info!("Run cancelled at {:.1}ms", elapsed);
            }
        }

        let Some(visuals) = widget.tick(frame_ms) else {
            break;
        };
        elapsed += frame_ms;
        frames += 1;

        if json {
            serde_json::to_writer(&mut out, &visuals)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{:>9.1}ms  {}", elapsed, render(&visuals))?;
        }
    }

    Ok(frames)
}

fn upload_line(v: &UploadVisuals) -> String {
    format!(
        "{:>9}  sweep {:>5.1}  alpha {:.2}  middle ({:.1}, {:.1})  left ({:.1}, {:.1})  right ({:.1}, {:.1})  arrow {:.1}",
        v.label,
        v.arc_sweep_deg,
        v.arc_alpha,
        v.middle_cloud.0,
        v.middle_cloud.1,
        v.left_cloud.0,
        v.left_cloud.1,
        v.right_cloud.0,
        v.right_cloud.1,
        v.arrow_y,
    )
}

fn spinner_line(v: &SpinnerVisuals) -> String {
    let alphas: Vec<String> = v.ticks.iter().map(|t| format!("{:.2}", t.alpha)).collect();
    format!("p {:.3}  [{}]", v.progress, alphas.join(" "))
}

fn presets_command() -> Result<()> {
    let mut out = io::stdout().lock();
    for (name, easing) in PRESETS {
        writeln!(out, "{:<20} {}", name, easing.curve())?;
    }
    Ok(())
}

fn sample_command(track: &str, elapsed_ms: f32, config: Option<PathBuf>) -> Result<()> {
    let config = TempoConfig::load(config.as_deref())?;
    let driver = build_driver(WidgetKind::Upload, &config)?;
    let timeline = driver.timeline();

    let Some(track) = timeline.find(track).and_then(|id| timeline.get(id)) else {
        let known: Vec<&str> = timeline.iter().map(|(_, t)| t.name()).collect();
        anyhow::bail!("Unknown track `{track}`, expected one of: {}", known.join(", "));
    };
    debug!(
        "Track `{}`: delay {}ms, ends at {}ms",
        track.name(),
        track.delay_ms(),
        track.end_ms()
    );

    let name = track.name();
    match track.sample_in_run(elapsed_ms) {
        Value::Scalar(v) => println!("{name} @ {elapsed_ms}ms = {v:.3}"),
        Value::Offset { x, y } => println!("{name} @ {elapsed_ms}ms = ({x:.3}, {y:.3})"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_animation::presets::tracks;

    #[test]
    fn test_cli_parses_play() {
        let cli = Cli::try_parse_from(["tempo", "play", "upload", "--fps", "30", "--json"]).unwrap();
        match cli.command {
            Commands::Play { widget, fps, json, .. } => {
                assert!(matches!(widget, WidgetKind::Upload));
                assert_eq!(fps, Some(30));
                assert!(json);
            }
            _ => panic!("expected play"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_widget() {
        assert!(Cli::try_parse_from(["tempo", "play", "button"]).is_err());
    }

    #[test]
    fn test_upload_driver_honors_overrides() {
        let mut config = TempoConfig::default();
        config.driver.duration_ms = Some(2000);
        let mut driver = build_driver(WidgetKind::Upload, &config).unwrap();
        assert_eq!(driver.config().duration_ms, 2000);
        assert_eq!(driver.config().easing, Easing::EASE_IN_OUT_QUINT);
        assert_eq!(driver.timeline().len(), 4);
        assert_eq!(driver.timeline().end_ms(), 2000);

        // Every element is back at rest when the shortened run ends
        driver.start().unwrap();
        let last = driver.frames(16.0).last().unwrap();
        assert!(last.completed);
        assert_eq!(last.sample(tracks::MIDDLE_CLOUD), Some(&Value::offset(30.0, 30.0)));
        assert_eq!(last.sample(tracks::ARROW), Some(&Value::Scalar(60.0)));
        for (track, x) in [(tracks::LEFT_CLOUD, -22.5), (tracks::RIGHT_CLOUD, 82.5)] {
            let (cx, cy) = last.sample(track).and_then(Value::as_offset).unwrap();
            assert!((cx - x).abs() < 1e-4, "{track} x = {cx}");
            assert_eq!(cy, 150.0, "{track}");
        }
    }

    #[test]
    fn test_too_short_upload_override_is_reported() {
        let mut config = TempoConfig::default();
        config.driver.duration_ms = Some(20);
        let err = build_driver(WidgetKind::Upload, &config).err().unwrap();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_play_stops_at_cancel() {
        let mut config = TempoConfig::default();
        config.playback.fps = 10;
        config.playback.cancel_at_ms = Some(1000);
        let driver = build_driver(WidgetKind::Upload, &config).unwrap();
        let mut indicator = FileUploadIndicator::with_driver(driver);
        indicator.click().unwrap();

        let frames = play(&mut indicator, &config.playback, true, upload_line).unwrap();
        assert_eq!(frames, 10);
        assert!(!indicator.visuals().in_progress);
    }

    #[test]
    fn test_spinner_play_is_bounded_by_max_ms() {
        let mut config = TempoConfig::default();
        config.playback.fps = 10;
        config.playback.max_ms = 2000;
        let driver = build_driver(WidgetKind::Spinner, &config).unwrap();
        let mut spinner = IosSpinner::with_driver(driver).unwrap();

        let frames = play(&mut spinner, &config.playback, false, spinner_line).unwrap();
        assert_eq!(frames, 20);
        assert!(spinner.is_animating());
    }
}
