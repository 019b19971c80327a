#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(
    dead_code,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions
)]
mod config;
mod config_io;
mod display;
mod math;
mod placement;
mod state;

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    config::{load_known_yaml, ConfigType},
    display::{
        rotation::DisplayRotation, simulated::SceneConfig, simulated::SimulatedDisplay, ArDisplay,
    },
    state::{AppSession, AppState},
};

/// Tap-to-place on sensed surfaces, driven by a simulated Tango display
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of frames to run before exiting
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Screen tap in normalized coordinates, one per frame
    #[arg(long, value_name = "X,Y", value_parser = parse_tap)]
    tap: Vec<(f32, f32)>,

    /// Initial screen rotation in degrees
    #[arg(long, default_value_t = 0, value_name = "DEG")]
    screen_rotation: i32,

    /// Override the camera sensor rotation in degrees
    #[arg(long, value_name = "DEG")]
    sensor_rotation: Option<i32>,

    /// Rotate the screen clockwise every N frames
    #[arg(long, value_name = "N")]
    rotate_every: Option<u64>,

    /// Seed for model and scale selection
    #[arg(long)]
    seed: Option<u64>,

    /// Path to write logs to
    #[arg(short, long, value_name = "FILE_PATH")]
    log_to: Option<String>,
}

fn parse_tap(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad X: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad Y: {e}"))?;
    if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
        return Err(format!("tap ({x}, {y}) is outside of [0, 1]"));
    }
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    let mut args = Args::parse();
    logging_init(&mut args);

    log::info!(
        "Welcome to {} version {}!",
        env!("CARGO_PKG_NAME"),
        env!("PLACER_BUILD"),
    );

    let running = Arc::new(AtomicBool::new(true));
    if let Err(e) = ctrlc::set_handler({
        let running = running.clone();
        move || {
            running.store(false, Ordering::Relaxed);
        }
    }) {
        log::warn!("Could not install Ctrl-C handler: {e}");
    }

    run(&running, args)
}

fn run(running: &AtomicBool, args: Args) -> anyhow::Result<()> {
    let mut session = AppSession::load()?;
    if args.seed.is_some() {
        session.config.seed = args.seed;
    }

    let scene: SceneConfig = load_known_yaml(ConfigType::Scene);
    let mut display = SimulatedDisplay::from_scene(scene)?;
    display.set_screen_rotation(DisplayRotation::from_degrees(args.screen_rotation));
    if let Some(deg) = args.sensor_rotation {
        display.set_sensor_rotation(DisplayRotation::from_degrees(deg));
    }

    let frame_time = Duration::from_secs_f32(1.0 / session.config.target_fps as f32);
    let window = (session.config.window_width, session.config.window_height);
    let mut app = AppState::new(session, display);
    let (width, height) = viewport(window, app.display.screen_rotation());
    app.resize(width, height);
    let mut taps: VecDeque<_> = args.tap.into();
    let mut misses = 0usize;

    let mut frame = 0u64;
    while frame < args.frames {
        if !running.load(Ordering::Relaxed) {
            log::warn!("Received shutdown signal.");
            break;
        }
        let start = Instant::now();

        if let Some((x, y)) = taps.pop_front() {
            if app.on_tap(x, y)?.is_none() {
                misses += 1;
            }
        }

        if let Some(every) = args.rotate_every.filter(|n| *n > 0) {
            if frame > 0 && frame % every == 0 {
                app.display.rotate_screen();
                let (width, height) = viewport(window, app.display.screen_rotation());
                app.resize(width, height);
            }
        }

        if app.frame() {
            log::debug!(
                "Frame {frame}: video orientation index {}",
                app.video.orientation().get()
            );
        }

        frame += 1;
        if let Some(rest) = frame_time.checked_sub(start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    log::info!(
        "Ran {frame} frames: placed {} objects, {misses} taps missed, {} video uploads",
        app.objects.len(),
        app.video.uploads
    );
    log::info!(
        "Final device position {:.3}",
        app.display.pose().translation
    );
    for obj in &app.objects {
        log::info!(
            "  #{} {} at {:.3} scale {:.2}",
            obj.id.0,
            obj.model,
            obj.position,
            obj.scale.x
        );
        log::debug!("  #{} transform {:?}", obj.id.0, obj.transform());
    }

    Ok(())
}

/// Window size as seen with the screen turned by `screen_degrees`.
fn viewport((width, height): (u32, u32), screen_degrees: i32) -> (u32, u32) {
    match DisplayRotation::from_degrees(screen_degrees) {
        DisplayRotation::Deg90 | DisplayRotation::Deg270 => (height, width),
        DisplayRotation::Deg0 | DisplayRotation::Deg180 => (width, height),
    }
}

fn logging_init(args: &mut Args) {
    let log_file_path = args
        .log_to
        .take()
        .or_else(|| std::env::var("TANGO_PLACER_LOGFILE").ok())
        .unwrap_or_else(|| String::from("/tmp/tango-placer.log"));

    let file_writer = match std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_file_path)
    {
        Ok(file) => {
            println!("Logging to {}", &log_file_path);
            Some(file)
        }
        Err(e) => {
            println!("Failed to open log file (path: {e:?}): {log_file_path}");
            None
        }
    };

    let registry = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(std::io::stderr),
        )
        .with(
            /* read RUST_LOG env var */
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        );

    if let Some(writer) = file_writer {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .init();
    } else {
        registry.init();
    }

    log_panics::init();
}
