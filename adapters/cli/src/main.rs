#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Star Taxi session.

mod session;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use star_taxi_core::Tuning;
use star_taxi_rendering::{Color, Palette, Presentation, RenderingBackend, Scene};
use star_taxi_rendering_macroquad::MacroquadBackend;
use tracing::info;

use self::session::Session;

/// Fly a space taxi between planets, one fare at a time.
#[derive(Debug, Parser)]
#[command(name = "star-taxi", version)]
struct CliArgs {
    /// Level files to play in order; random levels follow once they run out.
    levels: Vec<PathBuf>,
    /// Seed for random level generation. Drawn from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding gameplay tuning.
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,
    /// Pause between levels, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 1_500)]
    transition_ms: u64,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Star Taxi command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let tuning = load_tuning(args.tuning.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, levels = args.levels.len(), "starting session");

    let mut session = Session::new(
        ChaCha8Rng::seed_from_u64(seed),
        tuning.clone(),
        args.levels,
        Duration::from_millis(args.transition_ms),
    );

    let palette = Palette::default();
    let mut scene = Scene::new(tuning.screen).context("invalid screen size in tuning")?;
    session.populate(&mut scene, &palette);
    let presentation = Presentation::new(
        "Star Taxi",
        Color::from_rgb_u8(0x0b, 0x0d, 0x1f),
        palette,
        scene,
    );

    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |elapsed, input, scene| {
            let flow = session.advance(elapsed, &input);
            session.populate(scene, &palette);
            if flow.is_break() {
                info!(levels = session.levels_started(), "session finished");
            }
            flow
        })
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    let tuning = toml::from_str(&contents)
        .with_context(|| format!("failed to parse tuning file {}", path.display()))?;
    info!(path = %path.display(), "loaded tuning overrides");
    Ok(tuning)
}
