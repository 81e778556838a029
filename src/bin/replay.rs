use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use subpixel_skimmer::{
    Activation, EngineSettings, EngineStats, FrameClock, Geometry, HeadlessSurface, Skimmer,
};

#[derive(Parser, Debug)]
#[command(
    name = "skimmer-replay",
    version,
    about = "Replay seeded skimmer sweeps headlessly and print per-seed statistics"
)]
struct Cli {
    /// Number of seeds to replay.
    #[arg(long, default_value_t = 8)]
    seeds: u64,

    /// First seed; seeds are consecutive from here.
    #[arg(long, default_value_t = 0)]
    first_seed: u64,

    /// Container width in CSS pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    /// Container height in CSS pixels.
    #[arg(long, default_value_t = 640.0)]
    height: f32,

    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Simulated time per seed.
    #[arg(long, default_value_t = 120.0)]
    seconds: f64,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Settings JSON; its seed is ignored.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Serialize)]
struct ReplaySummary {
    seed: u64,
    simulated_ms: u128,
    stats: EngineStats,
    squares_drawn: u64,
    specks_on_surface: usize,
}

fn replay(seed: u64, base: EngineSettings, geometry: Geometry, clock: FrameClock, until: Duration) -> ReplaySummary {
    let settings = EngineSettings {
        seed: Some(seed),
        ..base
    };
    let mut engine = Skimmer::new(settings);
    let mut surface = HeadlessSurface::new(geometry);

    engine.mount(Duration::ZERO);
    let end = clock.run(&mut engine, &mut surface, Duration::ZERO, until);
    engine.unmount();

    ReplaySummary {
        seed,
        simulated_ms: end.as_millis(),
        stats: engine.stats(),
        squares_drawn: surface.squares_drawn,
        specks_on_surface: surface.squares.len(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let base = match &cli.settings {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        // A host page that mounts the skimmer has opted in.
        None => EngineSettings {
            activation: Activation::opted_in(),
            ..EngineSettings::default()
        },
    };
    if !base.activation.is_eligible() {
        tracing::warn!("settings disable the effect; every replay will stay idle");
    }

    let geometry = Geometry::new(cli.width, cli.height, cli.pixel_ratio);
    let clock = FrameClock::from_fps(cli.fps);
    let until = Duration::try_from_secs_f64(cli.seconds)
        .with_context(|| format!("invalid --seconds {}", cli.seconds))?;

    let summaries: Vec<ReplaySummary> = (cli.first_seed..cli.first_seed.saturating_add(cli.seeds))
        .into_par_iter()
        .map(|seed| replay(seed, base, geometry, clock, until))
        .collect();

    for summary in &summaries {
        let line = serde_json::to_string(summary).context("serialize summary")?;
        println!("{line}");
    }
    Ok(())
}
