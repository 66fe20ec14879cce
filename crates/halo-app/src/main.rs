//! HALO demo runner
//!
//! Drives the radar against a seeded synthetic world and prints the final
//! frame as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use halo_app::demo_world::{DemoWorld, WorldParams};
use halo_app::game_loop::{run_batch, spawn_radar_loop};
use halo_app::pulse_task::PulseTask;
use halo_app::sink::TracingSink;
use halo_app::state::{AppState, LoopCommand, PulseSettings};
use halo_core::config::RadarConfig;
use halo_core::constants::DT;
use halo_core::error::Result;
use halo_core::state::{DiscLayout, RadarFrame};

/// Headless radar demo
#[derive(Parser, Debug)]
#[command(name = "halo")]
#[command(about = "Run the radar overlay against a synthetic world")]
struct Args {
    /// TOML file with radar settings (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for the synthetic world
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of 60 Hz frames to run
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Run the loop and pulse threads on the wall clock instead of a batch
    #[arg(long)]
    realtime: bool,

    /// Enemies in the world at start
    #[arg(long, default_value_t = 24)]
    enemies: usize,

    /// Loot items in the world at start
    #[arg(long, default_value_t = 200)]
    loot: usize,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    frames: u32,
    /// Only known in batch mode; the realtime world lives in the loop thread.
    living_enemies: Option<usize>,
    loot_in_world: Option<usize>,
    pulse_rotation_deg: Option<f32>,
    frame: Option<RadarFrame>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("halo=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "could not serialize summary");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!(error = %e, "radar run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunSummary> {
    let config = match &args.config {
        Some(path) => RadarConfig::load(path)?,
        None => RadarConfig::default(),
    };
    let params = WorldParams {
        seed: args.seed,
        enemies: args.enemies,
        loot: args.loot,
        ..Default::default()
    };
    info!(seed = args.seed, frames = args.frames, realtime = args.realtime, "starting radar demo");

    if args.realtime {
        run_realtime(args, params, config)
    } else {
        let mut world = DemoWorld::new(params, config);
        let mut sink = TracingSink::new(DiscLayout::default());
        let frame = run_batch(&mut world, &mut sink, args.frames)?;
        Ok(RunSummary {
            seed: args.seed,
            frames: args.frames,
            living_enemies: Some(world.living_enemies()),
            loot_in_world: Some(world.loot_len()),
            pulse_rotation_deg: None,
            frame: Some(frame),
        })
    }
}

fn run_realtime(args: &Args, params: WorldParams, config: RadarConfig) -> Result<RunSummary> {
    let state = AppState::new();
    let pulse = Arc::new(Mutex::new(PulseSettings::from_config(&config)));
    let world = DemoWorld::new(params, config);

    let pulse_task = PulseTask::spawn(Arc::clone(&pulse), Arc::clone(&state.pulse_rotation))?;
    let (tx, handle) = spawn_radar_loop(
        world,
        DiscLayout::default(),
        Arc::clone(&state.latest_frame),
        pulse,
    )?;
    if let Ok(mut command_tx) = state.command_tx.lock() {
        *command_tx = Some(tx);
    }
    if let Ok(mut running) = state.running.lock() {
        *running = true;
    }

    std::thread::sleep(Duration::from_secs_f32(args.frames as f32 * DT));

    state.send(LoopCommand::Shutdown);
    if handle.join().is_err() {
        error!("radar loop thread panicked");
    }
    let pulse_rotation_deg = state.pulse_rotation.lock().ok().and_then(|r| *r);
    pulse_task.stop();
    if let Ok(mut running) = state.running.lock() {
        *running = false;
    }

    Ok(RunSummary {
        seed: args.seed,
        frames: args.frames,
        living_enemies: None,
        loot_in_world: None,
        pulse_rotation_deg,
        frame: state.latest_frame(),
    })
}
