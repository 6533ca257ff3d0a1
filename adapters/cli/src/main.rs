#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Lidar Arena simulations headlessly.

mod config;
mod simulation;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lidar_arena_core::Rect;
use lidar_arena_world::{codec, query, World};
use tracing::info;

use crate::{
    config::{ControllerKind, RunOverrides, SimulationConfig},
    simulation::Simulation,
};

#[derive(Parser, Debug)]
#[command(
    name = "lidar-arena",
    version,
    about = "Drive a lidar-equipped agent through a walled arena"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Run a controller for a number of ticks and print a summary.
    Run {
        /// World file holding a JSON array of wall records.
        #[arg(long)]
        world: Option<PathBuf>,
        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of ticks to simulate.
        #[arg(long)]
        ticks: Option<u64>,
        /// Controller driving the agent.
        #[arg(long, value_enum)]
        controller: Option<ControllerKind>,
        /// Seed for the wandering controller.
        #[arg(long)]
        seed: Option<u64>,
        /// Number of lidar beams.
        #[arg(long)]
        beams: Option<usize>,
    },
    /// Validate a world file and list its walls.
    Inspect {
        /// World file holding a JSON array of wall records.
        #[arg(long)]
        world: PathBuf,
    },
}

/// Entry point for the Lidar Arena command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Run {
            world,
            config,
            ticks,
            controller,
            seed,
            beams,
        } => run_command(
            world.as_deref(),
            config.as_deref(),
            RunOverrides {
                ticks,
                controller,
                seed,
                beams,
            },
        ),
        CliCommand::Inspect { world } => inspect_command(&world),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_command(
    world: Option<&Path>,
    config: Option<&Path>,
    overrides: RunOverrides,
) -> Result<()> {
    let config = match config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    }
    .with_overrides(overrides);
    let rects = match world {
        Some(path) => load_rects(path)?,
        None => Vec::new(),
    };

    let mut simulation = Simulation::new(&config, rects);
    let summary = simulation.run(config.ticks);
    let pose = simulation.agent().pose();

    info!(
        ticks = summary.ticks,
        motions = summary.motions,
        bumps = summary.bumps,
        distance = summary.distance,
        "run complete"
    );
    println!("ticks: {}", summary.ticks);
    println!("motions: {}", summary.motions);
    println!("bumps: {}", summary.bumps);
    println!("distance: {:.2}", summary.distance);
    match summary.closest_reading {
        Some(reading) => println!("closest reading: {reading:.2}"),
        None => println!("closest reading: none"),
    }
    println!(
        "final pose: x={:.2} y={:.2} direction={:.1}",
        pose.x, pose.y, pose.direction
    );
    Ok(())
}

fn inspect_command(path: &Path) -> Result<()> {
    let world = World::with_rects(load_rects(path)?);
    println!("{} walls", query::wall_count(&world));
    for (id, wall) in query::wall_ids(&world).iter().zip(query::walls(&world)) {
        let rect = wall.rect();
        println!(
            "#{} x={} y={} width={} height={}",
            id.get(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );
    }
    Ok(())
}

fn load_rects(path: &Path) -> Result<Vec<Rect>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read world file {}", path.display()))?;
    codec::decode_world(&contents)
        .with_context(|| format!("failed to decode world file {}", path.display()))
}
