//! Rhythm Lanes - Headless Session Runner
//!
//! Plays a note chart without a window: steps a fixed-rate frame loop,
//! replays a key log (or autoplays) and prints the end-of-session summary
//! as JSON.

use anyhow::Context;
use clap::Parser;
use rhythm_common::GameConfig;
use std::path::PathBuf;

mod sim;
use sim::{Script, Simulation};

// ── CLI Arguments ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Clone)]
#[command(name = "rhythm-sim", about = "Rhythm Lanes headless session runner")]
pub struct Args {
    /// Debug mode
    #[arg(long)]
    pub debug: bool,

    /// Session config (JSON or YAML); the demo song when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Key log to replay (JSON or YAML)
    #[arg(long, conflicts_with = "autoplay")]
    pub inputs: Option<PathBuf>,

    /// Press every note exactly on time
    #[arg(long)]
    pub autoplay: bool,

    /// Frame rate of the simulated render loop
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// Print every judged event along with the summary
    #[arg(long)]
    pub events: bool,
}

// ── Main ───────────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    log::info!(
        "Config: {} notes, {} columns, max {} per hit",
        config.notes.len(),
        config.columns,
        config.max_score_per_hit
    );

    let script = if args.autoplay {
        Script::autoplay(&config)
    } else if let Some(path) = &args.inputs {
        Script::load(path)?
    } else {
        Script::default()
    };
    log::info!("Replaying {} key presses at {} fps", script.presses.len(), args.fps);

    let sim = Simulation::new(&config, args.fps)?;
    let report = sim.run(&script);
    log::info!(
        "Finished after {} frames: score {}, max combo {}",
        report.frames,
        report.summary.total_score,
        report.summary.max_combo
    );

    let output = if args.events {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string_pretty(&report.summary)
    }
    .context("failed to serialize report")?;
    println!("{output}");

    Ok(())
}
