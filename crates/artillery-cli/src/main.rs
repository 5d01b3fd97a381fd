//! Headless spotter console: replays a JSON command script against one
//! session and prints the firing solutions after every step.
//!
//! Usage:
//!   cargo run -p artillery-cli -- <script.json>
//!   cargo run -p artillery-cli -- --list
//!   RUST_LOG=debug cargo run -p artillery-cli -- --json <script.json>
//!
//! Without a script path, commands are read from stdin.

mod render;
mod script;

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use artillery_models::ArtilleryCatalog;
use artillery_solver::{SessionConfig, SessionState};
use clap::Parser;

#[derive(Parser)]
#[command(name = "artillery-cli")]
#[command(about = "Replay spotter commands and print per-team firing solutions")]
struct Args {
    /// Path to a JSON array of commands (stdin if omitted)
    script: Option<PathBuf>,

    /// Session config (JSON); ARTILLERY_* environment variables override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Custom artillery table (JSON array of named profiles)
    #[arg(long)]
    artillery_table: Option<PathBuf>,

    /// Emit one JSON snapshot per line instead of text blocks
    #[arg(long)]
    json: bool,

    /// List artillery types and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let catalog = match &args.artillery_table {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read artillery table {}", path.display()))?;
            ArtilleryCatalog::from_json_str(&text)
                .with_context(|| format!("invalid artillery table {}", path.display()))?
        }
        None => ArtilleryCatalog::builtin(),
    };

    if args.list {
        for (name, p) in catalog.iter() {
            println!(
                "{name:<18} range {:>5.1}-{:<5.1} m  spread {:>5.2}-{:<5.2} m",
                p.range_min, p.range_max, p.spread_min, p.spread_max
            );
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    }
    .with_env_overrides();

    let text = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };
    let commands = script::parse_script(&text).context("malformed command script")?;
    tracing::info!(steps = commands.len(), "replaying script");

    let mut session = SessionState::new(config, catalog).context("failed to start session")?;
    for (i, cmd) in commands.iter().enumerate() {
        let step = i + 1;
        cmd.apply(&mut session)
            .with_context(|| format!("step {step} ({cmd}) failed"))?;
        if args.json {
            println!("{}", serde_json::to_string(session.snapshot())?);
        } else {
            print!("{}", render::render_text(step, &cmd.to_string(), session.snapshot()));
        }
    }
    Ok(())
}
