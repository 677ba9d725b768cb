mod script;


use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use planner::config::{ConfigError, Tuning};
use planner::doc::{LayoutError, LayoutSnapshot, Room, validate_footprint};
use planner::engine::EngineError;
use planner::placement::{PlacementError, place_item};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid tuning: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("no item named `{0}`")]
    UnknownName(String),
    #[error("item name `{0}` is already taken")]
    DuplicateName(String),
    #[error("pass --room or --layout")]
    MissingRoom,
}

#[derive(Parser, Debug)]
#[command(name = "roomplan", about = "Furniture placement and drag scenarios for a rectangular room")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the wall slot a new item would be placed in.
    Place {
        /// Room size as WIDTHxDEPTH, e.g. 600x500. Overrides the layout's room.
        #[arg(long, env = "ROOMPLAN_ROOM", value_parser = parse_room)]
        room: Option<Room>,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        depth: f64,
        /// Existing layout JSON to place against.
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Replay a JSON scenario through the engine.
    Run {
        #[arg(default_value = "-", help = "Script file path, or - for stdin")]
        script: PathBuf,
    },
}

fn main() -> Result<(), CliError> {
    // Logs go to stderr; stdout carries only JSON.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let tuning = Tuning::from_env()?;

    match cli.command {
        Command::Place { room, width, depth, layout } => run_place(room, width, depth, layout, &tuning),
        Command::Run { script } => run_script(&script, tuning),
    }
}

fn run_place(room: Option<Room>, width: f64, depth: f64, layout: Option<PathBuf>, tuning: &Tuning) -> Result<(), CliError> {
    validate_footprint(width, depth)?;
    let mut snapshot = match (&layout, room) {
        (Some(path), _) => LayoutSnapshot::from_json(&read_input(path)?)?,
        (None, Some(room)) => LayoutSnapshot::empty(room),
        (None, None) => return Err(CliError::MissingRoom),
    };
    if let Some(room) = room {
        snapshot.room = room;
    }

    let placement = place_item(width, depth, &snapshot, tuning)?;
    print_json(&serde_json::json!({
        "wall": placement.wall,
        "x": placement.position.x,
        "z": placement.position.z,
        "rotation": placement.rotation,
    }))
}

fn run_script(path: &Path, tuning: Tuning) -> Result<(), CliError> {
    let script = script::parse(&read_input(path)?)?;
    let report = script::run(script, tuning)?;
    print_json(&serde_json::to_value(&report)?)
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let read = |source| CliError::Read { path: path.to_path_buf(), source };
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw).map_err(read)?;
        Ok(raw)
    } else {
        fs::read_to_string(path).map_err(read)
    }
}

/// Parse `WIDTHxDEPTH` into a validated room.
fn parse_room(raw: &str) -> Result<Room, String> {
    let (w, d) = raw.split_once(['x', 'X']).ok_or_else(|| format!("expected WIDTHxDEPTH, got `{raw}`"))?;
    let width: f64 = w.trim().parse().map_err(|e| format!("invalid width `{w}`: {e}"))?;
    let depth: f64 = d.trim().parse().map_err(|e| format!("invalid depth `{d}`: {e}"))?;
    Room::new(width, depth).map_err(|e| e.to_string())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
