#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that loads a Skirmish map, replays scripted input and
//! prints the board with the selected unit's movement range.

mod board;
mod config;
mod script;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use skirmish_core::{Command, Event};
use skirmish_rendering::{
    compose_highlights, RenderingBackend, Scene, SceneTile, TileMetrics,
};
use skirmish_system_movement_range::MovementRange;
use skirmish_world::{self as world, query, Grid, MapFormat, World};
use tracing_subscriber::EnvFilter;

use board::{JsonReport, TextBoard};
use config::CliConfig;

/// Shows which tiles a unit can reach on a Skirmish map.
#[derive(Debug, Parser)]
#[command(name = "skirmish", version, long_about = None)]
struct Cli {
    /// Map file to load.
    map: PathBuf,

    /// TOML file with `[view]` and `[map]` settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keys to replay: w/a/s/d move the cursor, e selects, x clears.
    #[arg(long, default_value = "")]
    keys: String,

    /// Pixel position to click after the keys, as `X,Y`.
    #[arg(long, value_parser = script::parse_click)]
    click: Option<Vec2>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Cell delimiter used by the map file; overrides the config file.
    #[arg(long)]
    delimiter: Option<char>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Entry point for the Skirmish command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let stdout = io::stdout();
    run(cli, stdout.lock())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli, out: impl Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let metrics = config
        .view
        .metrics()
        .context("invalid [view] tile size")?;
    let delimiter = cli.delimiter.unwrap_or(config.map.delimiter);

    let grid = MapFormat::new(delimiter)
        .load(&cli.map)
        .with_context(|| format!("failed to load map {}", cli.map.display()))?;
    tracing::info!(
        map = %cli.map.display(),
        columns = grid.columns(),
        rows = grid.rows(),
        "map loaded"
    );

    let mut session = Session::new(grid);
    for command in script::parse_keys(&cli.keys).context("invalid --keys")? {
        session.submit(command);
    }
    if let Some(position) = cli.click {
        let _ = session.click(&metrics, position);
    }

    let scene = session.scene();
    let mut backend: Box<dyn RenderingBackend + '_> = match cli.format {
        OutputFormat::Text => Box::new(TextBoard::new(out)),
        OutputFormat::Json => Box::new(JsonReport::new(out, metrics)),
    };
    backend.present(&scene)
}

/// World plus the systems reacting to its events.
struct Session {
    world: World,
    movement_range: MovementRange,
}

impl Session {
    fn new(grid: Grid) -> Self {
        Self {
            world: World::new(grid),
            movement_range: MovementRange::default(),
        }
    }

    fn submit(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        for event in &events {
            log_event(event);
        }
        self.movement_range
            .handle(&events, query::grid(&self.world));
    }

    /// Hovers and selects the tile under `position`. Returns `false` when the
    /// position lies outside the board, in which case nothing is submitted.
    fn click(&mut self, metrics: &TileMetrics, position: Vec2) -> bool {
        let grid = query::grid(&self.world);
        let Some(cell) = metrics.cell_within(position, grid.columns(), grid.rows()) else {
            tracing::warn!(x = position.x, y = position.y, "click outside the board ignored");
            return false;
        };
        self.submit(Command::HoverCell { cell });
        self.submit(Command::SelectCell { cell });
        true
    }

    fn scene(&self) -> Scene {
        let grid = query::grid(&self.world);
        let tiles = grid
            .iter()
            .map(|(tile, cell)| SceneTile {
                cell,
                terrain: tile.terrain(),
                building: tile.building(),
                occupant: tile.occupant().map(|unit| unit.kind()),
            })
            .collect();
        let highlights = compose_highlights(
            query::selection(&self.world),
            Some(query::cursor(&self.world)),
            self.movement_range.highlighted().iter(),
        );

        Scene::new(grid.columns(), grid.rows(), tiles, highlights)
    }
}

fn log_event(event: &Event) {
    match event {
        Event::TileSelected { cell, occupied } => {
            tracing::info!(?cell, occupied, "tile selected");
        }
        Event::SelectionRejected { cell, reason } => {
            tracing::info!(?cell, ?reason, "selection rejected");
        }
        other => tracing::debug!(event = ?other, "world event"),
    }
}
