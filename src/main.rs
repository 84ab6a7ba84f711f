//! Delve - Entry Point
//!
//! Generates one dungeon and prints it to the terminal.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    queue,
    style::{Color, Print, PrintStyledContent, Stylize},
};

use delve::{DungeonBuilder, GenerationReport, GeneratorConfig, Grid, RandomSource, TileType};

#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Generate a room-and-corridor dungeon and print it")]
struct Args {
    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<i32>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<i32>,

    /// Number of rooms and corridors to place
    #[arg(short, long)]
    features: Option<u32>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// RON file with generator settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print plain glyphs without colour
    #[arg(long)]
    plain: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so the map on stdout stays clean
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(features) = args.features {
        config.features = features;
    }
    config.validate()?;

    let mut rng = match args.seed.or(config.seed) {
        Some(seed) => RandomSource::new(seed),
        None => RandomSource::from_entropy(),
    };

    let report = DungeonBuilder::new(config).build(&mut rng);

    let mut stdout = io::stdout().lock();
    if args.plain {
        write!(stdout, "{}", report.grid)?;
    } else {
        print_colored(&mut stdout, &report.grid)?;
    }
    print_legend(&mut stdout, &report.grid, args.plain)?;
    print_summary(&mut stdout, &report)?;
    stdout.flush()?;

    Ok(())
}

/// Print the grid with one foreground colour per tile type
fn print_colored(out: &mut impl Write, grid: &Grid) -> io::Result<()> {
    for row in grid.rows() {
        for tile in row {
            let (r, g, b) = tile.fg_color();
            queue!(out, PrintStyledContent(tile.glyph().with(Color::Rgb { r, g, b })))?;
        }
        queue!(out, Print('\n'))?;
    }
    Ok(())
}

/// One line per tile type present on the map
fn print_legend(out: &mut impl Write, grid: &Grid, plain: bool) -> io::Result<()> {
    let census = grid.census();
    for tile in TileType::ALL {
        let count = census[&tile];
        if count == 0 {
            continue;
        }
        if plain {
            queue!(out, Print(tile.glyph()))?;
        } else {
            let (r, g, b) = tile.fg_color();
            queue!(out, PrintStyledContent(tile.glyph().with(Color::Rgb { r, g, b })))?;
        }
        queue!(out, Print(format!(" {:<18} {count}\n", tile.description())))?;
    }
    Ok(())
}

fn print_summary(out: &mut impl Write, report: &GenerationReport) -> io::Result<()> {
    writeln!(
        out,
        "seed {} | {}x{} | {} features ({} bonus rooms) in {} attempts | {:?}",
        report.seed,
        report.grid.width(),
        report.grid.height(),
        report.features(),
        report.state.bonus_rooms,
        report.state.attempts,
        report.stop_reason,
    )?;
    writeln!(
        out,
        "{} corners fixed, {} stubs pruned",
        report.corners_fixed, report.stubs_pruned
    )
}
