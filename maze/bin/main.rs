use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use maze::{save_image, Maze, MazeSnapshot};
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser)]
#[command(name = "maze")]
#[command(version, about = "Generate a perfect maze and print its solution")]
struct Cli {
    /// Width of the area to fill with cells
    #[arg(long, default_value = "500")]
    width: f32,

    /// Height of the area to fill with cells
    #[arg(long, default_value = "500")]
    height: f32,

    /// Side length of a single cell
    #[arg(long, default_value = "25")]
    pitch: f32,

    /// Number of rows, overrides the size derived from height and pitch
    #[arg(long, requires = "cols")]
    rows: Option<usize>,

    /// Number of columns, overrides the size derived from width and pitch
    #[arg(long, requires = "rows")]
    cols: Option<usize>,

    /// Seed for a reproducible maze
    #[arg(long)]
    seed: Option<u64>,

    /// Do not mark the solution
    #[arg(long)]
    no_solve: bool,

    /// Write the maze as an image, e.g. maze.png
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per wall or cell block in the image
    #[arg(long, default_value = "8")]
    scale: u32,

    /// Print a JSON snapshot instead of ASCII art
    #[arg(long)]
    json: bool,
}

/// Snapshot of a generated maze carrying `solution` instead of the computed one,
/// so that `--no-solve` leaves it empty
fn snapshot_with_solution<R>(maze: &Maze<R>, solution: Vec<usize>) -> MazeSnapshot {
    MazeSnapshot {
        solution,
        ..MazeSnapshot::from(maze)
    }
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let cli = Cli::parse();

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut maze = match (cli.rows, cli.cols) {
        (Some(rows), Some(cols)) => Maze::with_dimensions(rows, cols, rng),
        _ => Maze::with_rng(cli.width, cli.height, cli.pitch, rng),
    };

    let steps = maze.finish();
    info!("generated {}x{} maze in {} steps", maze.rows(), maze.cols(), steps);

    let path = if cli.no_solve {
        Vec::new()
    } else {
        maze.solution_path()
    };

    if let Some(file) = &cli.png {
        save_image(maze.grid(), &path, cli.scale, file)?;
        info!("wrote {}", file.display());
    }

    if cli.json {
        let snapshot = snapshot_with_solution(&maze, path);
        let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize maze")?;
        println!("{}", json);
    } else {
        print!("{}", maze.grid().display_path(&path));
        println!(
            "{} x {} cells, {} steps, solution length {}",
            maze.cols(),
            maze.rows(),
            steps,
            path.len()
        );
    }

    Ok(())
}
