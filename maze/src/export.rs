use std::path::Path;

use anyhow::Context;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::generate::Maze;
use crate::grid::{Cell, Grid, Wall};

const WALL: Rgb<u8> = Rgb([17, 17, 17]);
const FLOOR: Rgb<u8> = Rgb([15, 23, 42]);
const SOLUTION: Rgb<u8> = Rgb([16, 185, 129]);

#[derive(Copy, Clone, PartialEq, Eq)]
enum Block {
    Wall,
    Floor,
    Solution,
}

/// Draws the grid into an image where every cell and every wall is a `scale` x `scale`
/// block, so a grid of `r` x `c` cells becomes `(2c + 1) * scale` pixels wide and
/// `(2r + 1) * scale` pixels high. Cells in `path` are highlighted. Fails if the image
/// would not fit into `u32` pixel dimensions.
pub fn render_image(grid: &Grid, path: &[usize], scale: u32) -> Result<RgbImage, anyhow::Error> {
    let scale = scale.max(1);
    let (width, height) = (grid.cols() * 2 + 1, grid.rows() * 2 + 1);
    let pixels = |blocks: usize| {
        u32::try_from(blocks)
            .ok()
            .and_then(|b| b.checked_mul(scale))
            .with_context(|| format!("{} blocks at scale {} is too large", blocks, scale))
    };
    let (img_width, img_height) = (pixels(width)?, pixels(height)?);
    let mut blocks = vec![vec![Block::Wall; width]; height];

    // cell centers sit on odd coordinates, the walls between them on even ones
    for cell in grid.cells() {
        let (r, c) = (cell.row * 2 + 1, cell.col * 2 + 1);
        blocks[r][c] = Block::Floor;

        for wall in cell.passages() {
            match wall {
                Wall::Top => blocks[r - 1][c] = Block::Floor,
                Wall::Right => blocks[r][c + 1] = Block::Floor,
                Wall::Bottom => blocks[r + 1][c] = Block::Floor,
                Wall::Left => blocks[r][c - 1] = Block::Floor,
            }
        }
    }

    let on_path: Vec<&Cell> = path.iter().filter_map(|&i| grid.get(i)).collect();
    for cell in &on_path {
        blocks[cell.row * 2 + 1][cell.col * 2 + 1] = Block::Solution;
    }
    for pair in on_path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        // the block between two adjacent cells
        let (r, c) = (a.row + b.row + 1, a.col + b.col + 1);
        if blocks[r][c] == Block::Floor {
            blocks[r][c] = Block::Solution;
        }
    }

    Ok(RgbImage::from_fn(img_width, img_height, |x, y| {
        match blocks[(y / scale) as usize][(x / scale) as usize] {
            Block::Wall => WALL,
            Block::Floor => FLOOR,
            Block::Solution => SOLUTION,
        }
    }))
}

/// Renders the grid and writes it to `file`, the format is picked from the extension
pub fn save_image(
    grid: &Grid,
    path: &[usize],
    scale: u32,
    file: impl AsRef<Path>,
) -> Result<(), anyhow::Error> {
    let file = file.as_ref();
    render_image(grid, path, scale)
        .context("failed to render maze image")?
        .save(file)
        .with_context(|| format!("failed to write maze image to {}", file.display()))
}

/// Everything a consumer needs to redraw a maze, in a serde friendly shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub finished: bool,
    pub current: Option<usize>,
    pub stack: Vec<usize>,
    pub cells: Vec<Cell>,
    pub solution: Vec<usize>,
}

impl<R> From<&Maze<R>> for MazeSnapshot {
    fn from(maze: &Maze<R>) -> Self {
        Self {
            rows: maze.rows(),
            cols: maze.cols(),
            finished: maze.is_finished(),
            current: maze.current_index(),
            stack: maze.stack().to_vec(),
            cells: maze.cells().to_vec(),
            solution: if maze.is_finished() {
                maze.solution_path()
            } else {
                Vec::new()
            },
        }
    }
}
