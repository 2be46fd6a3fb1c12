use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One side of a cell. The discriminant is the index into [`Cell::walls`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Wall {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Wall {
    /// All sides in the order neighbors are enumerated: Top, Right, Bottom, Left
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Right, Wall::Bottom, Wall::Left];

    pub fn opposite(self) -> Wall {
        match self {
            Wall::Top => Wall::Bottom,
            Wall::Right => Wall::Left,
            Wall::Bottom => Wall::Top,
            Wall::Left => Wall::Right,
        }
    }
}

impl Display for Wall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Wall::Top => "top",
                Wall::Right => "right",
                Wall::Bottom => "bottom",
                Wall::Left => "left",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    /// `true` means the wall is present, indexed by [`Wall`]
    pub walls: [bool; 4],
    /// Set once generation has carved into this cell
    pub visited: bool,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            walls: [true; 4],
            visited: false,
        }
    }

    pub fn has_wall(&self, wall: Wall) -> bool {
        self.walls[wall as usize]
    }

    /// The sides of this cell whose wall has been removed
    pub fn passages(&self) -> impl Iterator<Item = Wall> + '_ {
        Wall::ALL.into_iter().filter(|w| !self.has_wall(*w))
    }
}

/// Largest number of rows or columns a grid can have
pub const MAX_SIDE: usize = 1024;

/// A rectangular grid of cells stored in row-major order (`index = col + row * cols`)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid where every cell has all four walls and nothing is visited.
    /// Both sides are capped at [`MAX_SIDE`].
    pub fn new(rows: usize, cols: usize) -> Self {
        let (rows, cols) = (rows.min(MAX_SIDE), cols.min(MAX_SIDE));
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(row, col));
            }
        }

        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Row-major index of the cell at `(row, col)`, or `None` outside the grid
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(col + row * self.cols)
        } else {
            None
        }
    }

    /// The cell on the other side of `wall`, if there is one inside the grid
    pub fn neighbor(&self, index: usize, wall: Wall) -> Option<usize> {
        let cell = self.cells.get(index)?;
        let (row, col) = (cell.row, cell.col);

        match wall {
            Wall::Top => self.index(row.checked_sub(1)?, col),
            Wall::Right => self.index(row, col + 1),
            Wall::Bottom => self.index(row + 1, col),
            Wall::Left => self.index(row, col.checked_sub(1)?),
        }
    }

    /// Neighbors that generation has not carved into yet, in Top, Right, Bottom, Left order
    pub fn unvisited_neighbors(&self, index: usize) -> impl Iterator<Item = (Wall, usize)> {
        let mut neighbors = Vec::with_capacity(4);

        for wall in Wall::ALL {
            if let Some(n) = self.neighbor(index, wall) {
                if !self.cells[n].visited {
                    neighbors.push((wall, n));
                }
            }
        }

        neighbors.into_iter()
    }

    /// Neighbors reachable through a removed wall, in Top, Right, Bottom, Left order
    pub fn accessible_neighbors(&self, index: usize) -> impl Iterator<Item = (Wall, usize)> {
        let mut neighbors = Vec::with_capacity(4);

        if let Some(cell) = self.cells.get(index) {
            for wall in cell.passages() {
                if let Some(n) = self.neighbor(index, wall) {
                    neighbors.push((wall, n));
                }
            }
        }

        neighbors.into_iter()
    }

    /// Number of adjacent pairs with the shared wall removed, each pair counted once
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                [Wall::Right, Wall::Bottom]
                    .into_iter()
                    .filter(|w| !cell.has_wall(*w) && self.neighbor(index, *w).is_some())
                    .count()
            })
            .sum()
    }

    /// Renders the grid as ASCII art with the cells in `path` marked
    pub fn display_path<'a>(&'a self, path: &'a [usize]) -> GridDisplay<'a> {
        GridDisplay { grid: self, path }
    }

    pub(crate) fn mark_visited(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.visited = true;
        }
    }

    /// Removes the wall between two adjacent cells on both sides.
    /// Returns `false` (and changes nothing) if `a` and `b` are not adjacent.
    pub(crate) fn carve(&mut self, a: usize, b: usize) -> bool {
        let Some(wall) = Wall::ALL
            .into_iter()
            .find(|w| self.neighbor(a, *w) == Some(b))
        else {
            return false;
        };

        self.cells[a].walls[wall as usize] = false;
        self.cells[b].walls[wall.opposite() as usize] = false;
        true
    }
}

pub struct GridDisplay<'a> {
    grid: &'a Grid,
    path: &'a [usize],
}

impl Display for GridDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grid = self.grid;
        if grid.is_empty() {
            return Ok(());
        }

        let mut on_path = vec![false; grid.len()];
        for &index in self.path {
            if let Some(slot) = on_path.get_mut(index) {
                *slot = true;
            }
        }

        for row in 0..grid.rows {
            for cell in &grid.cells[row * grid.cols..(row + 1) * grid.cols] {
                write!(f, "+{}", if cell.has_wall(Wall::Top) { "--" } else { "  " })?;
            }
            writeln!(f, "+")?;

            for col in 0..grid.cols {
                let index = col + row * grid.cols;
                let cell = &grid.cells[index];
                write!(
                    f,
                    "{}{}",
                    if cell.has_wall(Wall::Left) { "|" } else { " " },
                    if on_path[index] { "##" } else { "  " }
                )?;
            }
            let last = &grid.cells[(row + 1) * grid.cols - 1];
            writeln!(f, "{}", if last.has_wall(Wall::Right) { "|" } else { " " })?;
        }

        for cell in &grid.cells[(grid.rows - 1) * grid.cols..] {
            write!(f, "+{}", if cell.has_wall(Wall::Bottom) { "--" } else { "  " })?;
        }
        writeln!(f, "+")
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_path(&[]))
    }
}
