//! Step-by-step generation of perfect mazes and their solution.
//!
//! A [`Maze`] carves a rectangular [`Grid`] with a randomized depth-first backtracker,
//! one transition per [`Maze::step`], so a front end can animate the process. Once
//! generation has finished, [`Maze::solution_path`] runs a breadth-first search from the
//! top left to the bottom right cell.

pub mod export;
pub mod generate;
pub mod grid;
pub mod solve;

pub use export::{render_image, save_image, MazeSnapshot};
pub use generate::{dimensions, GenerationState, Maze, Step};
pub use grid::{Cell, Grid, GridDisplay, Wall, MAX_SIDE};
pub use solve::{solve, Solver, SolverState};
