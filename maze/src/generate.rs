//! Incremental maze generation with a randomized depth-first backtracker.
//!
//! The engine starts on a random cell and advances one transition per call to
//! [`Maze::step`]: it either carves into a random unvisited neighbor, backtracks to the
//! previous cell on the stack, or finishes once the stack is exhausted. Stepping is left
//! to the caller so that a front end can animate the process at any rate.

use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::grid::{Cell, Grid, MAX_SIDE};
use crate::solve::solve;

/// Where the generator currently is
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GenerationState {
    Active { current: usize },
    Finished,
}

impl GenerationState {
    pub fn is_finished(&self) -> bool {
        matches!(self, GenerationState::Finished)
    }
}

/// The transition performed by a single call to [`Maze::step`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Step {
    /// The wall between `from` and the newly visited `to` was removed
    Carved { from: usize, to: usize },
    /// `from` was a dead end, `to` was popped from the stack
    Backtracked { from: usize, to: usize },
    /// Generation completed during this call
    Finished,
    /// Generation had already completed, nothing changed
    Idle,
}

/// Computes `(rows, cols)` for a `width` x `height` area split into square cells of
/// side `pitch`. Every dimension is at least 1 and at most [`MAX_SIDE`], whatever the
/// input.
pub fn dimensions(width: f32, height: f32, pitch: f32) -> (usize, usize) {
    fn cells_along(length: f32, pitch: f32) -> usize {
        let n = (length / pitch).floor();
        if n.is_nan() || n < 1.0 {
            1
        } else {
            // also catches +inf
            n.min(MAX_SIDE as f32) as usize
        }
    }

    (cells_along(height, pitch), cells_along(width, pitch))
}

/// A maze that is generated step by step
#[derive(Debug)]
pub struct Maze<R = StdRng> {
    grid: Grid,
    stack: Vec<usize>,
    state: GenerationState,
    visited: usize,
    steps: usize,
    rng: R,
}

impl Maze<StdRng> {
    /// Creates a maze covering `width` x `height` with cells of side `pitch`,
    /// seeded from system entropy
    pub fn new(width: f32, height: f32, pitch: f32) -> Self {
        Self::with_rng(width, height, pitch, StdRng::from_entropy())
    }

    /// Creates a maze with a reproducible layout
    pub fn seeded(rows: usize, cols: usize, seed: u64) -> Self {
        Self::with_dimensions(rows, cols, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Maze<R> {
    pub fn with_rng(width: f32, height: f32, pitch: f32, rng: R) -> Self {
        let (rows, cols) = dimensions(width, height, pitch);
        Self::with_dimensions(rows, cols, rng)
    }

    /// Creates a maze with explicit dimensions, each capped at [`MAX_SIDE`]. A grid
    /// without cells is finished immediately.
    pub fn with_dimensions(rows: usize, cols: usize, mut rng: R) -> Self {
        let mut grid = Grid::new(rows, cols);

        let (state, visited) = if grid.is_empty() {
            (GenerationState::Finished, 0)
        } else {
            let start = rng.gen_range(0..grid.len());
            grid.mark_visited(start);
            (GenerationState::Active { current: start }, 1)
        };

        debug!(
            "created {}x{} maze, state {:?}",
            grid.rows(),
            grid.cols(),
            state
        );

        Self {
            grid,
            stack: Vec::new(),
            state,
            visited,
            steps: 0,
            rng,
        }
    }

    /// Advances generation by exactly one transition
    pub fn step(&mut self) -> Step {
        let GenerationState::Active { current } = self.state else {
            return Step::Idle;
        };
        self.steps += 1;

        let candidates: Vec<usize> = self
            .grid
            .unvisited_neighbors(current)
            .map(|(_, n)| n)
            .collect();

        if let Some(&next) = candidates.choose(&mut self.rng) {
            self.grid.mark_visited(next);
            self.visited += 1;
            self.stack.push(current);
            self.grid.carve(current, next);
            self.state = GenerationState::Active { current: next };

            trace!("carved {} -> {}", current, next);
            Step::Carved {
                from: current,
                to: next,
            }
        } else if let Some(previous) = self.stack.pop() {
            self.state = GenerationState::Active { current: previous };

            trace!("backtracked {} -> {}", current, previous);
            Step::Backtracked {
                from: current,
                to: previous,
            }
        } else {
            self.state = GenerationState::Finished;
            self.stack.clear();

            debug!(
                "finished {}x{} maze after {} steps",
                self.grid.rows(),
                self.grid.cols(),
                self.steps
            );
            Step::Finished
        }
    }

    /// Steps until generation is complete and returns the number of steps taken
    pub fn finish(&mut self) -> usize {
        let mut count = 0;
        while !self.state.is_finished() {
            self.step();
            count += 1;
        }
        count
    }
}

impl<R> Maze<R> {
    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            GenerationState::Active { current } => Some(current),
            GenerationState::Finished => None,
        }
    }

    pub fn current(&self) -> Option<&Cell> {
        self.current_index().and_then(|i| self.grid.get(i))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cells(&self) -> &[Cell] {
        self.grid.cells()
    }

    /// Indices of the open backtracking path, oldest first
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    pub fn stack_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.stack.iter().filter_map(|&i| self.grid.get(i))
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn visited_count(&self) -> usize {
        self.visited
    }

    /// Number of transitions performed so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Path from the top left to the bottom right cell as row-major indices.
    /// Recomputed on every call, empty if the two are not connected (yet).
    pub fn solution_path(&self) -> Vec<usize> {
        solve(&self.grid)
    }

    pub fn solution_cells(&self) -> Vec<Cell> {
        self.solution_path()
            .into_iter()
            .filter_map(|i| self.grid.get(i).copied())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::Wall;

    fn assert_walls_symmetric(grid: &Grid) {
        for (index, cell) in grid.cells().iter().enumerate() {
            for wall in Wall::ALL {
                if let Some(n) = grid.neighbor(index, wall) {
                    assert_eq!(
                        cell.has_wall(wall),
                        grid.cells()[n].has_wall(wall.opposite()),
                        "asymmetric {} wall between {} and {}",
                        wall,
                        index,
                        n
                    );
                }
            }
        }
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(dimensions(500.0, 300.0, 25.0), (12, 20));
        assert_eq!(dimensions(99.0, 99.0, 25.0), (3, 3));
        assert_eq!(dimensions(0.0, 100.0, 25.0), (4, 1));
        assert_eq!(dimensions(10.0, 10.0, 25.0), (1, 1));
        assert_eq!(dimensions(-5.0, 100.0, 10.0), (10, 1));
        assert_eq!(dimensions(100.0, 100.0, 0.0), (1, 1));
        assert_eq!(dimensions(100.0, 100.0, -4.0), (1, 1));
        assert_eq!(dimensions(f32::NAN, 100.0, 10.0), (10, 1));
        assert_eq!(dimensions(f32::INFINITY, 100.0, 10.0), (10, MAX_SIDE));
        assert_eq!(dimensions(1e30, 1e30, 1.0), (MAX_SIDE, MAX_SIDE));
    }

    #[test]
    fn test_huge_areas_are_capped() {
        let maze = Maze::with_rng(1e30, 1e30, 1.0, StdRng::seed_from_u64(0));
        assert_eq!((maze.rows(), maze.cols()), (MAX_SIDE, MAX_SIDE));
        assert_eq!(maze.cells().len(), MAX_SIDE * MAX_SIDE);
        assert!(!maze.is_finished());

        let mut maze = Maze::with_dimensions(usize::MAX, 2, StdRng::seed_from_u64(0));
        assert_eq!((maze.rows(), maze.cols()), (MAX_SIDE, 2));
        assert!(maze.finish() <= 2 * MAX_SIDE * 2);
        assert_eq!(maze.solution_path().last(), Some(&(MAX_SIDE * 2 - 1)));
    }

    #[test]
    fn test_construction() {
        let maze = Maze::with_rng(100.0, 60.0, 20.0, StdRng::seed_from_u64(1));

        assert_eq!(maze.rows(), 3);
        assert_eq!(maze.cols(), 5);
        assert_eq!(maze.cells().len(), 15);
        assert!(!maze.is_finished());
        assert!(maze.stack().is_empty());
        assert_eq!(maze.visited_count(), 1);

        let current = maze.current().copied().unwrap();
        assert!(current.visited);
        assert_eq!(current.walls, [true; 4]);
        assert_eq!(
            maze.cells().iter().filter(|c| c.visited).count(),
            1,
            "only the start cell is visited"
        );
    }

    #[test]
    fn test_walls_stay_symmetric_while_stepping() {
        let mut maze = Maze::seeded(6, 9, 7);

        while maze.step() != Step::Finished {
            assert_walls_symmetric(maze.grid());
        }
        assert_walls_symmetric(maze.grid());
    }

    #[test]
    fn test_visitation_is_monotonic() {
        let mut maze = Maze::seeded(5, 5, 99);

        loop {
            let before = maze.visited_count();
            let step = maze.step();
            let after = maze.cells().iter().filter(|c| c.visited).count();
            assert_eq!(after, maze.visited_count());

            match step {
                Step::Carved { from, to } => {
                    assert_eq!(after, before + 1);
                    assert_eq!(maze.current_index(), Some(to));
                    assert_eq!(maze.stack().last(), Some(&from));
                }
                Step::Backtracked { to, .. } => {
                    assert_eq!(after, before);
                    assert_eq!(maze.current_index(), Some(to));
                }
                Step::Finished => {
                    assert_eq!(after, 25);
                    break;
                }
                Step::Idle => panic!("stepped while active but got Idle"),
            }
        }
    }

    #[test]
    fn test_terminates_within_bound() {
        for seed in 0..20 {
            let mut maze = Maze::seeded(7, 4, seed);
            let steps = maze.finish();

            assert!(steps <= 2 * 7 * 4, "took {} steps", steps);
            assert_eq!(maze.steps(), steps);
            assert!(maze.is_finished());
            assert!(maze.current().is_none());
            assert!(maze.stack().is_empty());
        }
    }

    #[test]
    fn test_finished_maze_is_spanning_tree() {
        let mut maze = Maze::seeded(8, 11, 3);
        maze.finish();

        let grid = maze.grid();
        assert_eq!(grid.passage_count(), 8 * 11 - 1);
        assert!(grid.cells().iter().all(|c| c.visited));

        // flood fill over passages reaches every cell
        let mut seen = vec![false; grid.len()];
        let mut todo = vec![0];
        seen[0] = true;
        while let Some(i) = todo.pop() {
            for (_, n) in grid.accessible_neighbors(i) {
                if !seen[n] {
                    seen[n] = true;
                    todo.push(n);
                }
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_step_after_finish_is_noop() {
        let mut maze = Maze::seeded(3, 3, 5);
        maze.finish();

        let walls: Vec<[bool; 4]> = maze.cells().iter().map(|c| c.walls).collect();
        let steps = maze.steps();

        assert_eq!(maze.step(), Step::Idle);
        assert_eq!(maze.step(), Step::Idle);
        assert_eq!(maze.steps(), steps);
        assert_eq!(maze.state(), GenerationState::Finished);
        assert_eq!(
            maze.cells().iter().map(|c| c.walls).collect::<Vec<_>>(),
            walls
        );
    }

    #[test]
    fn test_single_cell() {
        let mut maze = Maze::with_rng(0.0, 0.0, 25.0, StdRng::seed_from_u64(0));

        assert_eq!((maze.rows(), maze.cols()), (1, 1));
        assert_eq!(maze.current_index(), Some(0));
        assert_eq!(maze.step(), Step::Finished);
        assert!(maze.is_finished());
        assert_eq!(maze.solution_path(), vec![0]);
    }

    #[test]
    fn test_zero_cells() {
        let mut maze = Maze::seeded(0, 4, 1);

        assert!(maze.is_finished());
        assert!(maze.current().is_none());
        assert_eq!(maze.step(), Step::Idle);
        assert_eq!(maze.finish(), 0);
        assert!(maze.solution_path().is_empty());
    }

    #[test]
    fn test_two_by_two() {
        for seed in 0..32 {
            let mut maze = Maze::seeded(2, 2, seed);
            assert!(maze.finish() <= 8);
            assert_eq!(maze.grid().passage_count(), 3);

            let path = maze.solution_path();
            assert!(path.len() == 2 || path.len() == 3, "path {:?}", path);
            assert_eq!(path.first(), Some(&0));
            assert_eq!(path.last(), Some(&3));
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let mut a = Maze::seeded(10, 10, 1234);
        let mut b = Maze::seeded(10, 10, 1234);
        a.finish();
        b.finish();

        assert_eq!(a.cells(), b.cells());
        assert_eq!(a.solution_path(), b.solution_path());
    }

    #[test]
    fn test_solution_cells_follow_path() {
        let mut maze = Maze::seeded(4, 6, 17);
        maze.finish();

        let cells = maze.solution_cells();
        let path = maze.solution_path();
        assert_eq!(cells.len(), path.len());
        assert_eq!((cells[0].row, cells[0].col), (0, 0));
        let last = cells[cells.len() - 1];
        assert_eq!((last.row, last.col), (3, 5));
    }
}
