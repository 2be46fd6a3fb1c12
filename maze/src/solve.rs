use std::collections::VecDeque;

use log::trace;

use crate::grid::Grid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverState {
    Searching,
    NoPath,
    /// Cell indices from start to goal, both inclusive
    PathFound(Vec<usize>),
}

impl SolverState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SolverState::Searching)
    }
}

/// Breadth-first search through the removed walls of a grid, one dequeued cell per step
#[derive(Debug)]
pub struct Solver<'a> {
    grid: &'a Grid,
    start: usize,
    goal: usize,
    visited: Vec<bool>,
    parent: Vec<Option<usize>>,
    queue: VecDeque<usize>,
    state: SolverState,
}

impl<'a> Solver<'a> {
    pub fn new(grid: &'a Grid, start: usize, goal: usize) -> Self {
        let mut visited = vec![false; grid.len()];
        let mut queue = VecDeque::new();

        let state = if start < grid.len() && goal < grid.len() {
            visited[start] = true;
            queue.push_back(start);
            SolverState::Searching
        } else {
            SolverState::NoPath
        };

        Self {
            grid,
            start,
            goal,
            visited,
            parent: vec![None; grid.len()],
            queue,
            state,
        }
    }

    pub fn step(&mut self) -> &SolverState {
        if self.state.is_done() {
            return &self.state;
        }

        let Some(index) = self.queue.pop_front() else {
            trace!("no path from {} to {}", self.start, self.goal);
            self.state = SolverState::NoPath;
            return &self.state;
        };

        if index == self.goal {
            // walk the parent links back to the start
            let mut path = vec![index];
            let mut previous = self.parent[index];
            while let Some(from) = previous {
                path.push(from);
                previous = self.parent[from];
            }
            path.reverse();

            self.state = SolverState::PathFound(path);
            return &self.state;
        }

        for (_, neighbor) in self.grid.accessible_neighbors(index) {
            if !self.visited[neighbor] {
                self.visited[neighbor] = true;
                self.parent[neighbor] = Some(index);
                self.queue.push_back(neighbor);
            }
        }

        &self.state
    }

    pub fn finish(mut self) -> SolverState {
        while !self.step().is_done() {}
        self.state
    }

    pub fn state(&self) -> &SolverState {
        &self.state
    }

    pub fn is_visited(&self, index: usize) -> bool {
        self.visited.get(index).copied().unwrap_or(false)
    }

    /// Number of cells discovered but not expanded yet
    pub fn frontier_len(&self) -> usize {
        self.queue.len()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn goal(&self) -> usize {
        self.goal
    }
}

/// Path from the first to the last cell of `grid`, or empty if there is none
pub fn solve(grid: &Grid) -> Vec<usize> {
    if grid.is_empty() {
        return Vec::new();
    }

    match Solver::new(grid, 0, grid.len() - 1).finish() {
        SolverState::PathFound(path) => path,
        _ => Vec::new(),
    }
}
