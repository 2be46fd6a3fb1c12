use maze::{Grid, Maze, Step, Wall};
use rand::{rngs::StdRng, SeedableRng};

fn is_adjacent_and_open(grid: &Grid, a: usize, b: usize) -> bool {
    Wall::ALL
        .into_iter()
        .any(|w| grid.neighbor(a, w) == Some(b) && !grid.cells()[a].has_wall(w))
}

#[test]
fn finished_mazes_are_perfect() {
    for (rows, cols) in [(1, 1), (1, 7), (7, 1), (2, 2), (5, 8), (13, 13)] {
        for seed in 0..10 {
            let mut maze = Maze::seeded(rows, cols, seed);
            let steps = maze.finish();

            assert!(steps <= 2 * rows * cols);
            assert_eq!(maze.visited_count(), rows * cols);
            assert_eq!(maze.grid().passage_count(), rows * cols - 1);

            let path = maze.solution_path();
            assert_eq!(path.first(), Some(&0));
            assert_eq!(path.last(), Some(&(rows * cols - 1)));
            for pair in path.windows(2) {
                assert!(is_adjacent_and_open(maze.grid(), pair[0], pair[1]));
            }

            let mut sorted = path.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), path.len(), "path repeats a cell");
        }
    }
}

/// Number of cells reachable from cell 0 when the passage `skip` is ignored
fn reachable_without(grid: &Grid, skip: (usize, usize)) -> usize {
    let mut seen = vec![false; grid.len()];
    let mut todo = vec![0];
    seen[0] = true;

    while let Some(i) = todo.pop() {
        for (_, n) in grid.accessible_neighbors(i) {
            if (i, n) == skip || (n, i) == skip || seen[n] {
                continue;
            }
            seen[n] = true;
            todo.push(n);
        }
    }

    seen.into_iter().filter(|s| *s).count()
}

#[test]
fn removing_any_passage_disconnects_the_grid() {
    let mut maze = Maze::seeded(6, 6, 42);
    maze.finish();
    let grid = maze.grid();

    assert_eq!(reachable_without(grid, (usize::MAX, usize::MAX)), 36);
    for i in 0..grid.len() {
        for (_, n) in grid.accessible_neighbors(i) {
            if i < n {
                assert!(reachable_without(grid, (i, n)) < 36, "{}-{} is not a bridge", i, n);
            }
        }
    }
}

#[test]
fn construction_from_area() {
    let maze = Maze::with_rng(800.0, 600.0, 25.0, StdRng::seed_from_u64(9));
    assert_eq!((maze.rows(), maze.cols()), (24, 32));

    let maze = Maze::with_rng(10.0, 10.0, 100.0, StdRng::seed_from_u64(9));
    assert_eq!((maze.rows(), maze.cols()), (1, 1));
    assert!(!maze.is_finished());
}

#[test]
fn degenerate_single_cell() {
    let mut maze = Maze::with_rng(0.0, 0.0, 10.0, StdRng::seed_from_u64(0));

    assert_eq!(maze.step(), Step::Finished);
    let path = maze.solution_cells();
    assert_eq!(path.len(), 1);
    assert_eq!((path[0].row, path[0].col), (0, 0));
}

#[test]
fn partial_maze_solution_is_safe() {
    let mut maze = Maze::seeded(10, 10, 8);
    for _ in 0..5 {
        maze.step();
    }

    // at most a handful of cells are carved, so the corners cannot be connected yet
    assert!(!maze.is_finished());
    assert!(maze.solution_path().is_empty());
}

#[test]
fn solution_is_stable_between_reads() {
    let mut maze = Maze::seeded(9, 4, 77);
    maze.finish();

    assert_eq!(maze.solution_path(), maze.solution_path());
    assert_eq!(maze.step(), Step::Idle);
    assert_eq!(maze.solution_path(), maze.solution_path());
}

#[test]
fn stack_tracks_open_path() {
    let mut maze = Maze::seeded(5, 5, 21);

    while !maze.is_finished() {
        let current = maze.current_index();
        let depth = maze.stack().len();

        match maze.step() {
            Step::Carved { from, .. } => {
                assert_eq!(Some(from), current);
                assert_eq!(maze.stack().len(), depth + 1);
            }
            Step::Backtracked { .. } => assert_eq!(maze.stack().len(), depth - 1),
            Step::Finished => assert!(maze.stack().is_empty()),
            Step::Idle => unreachable!(),
        }

        // consecutive cells on the stack are always connected
        let stack: Vec<usize> = maze.stack().to_vec();
        for pair in stack.windows(2) {
            assert!(is_adjacent_and_open(maze.grid(), pair[0], pair[1]));
        }
        assert_eq!(maze.stack_cells().count(), stack.len());
    }
}
