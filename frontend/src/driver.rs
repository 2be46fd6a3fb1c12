use maze::{Maze, Step};
use rand::Rng;

pub const MIN_SPEED: f32 = 1.0;
pub const MAX_SPEED: f32 = 2000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    Idle,
    Generating,
    Paused,
    Finished,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Idle => "Ready",
            Status::Generating => "Generating...",
            Status::Paused => "Paused",
            Status::Finished => "Solved",
        }
    }

    /// The grid layout may only change while no maze is in progress
    pub fn allows_resize(&self) -> bool {
        matches!(self, Status::Idle | Status::Finished)
    }
}

/// Result of advancing the driver by one frame
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DriverTick {
    pub steps: usize,
    /// Generation completed during this frame
    pub finished: bool,
    /// The cell the walker moved to last, if any
    pub last_cell: Option<usize>,
}

/// Turns elapsed time into a whole number of generation steps at a fixed rate
#[derive(Debug)]
pub struct StepDriver {
    speed: f32,
    accumulator: f32,
}

impl StepDriver {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
            accumulator: 0.0,
        }
    }

    /// Steps per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Accumulates `dt` seconds worth of progress and flushes it as whole steps
    pub fn advance<R: Rng>(&mut self, maze: &mut Maze<R>, dt: f32) -> DriverTick {
        let mut tick = DriverTick::default();
        if maze.is_finished() || !dt.is_finite() || dt <= 0.0 {
            return tick;
        }

        self.accumulator += self.speed * dt;
        while self.accumulator >= 1.0 {
            self.accumulator -= 1.0;
            tick.steps += 1;

            match maze.step() {
                Step::Carved { to, .. } | Step::Backtracked { to, .. } => {
                    tick.last_cell = Some(to);
                }
                Step::Finished | Step::Idle => {
                    tick.finished = true;
                    self.accumulator = 0.0;
                    break;
                }
            }
        }

        tick
    }
}

/// Smoothed frames per second for the diagnostics overlay
#[derive(Debug, Default)]
pub struct FpsCounter {
    fps: f32,
}

impl FpsCounter {
    pub fn update(&mut self, dt: f32) {
        let current = 1.0 / dt.max(0.001);
        self.fps = self.fps * 0.95 + current * 0.05;
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
