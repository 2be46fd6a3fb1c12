mod camera;

use egui::{Color32, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use log::info;
use maze::{Cell, Maze, Wall};
use nalgebra::{Point2, Vector2};

use crate::driver::{DriverTick, FpsCounter, Status, StepDriver, MAX_SPEED, MIN_SPEED};
use camera::Camera;

const MIN_PITCH: f32 = 4.0;
const MAX_PITCH: f32 = 100.0;

const COLOR_BACKGROUND: Color32 = Color32::BLACK;
const COLOR_VISITED: Color32 = Color32::from_rgb(15, 23, 42);
const COLOR_WALL: Color32 = Color32::from_rgb(17, 17, 17);
const COLOR_GRID: Color32 = Color32::from_rgb(40, 40, 40);
const COLOR_PASSAGE: Color32 = Color32::from_rgb(0, 242, 255);
const COLOR_TRAIL: Color32 = Color32::from_rgb(255, 0, 122);
const COLOR_HEAD: Color32 = Color32::from_rgb(255, 242, 0);
const COLOR_SOLUTION: Color32 = Color32::from_rgb(16, 185, 129);

/// We derive Deserialize/Serialize so we can persist the settings on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct Settings {
    /// Generation steps per second
    speed: f32,
    /// Side length of a cell in pixels
    pitch: f32,
    show_diagnostics: bool,
    draw_grid_lines: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: 120.0,
            pitch: 25.0,
            show_diagnostics: true,
            draw_grid_lines: true,
        }
    }
}

/// The area and pitch a maze was built for
#[derive(Copy, Clone, Debug, PartialEq)]
struct Layout {
    width: f32,
    height: f32,
    pitch: f32,
}

pub struct App {
    settings: Settings,
    maze: Option<Maze>,
    layout: Option<Layout>,
    status: Status,
    driver: StepDriver,
    last_tick: DriverTick,
    /// Computed once when generation finishes
    solution: Vec<usize>,
    fps: FpsCounter,
    camera: Camera,
    output_cell: String,
}

impl App {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous settings (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let mut settings: Settings = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };
        settings.speed = settings.speed.clamp(MIN_SPEED, MAX_SPEED);
        settings.pitch = settings.pitch.clamp(MIN_PITCH, MAX_PITCH);

        App {
            driver: StepDriver::new(settings.speed),
            last_tick: DriverTick::default(),
            settings,
            maze: None,
            layout: None,
            status: Status::Idle,
            solution: Vec::new(),
            fps: FpsCounter::default(),
            camera: Camera::new(),
            output_cell: Default::default(),
        }
    }

    /// Replaces the maze with a fresh one covering `layout`
    fn rebuild(&mut self, layout: Layout) {
        let maze = Maze::new(layout.width, layout.height, layout.pitch);
        info!(
            "new {}x{} maze for {:.0}x{:.0} px at pitch {}",
            maze.cols(),
            maze.rows(),
            layout.width,
            layout.height,
            layout.pitch
        );

        self.maze = Some(maze);
        self.layout = Some(layout);
        self.status = Status::Idle;
        self.solution.clear();
        self.driver.reset();
        self.camera.reset();
    }

    fn reset(&mut self) {
        if let Some(layout) = self.layout {
            self.rebuild(Layout {
                pitch: self.settings.pitch,
                ..layout
            });
        }
    }

    fn start(&mut self) {
        if self.status == Status::Finished {
            self.reset();
        }
        self.status = Status::Generating;
    }

    fn pause(&mut self) {
        if self.status == Status::Generating {
            self.status = Status::Paused;
        }
    }

    /// Runs the remaining generation in one go
    fn finish_now(&mut self) {
        if let Some(maze) = &mut self.maze {
            if !maze.is_finished() {
                maze.finish();
                self.on_finished();
            }
        }
    }

    fn on_finished(&mut self) {
        self.status = Status::Finished;
        self.driver.reset();
        if let Some(maze) = &self.maze {
            self.solution = maze.solution_path();
            info!(
                "maze finished after {} steps, solution has {} cells",
                maze.steps(),
                self.solution.len()
            );
        }
    }

    fn diagnostics(&self) -> String {
        let (cols, rows, stack) = self
            .maze
            .as_ref()
            .map(|m| (m.cols(), m.rows(), m.stack().len()))
            .unwrap_or_default();
        let walker = self
            .last_tick
            .last_cell
            .and_then(|i| self.maze.as_ref()?.grid().get(i))
            .map(|c| format!("{}:{}", c.row, c.col))
            .unwrap_or_else(|| "-".to_owned());

        format!(
            "Grid: {} x {}\nPitch: {} px\nSpeed: {} steps/s\nSteps/frame: {}\nWalker: {}\nStack: {}\nSolution: {}\nFPS: {:.0}",
            cols,
            rows,
            self.settings.pitch,
            self.driver.speed(),
            self.last_tick.steps,
            walker,
            stack,
            self.solution.len(),
            self.fps.fps()
        )
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Maze");
        ui.label(self.status.label());
        ui.separator();

        ui.horizontal(|ui| {
            if self.status == Status::Generating {
                if ui.button("Pause").clicked() {
                    self.pause();
                }
            } else if ui.button("Start").clicked() {
                self.start();
            }
            if ui.button("Reset").clicked() {
                self.reset();
            }
            let finishable = !matches!(self.status, Status::Finished);
            if ui.add_enabled(finishable, egui::Button::new("Finish")).clicked() {
                self.finish_now();
            }
        });

        ui.separator();
        ui.label("Speed (steps per second)");
        ui.horizontal(|ui| {
            if ui.button("-").clicked() {
                self.settings.speed -= 10.0;
            }
            ui.add(
                egui::Slider::new(&mut self.settings.speed, MIN_SPEED..=MAX_SPEED).step_by(1.0),
            );
            if ui.button("+").clicked() {
                self.settings.speed += 10.0;
            }
        });
        self.settings.speed = self.settings.speed.clamp(MIN_SPEED, MAX_SPEED);
        self.driver.set_speed(self.settings.speed);

        ui.label("Cell size (px)");
        ui.add_enabled_ui(self.status.allows_resize(), |ui| {
            ui.horizontal(|ui| {
                if ui.button("-").clicked() {
                    self.settings.pitch -= 1.0;
                }
                ui.add(
                    egui::Slider::new(&mut self.settings.pitch, MIN_PITCH..=MAX_PITCH)
                        .step_by(1.0),
                );
                if ui.button("+").clicked() {
                    self.settings.pitch += 1.0;
                }
            });
        });
        self.settings.pitch = self.settings.pitch.clamp(MIN_PITCH, MAX_PITCH);

        ui.separator();
        ui.checkbox(&mut self.settings.show_diagnostics, "Show diagnostics");
        ui.checkbox(&mut self.settings.draw_grid_lines, "Draw grid lines");
        ui.label("Drag to pan, scroll to zoom, double click to recenter");

        ui.separator();
        ui.label(&self.output_cell);
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let size = ui.available_size();
        let layout = Layout {
            width: size.x.floor(),
            height: size.y.floor(),
            pitch: self.settings.pitch,
        };

        // the window was resized or the cell size changed
        let stale = match self.layout {
            None => true,
            Some(old) => {
                old.width != layout.width
                    || old.height != layout.height
                    || (old.pitch != layout.pitch && self.status.allows_resize())
            }
        };
        if stale {
            self.rebuild(layout);
        }

        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let rect = response.rect;

        if response.dragged() {
            let delta = response.drag_delta();
            self.camera.pan_pixels(Vector2::new(delta.x, delta.y));
        }
        if response.double_clicked() {
            self.camera.reset();
        }
        if let Some(pos) = response.hover_pos() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                let factor = if scroll > 0.0 { 1.1 } else { 1.0 / 1.1 };
                self.camera
                    .zoom_at(Point2::new(pos.x - rect.left(), pos.y - rect.top()), factor);
            }
            self.output_cell = self.describe_cell_at(pos - rect.min);
        }

        painter.rect_filled(rect, 0.0, COLOR_BACKGROUND);
        if let Some(maze) = &self.maze {
            self.paint_maze(maze, &painter, rect);
        }
    }

    /// Text for the side panel about the cell under the pointer
    fn describe_cell_at(&self, pixel: Vec2) -> String {
        let (Some(maze), Some(layout)) = (&self.maze, self.layout) else {
            return String::new();
        };

        let world = self.camera.pixel_to_world(Point2::new(pixel.x, pixel.y));
        if world.x < 0.0 || world.y < 0.0 {
            return String::new();
        }
        let (row, col) = (
            (world.y / layout.pitch) as usize,
            (world.x / layout.pitch) as usize,
        );

        match maze.grid().index(row, col).and_then(|i| maze.grid().get(i)) {
            Some(cell) => format!("Cell @{}:{}\n{:#?}", row, col, cell),
            None => String::new(),
        }
    }

    fn paint_maze(&self, maze: &Maze, painter: &egui::Painter, rect: Rect) {
        let Some(layout) = self.layout else {
            return;
        };
        let w = layout.pitch;
        let scale = self.camera.scale();
        let to_screen = |x: f32, y: f32| -> Pos2 {
            let p = self.camera.world_to_pixel(Point2::new(x, y));
            rect.min + Vec2::new(p.x, p.y)
        };
        let center = |cell: &Cell| -> Pos2 {
            to_screen(
                cell.col as f32 * w + w / 2.0,
                cell.row as f32 * w + w / 2.0,
            )
        };

        // visited cells
        for cell in maze.cells().iter().filter(|c| c.visited) {
            let x = cell.col as f32 * w;
            let y = cell.row as f32 * w;
            painter.rect_filled(
                Rect::from_two_pos(to_screen(x, y), to_screen(x + w, y + w)),
                0.0,
                COLOR_VISITED,
            );
        }

        // walls
        if self.settings.draw_grid_lines {
            let stroke = Stroke::new(if w < 10.0 { 0.5 } else { 1.0 }, COLOR_GRID);
            for cell in maze.cells() {
                let x = cell.col as f32 * w;
                let y = cell.row as f32 * w;
                for wall in Wall::ALL.into_iter().filter(|wall| cell.has_wall(*wall)) {
                    let (a, b) = match wall {
                        Wall::Top => ((x, y), (x + w, y)),
                        Wall::Right => ((x + w, y), (x + w, y + w)),
                        Wall::Bottom => ((x + w, y + w), (x, y + w)),
                        Wall::Left => ((x, y + w), (x, y)),
                    };
                    painter.line_segment([to_screen(a.0, a.1), to_screen(b.0, b.1)], stroke);
                }
            }
        } else {
            let stroke = Stroke::new(1.0, COLOR_WALL);
            let (x1, y1) = (maze.cols() as f32 * w, maze.rows() as f32 * w);
            painter.rect_stroke(
                Rect::from_two_pos(to_screen(0.0, 0.0), to_screen(x1, y1)),
                0.0,
                stroke,
            );
        }

        // carved passages, drawn from each cell center towards the removed wall
        let stroke = Stroke::new((w * 0.12 * scale).max(1.0), COLOR_PASSAGE);
        for cell in maze.cells().iter().filter(|c| c.visited) {
            let from = center(cell);
            for wall in cell.passages() {
                let half = w / 2.0 * scale;
                let to = match wall {
                    Wall::Top => from - Vec2::new(0.0, half),
                    Wall::Right => from + Vec2::new(half, 0.0),
                    Wall::Bottom => from + Vec2::new(0.0, half),
                    Wall::Left => from - Vec2::new(half, 0.0),
                };
                painter.line_segment([from, to], stroke);
            }
        }

        // the open backtracking path up to the walker
        if self.status != Status::Finished {
            let trail: Vec<Pos2> = maze.stack_cells().chain(maze.current()).map(center).collect();
            if trail.len() > 1 {
                painter.add(Shape::line(
                    trail,
                    Stroke::new((w * 0.25 * scale).max(2.0), COLOR_TRAIL),
                ));
            }
        }

        if self.solution.len() > 1 {
            let points: Vec<Pos2> = self
                .solution
                .iter()
                .filter_map(|&i| maze.grid().get(i))
                .map(center)
                .collect();
            painter.add(Shape::line(
                points,
                Stroke::new((w * 0.4 * scale).max(3.0), COLOR_SOLUTION),
            ));
        }

        if let Some(cell) = maze.current() {
            let pad = w * 0.15;
            let x = cell.col as f32 * w;
            let y = cell.row as f32 * w;
            painter.rect_filled(
                Rect::from_two_pos(
                    to_screen(x + pad, y + pad),
                    to_screen(x + w - pad, y + w - pad),
                ),
                0.0,
                COLOR_HEAD,
            );
        }
    }
}

impl eframe::App for App {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (dt, frame_time) = ctx.input(|i| (i.stable_dt, i.unstable_dt));
        self.fps.update(frame_time);

        self.last_tick = match (&mut self.maze, self.status) {
            (Some(maze), Status::Generating) => self.driver.advance(maze, dt),
            _ => DriverTick::default(),
        };
        if self.last_tick.finished {
            self.on_finished();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                // NOTE: no File->Quit on web pages!
                let is_web = cfg!(target_arch = "wasm32");
                if !is_web {
                    ui.menu_button("File", |ui| {
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.add_space(16.0);
                }

                egui::widgets::global_dark_light_mode_buttons(ui);
            });
        });

        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            self.controls(ui);

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                egui::warn_if_debug_build(ui);
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ui));

        if self.settings.show_diagnostics {
            let text = self.diagnostics();
            egui::Window::new("Diagnostics")
                .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
                .resizable(false)
                .collapsible(false)
                .show(ctx, |ui| {
                    ui.monospace(text);
                });
        }

        if self.status == Status::Generating || self.settings.show_diagnostics {
            ctx.request_repaint();
        }
    }
}
