use nalgebra::{Point2, Vector2};

/// A camera that can be used to pan and zoom the view of the maze.
/// World coordinates are maze pixels, i.e. a cell at `(row, col)` spans
/// `col * pitch .. (col + 1) * pitch` horizontally.
#[derive(Debug, Clone)]
pub struct Camera {
    offset: Vector2<f32>,
    scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub const MIN_SCALE: f32 = 0.25;
    pub const MAX_SCALE: f32 = 16.0;

    pub fn new() -> Camera {
        Camera {
            offset: Vector2::zeros(),
            scale: 1.0,
        }
    }

    /// Converts a position relative to the canvas into a world position
    pub fn pixel_to_world(&self, pixel: Point2<f32>) -> Point2<f32> {
        pixel / self.scale - self.offset
    }

    /// Converts a world position into a position relative to the canvas
    pub fn world_to_pixel(&self, world: Point2<f32>) -> Point2<f32> {
        (world + self.offset) * self.scale
    }

    /// Pans the camera by the given amount in pixels
    pub fn pan_pixels(&mut self, delta: Vector2<f32>) {
        self.offset += delta / self.scale;
    }

    /// Zooms by `factor` while keeping the world position under `pixel` fixed
    pub fn zoom_at(&mut self, pixel: Point2<f32>, factor: f32) {
        let before = self.pixel_to_world(pixel);
        self.scale = (self.scale * factor).clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        let after = self.pixel_to_world(pixel);
        self.offset += after - before;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
