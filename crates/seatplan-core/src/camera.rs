//! Camera module for the room-feet to screen-pixel transform.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Lower bound on the fitted scale, in pixels per foot.
pub const MIN_SCALE: f64 = 2.0;

/// Zoom level that shows the whole room fitted to the canvas.
pub const DEFAULT_ZOOM: u32 = 100;
pub const MIN_ZOOM: u32 = 25;
pub const MAX_ZOOM: u32 = 400;

/// Zoom step while at or below 100%.
const SMALL_ZOOM_STEP: u32 = 25;
/// Zoom step above 100%.
const LARGE_ZOOM_STEP: u32 = 50;

/// Maps room feet to canvas pixels.
///
/// The room is fitted into the canvas (minus a margin), centered, scaled by
/// `zoom_level / 100` and then shifted by `pan`. Scale and offset are derived
/// on demand so they can never drift from the canvas or room size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Canvas size in pixels.
    pub canvas_size: Size,
    /// Room size in feet.
    pub room: Size,
    /// Total pixels reserved around the fitted room.
    pub margin: f64,
    /// Zoom percentage, 25 to 400.
    pub zoom_level: u32,
    /// Pan offset in pixels.
    pub pan: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0), Size::new(60.0, 40.0), 40.0)
    }
}

impl Camera {
    pub fn new(canvas_size: Size, room: Size, margin: f64) -> Self {
        Self {
            canvas_size,
            room,
            margin,
            zoom_level: DEFAULT_ZOOM,
            pan: Vec2::ZERO,
        }
    }

    /// A copy of this camera fitted to another room size.
    pub fn with_room(&self, room: Size) -> Self {
        Self {
            room,
            ..self.clone()
        }
    }

    /// Pixels per foot at 100% zoom.
    pub fn fit_scale(&self) -> f64 {
        if self.room.width <= 0.0 || self.room.height <= 0.0 {
            return MIN_SCALE;
        }
        let sx = (self.canvas_size.width - self.margin) / self.room.width;
        let sy = (self.canvas_size.height - self.margin) / self.room.height;
        sx.min(sy).max(MIN_SCALE)
    }

    /// Current pixels per foot.
    pub fn scale(&self) -> f64 {
        self.scale_at(self.zoom_level)
    }

    fn scale_at(&self, zoom_level: u32) -> f64 {
        self.fit_scale() * f64::from(zoom_level) / 100.0
    }

    /// Offset that centers the room at `scale`, before panning.
    fn centering_offset(&self, scale: f64) -> Vec2 {
        Vec2::new(
            (self.canvas_size.width - self.room.width * scale) / 2.0,
            (self.canvas_size.height - self.room.height * scale) / 2.0,
        )
    }

    /// Pixel position of the room origin.
    pub fn offset(&self) -> Vec2 {
        self.centering_offset(self.scale()) + self.pan
    }

    /// Get the affine transform from feet to pixels.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset()) * Affine::scale(self.scale())
    }

    /// Get the inverse transform from pixels to feet.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale()) * Affine::translate(-self.offset())
    }

    pub fn to_pixels(&self, feet: Point) -> Point {
        self.transform() * feet
    }

    pub fn to_feet(&self, pixels: Point) -> Point {
        self.inverse_transform() * pixels
    }

    /// Convert a length in feet to pixels.
    pub fn length_to_pixels(&self, feet: f64) -> f64 {
        feet * self.scale()
    }

    /// Pan by a delta in pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the zoom level, keeping the room point under `cursor` fixed.
    pub fn zoom_at(&mut self, cursor: Point, zoom_level: u32) {
        let zoom_level = zoom_level.clamp(MIN_ZOOM, MAX_ZOOM);
        if zoom_level == self.zoom_level {
            return;
        }
        let world = self.to_feet(cursor);
        let scale = self.scale_at(zoom_level);
        self.zoom_level = zoom_level;
        // Solve cursor = world * scale + centering + pan for pan.
        self.pan = cursor.to_vec2() - world.to_vec2() * scale - self.centering_offset(scale);
        log::debug!("Zoom {}% at ({:.1}, {:.1})", zoom_level, cursor.x, cursor.y);
    }

    pub fn zoom_in_at(&mut self, cursor: Point) {
        self.zoom_at(cursor, next_zoom_in(self.zoom_level));
    }

    pub fn zoom_out_at(&mut self, cursor: Point) {
        self.zoom_at(cursor, next_zoom_out(self.zoom_level));
    }

    /// Reset to the fitted, centered view.
    pub fn reset(&mut self) {
        self.zoom_level = DEFAULT_ZOOM;
        self.pan = Vec2::ZERO;
    }
}

/// The next level up: 25% steps below 100%, 50% steps from 100% on.
pub fn next_zoom_in(level: u32) -> u32 {
    let step = if level < 100 { SMALL_ZOOM_STEP } else { LARGE_ZOOM_STEP };
    (level + step).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// The next level down: 50% steps above 100%, 25% steps from 100% down.
pub fn next_zoom_out(level: u32) -> u32 {
    let step = if level > 100 { LARGE_ZOOM_STEP } else { SMALL_ZOOM_STEP };
    level.saturating_sub(step).clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Size::new(1040.0, 840.0), Size::new(100.0, 50.0), 40.0)
    }

    #[test]
    fn test_fit_scale_and_centering() {
        let camera = camera();
        // min(1000 / 100, 800 / 50) = 10
        assert!((camera.scale() - 10.0).abs() < f64::EPSILON);
        let offset = camera.offset();
        assert!((offset.x - 20.0).abs() < f64::EPSILON);
        assert!((offset.y - 170.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_min_scale_floor() {
        let camera = Camera::new(Size::new(100.0, 100.0), Size::new(500.0, 500.0), 40.0);
        assert!((camera.scale() - MIN_SCALE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = camera();
        camera.pan = Vec2::new(-37.5, 12.25);
        camera.zoom_level = 175;

        for original in [Point::new(0.0, 0.0), Point::new(12.3, 45.6), Point::new(-3.0, 99.0)] {
            let back = camera.to_feet(camera.to_pixels(original));
            assert!((back.x - original.x).abs() < 1e-9);
            assert!((back.y - original.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let mut camera = camera();
        camera.pan = Vec2::new(15.0, -8.0);
        let cursor = Point::new(300.0, 420.0);
        let before = camera.to_feet(cursor);

        camera.zoom_in_at(cursor);
        assert_eq!(camera.zoom_level, 150);
        let after = camera.to_feet(cursor);
        assert!((after.x - before.x).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);

        camera.zoom_out_at(cursor);
        camera.zoom_out_at(cursor);
        assert_eq!(camera.zoom_level, 75);
        let after = camera.to_feet(cursor);
        assert!((after.x - before.x).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_steps_and_bounds() {
        assert_eq!(next_zoom_in(25), 50);
        assert_eq!(next_zoom_in(75), 100);
        assert_eq!(next_zoom_in(100), 150);
        assert_eq!(next_zoom_in(400), 400);
        assert_eq!(next_zoom_out(150), 100);
        assert_eq!(next_zoom_out(100), 75);
        assert_eq!(next_zoom_out(25), 25);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = camera();
        camera.zoom_at(Point::ZERO, 1000);
        assert_eq!(camera.zoom_level, MAX_ZOOM);
        camera.zoom_at(Point::ZERO, 1);
        assert_eq!(camera.zoom_level, MIN_ZOOM);
    }

    #[test]
    fn test_reset() {
        let mut camera = camera();
        camera.pan_by(Vec2::new(10.0, 20.0));
        camera.zoom_at(Point::new(5.0, 5.0), 200);
        camera.reset();
        assert_eq!(camera.zoom_level, DEFAULT_ZOOM);
        assert_eq!(camera.pan, Vec2::ZERO);
    }
}
