//! Camera module for pan/zoom transforms.

use crate::config::SurfaceConfig;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the view transform for the surface.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom factor (1.0 = 100%)
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Visible area in screen pixels.
    pub viewport: Size,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&SurfaceConfig::default(), Size::new(1280.0, 800.0))
    }
}

impl Camera {
    /// Create a camera with the virtual surface centered in the viewport.
    pub fn new(config: &SurfaceConfig, viewport: Size) -> Self {
        let mut camera = Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            viewport,
        };
        camera.center_on(config.virtual_size());
        camera
    }

    /// Reset to zoom 1 with the surface centered in the viewport.
    pub fn center_on(&mut self, surface: Size) {
        self.zoom = 1.0;
        self.offset = Vec2::new(
            -(surface.width - self.viewport.width) / 2.0,
            -(surface.height - self.viewport.height) / 2.0,
        );
    }

    /// Get the affine transform for rendering (world → screen).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling (screen → world).
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    pub fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set an absolute zoom, keeping the given screen point fixed.
    ///
    /// The zoom is clamped to `[min_zoom, max_zoom]`.
    pub fn zoom_to_point(&mut self, screen_point: Point, zoom: f64) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
    }

    /// Wheel zoom around the cursor: `zoom *= base^delta_y`.
    pub fn zoom_wheel(&mut self, cursor: Point, delta_y: f64, base: f64) {
        let target = self.zoom * base.powf(delta_y);
        self.zoom_to_point(cursor, target);
    }

    /// Zoom in by one step around the viewport center.
    pub fn zoom_in(&mut self, step: f64) {
        self.zoom_to_point(self.viewport_center(), self.zoom * step);
    }

    /// Zoom out by one step around the viewport center.
    pub fn zoom_out(&mut self, step: f64) {
        self.zoom_to_point(self.viewport_center(), self.zoom / step);
    }

    /// Back to 100% around the viewport center. The pan offset is kept.
    pub fn reset_zoom(&mut self) {
        self.zoom_to_point(self.viewport_center(), 1.0);
    }
}
