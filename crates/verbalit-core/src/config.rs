//! Surface configuration.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Tunables for the drawing surface.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Logical width of the drawing surface.
    pub virtual_width: f64,
    /// Logical height of the drawing surface.
    pub virtual_height: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Wheel zoom is `zoom * wheel_base.powf(delta_y)`.
    pub wheel_base: f64,
    /// Multiplier for the zoom in / zoom out buttons.
    pub zoom_step: f64,
    /// Space kept free around inserted images.
    pub image_margin: f64,
    /// Hit-test slack in world units.
    pub hit_tolerance: f64,
    /// Oldest snapshots are dropped past this count. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            virtual_width: 3000.0,
            virtual_height: 3000.0,
            min_zoom: 0.5,
            max_zoom: 5.0,
            wheel_base: 0.999,
            zoom_step: 1.1,
            image_margin: 200.0,
            hit_tolerance: 4.0,
            history_limit: None,
        }
    }
}

impl SurfaceConfig {
    pub fn virtual_size(&self) -> Size {
        Size::new(self.virtual_width, self.virtual_height)
    }

    /// Where new objects are dropped.
    pub fn surface_center(&self) -> Point {
        Point::new(self.virtual_width / 2.0, self.virtual_height / 2.0)
    }

    /// Parse a config from JSON, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
