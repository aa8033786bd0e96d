//! Drawable objects placed on the moodboard surface.

mod connector_parts;
mod ellipse;
mod freehand;
mod image;
mod note;
mod rectangle;
mod text;

pub use connector_parts::{ConnectorHead, ConnectorLine};
pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use image::{Image, ImageError, ImageFormat};
pub use note::Note;
pub use rectangle::Rectangle;
pub use text::{FontWeight, Text};

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    ///
    /// Returns `None` for anything else, including named colors.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// How a stroke is blended onto what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompositeMode {
    /// Paint over existing content.
    #[default]
    SourceOver,
    /// Punch out existing content (eraser strokes).
    DestinationOut,
}

/// Style properties for drawable objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width (0 = no outline).
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub composite: CompositeMode,
}

fn default_opacity() -> f64 {
    1.0
}

impl ShapeStyle {
    /// Filled shape with a solid outline.
    pub fn filled(fill: SerializableColor, stroke: SerializableColor, stroke_width: f64) -> Self {
        Self {
            stroke_color: stroke,
            stroke_width,
            fill_color: Some(fill),
            ..Self::default()
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            opacity: 1.0,
            composite: CompositeMode::default(),
        }
    }
}

/// Unique identifier for drawable objects.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    (point - proj).hypot()
}

/// Common trait for all drawable objects.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Center point used by connectors.
    fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Check if a point (in world coordinates) hits this object.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Apply a transform to this object.
    fn transform(&mut self, affine: Affine);
}

/// Enum wrapper for all object kinds (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Text(Text),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Freehand(Freehand),
    Image(Image),
    Note(Note),
    ConnectorLine(ConnectorLine),
    ConnectorHead(ConnectorHead),
}

macro_rules! each_shape {
    ($value:expr, $s:ident => $body:expr) => {
        match $value {
            Shape::Text($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Freehand($s) => $body,
            Shape::Image($s) => $body,
            Shape::Note($s) => $body,
            Shape::ConnectorLine($s) => $body,
            Shape::ConnectorHead($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        each_shape!(self, s => s.id())
    }

    pub fn bounds(&self) -> Rect {
        each_shape!(self, s => s.bounds())
    }

    pub fn center(&self) -> Point {
        each_shape!(self, s => s.center())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        each_shape!(self, s => s.hit_test(point, tolerance))
    }

    pub fn style(&self) -> &ShapeStyle {
        each_shape!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        each_shape!(self, s => s.style_mut())
    }

    pub fn transform(&mut self, affine: Affine) {
        each_shape!(self, s => s.transform(affine))
    }

    /// Move by a world-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.transform(Affine::translate(delta));
    }

    /// Connector parts follow their endpoints and cannot be picked directly.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Shape::ConnectorLine(_) | Shape::ConnectorHead(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            SerializableColor::from_hex("#00aaff"),
            Some(SerializableColor::new(0, 0xaa, 0xff, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#333"),
            Some(SerializableColor::new(0x33, 0x33, 0x33, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 0x80))
        );
        assert_eq!(SerializableColor::from_hex("black"), None);
        assert_eq!(SerializableColor::from_hex("#12345"), None);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(SerializableColor::new(0xff, 0xf8, 0xa7, 255).to_hex(), "#fff8a7");
        assert_eq!(SerializableColor::transparent().to_hex(), "#00000000");
    }

    #[test]
    fn test_point_to_segment() {
        let d = point_to_segment_dist(Point::new(5.0, 5.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-10);
        let d = point_to_segment_dist(Point::new(-3.0, 4.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_connector_parts_not_selectable() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let line = ConnectorLine::new(Point::ZERO, Point::new(10.0, 0.0), a, b);
        assert!(!Shape::ConnectorLine(line).is_selectable());
        let rect = Rectangle::new(Point::ZERO, 10.0, 10.0);
        assert!(Shape::Rectangle(rect).is_selectable());
    }
}
