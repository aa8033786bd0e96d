//! Text shape.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        }
    }
}

/// A text object. The fill color of its style is the glyph color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left corner of the text box.
    pub position: Point,
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Fixed wrapping width, `None` for auto-sized text.
    #[serde(default)]
    pub box_width: Option<f64>,
    /// Highlight drawn behind the glyphs.
    #[serde(default)]
    pub background_color: Option<SerializableColor>,
    pub style: ShapeStyle,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    /// Create a new text object.
    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: FontWeight::default(),
            box_width: None,
            background_color: None,
            style: ShapeStyle {
                stroke_width: 0.0,
                fill_color: Some(SerializableColor::black()),
                ..ShapeStyle::default()
            },
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_box_width(mut self, width: f64) -> Self {
        self.box_width = Some(width);
        self
    }

    pub fn with_fill(mut self, color: SerializableColor) -> Self {
        self.style.fill_color = Some(color);
        self
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }

    /// Approximate width when no layout information is available.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let char_width_factor = match self.font_weight {
            FontWeight::Normal => 0.55,
            FontWeight::Bold => 0.6,
        };
        max_line_len as f64 * self.font_size * char_width_factor
    }

    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        let line_count = if self.content.ends_with('\n') {
            line_count + 1
        } else {
            line_count
        };
        line_count as f64 * self.font_size * 1.2
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let width = self
            .box_width
            .unwrap_or_else(|| self.approximate_width().max(20.0));
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + self.approximate_height(),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        // Glyphs follow the vertical scale, the wrapping box the horizontal one.
        let coeffs = affine.as_coeffs();
        self.font_size *= coeffs[3].abs();
        self.box_width = self.box_width.map(|w| w * coeffs[0].abs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_grow_with_content() {
        let short = Text::new(Point::ZERO, "ab").with_font_size(24.0);
        let long = Text::new(Point::ZERO, "abcdefgh").with_font_size(24.0);
        assert!(long.bounds().width() > short.bounds().width());
        assert!((short.bounds().height() - 28.8).abs() < 1e-9);
    }

    #[test]
    fn test_box_width_overrides_layout() {
        let text = Text::new(Point::new(10.0, 10.0), "Note...").with_box_width(120.0);
        assert!((text.bounds().width() - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_uniform_scale() {
        let mut text = Text::new(Point::ZERO, "Edit me")
            .with_font_size(24.0)
            .with_box_width(100.0);
        text.transform(Affine::scale_non_uniform(3.0, 1.0));
        assert!((text.font_size - 24.0).abs() < f64::EPSILON);
        assert!((text.bounds().width() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_bold_toggle() {
        let mut text = Text::new(Point::ZERO, "Edit me");
        assert!(!text.is_bold());
        text.font_weight = text.font_weight.toggled();
        assert!(text.is_bold());
        text.font_weight = text.font_weight.toggled();
        assert!(!text.is_bold());
    }
}
