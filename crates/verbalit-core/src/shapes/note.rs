//! Sticky note: a rounded rectangle with a text label, moved as one unit.

use super::{Rectangle, ShapeId, ShapeStyle, ShapeTrait, Text};
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A composite of a background rectangle and a wrapped text label.
///
/// The note's own style is the body's style; the label keeps its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub(crate) id: ShapeId,
    pub body: Rectangle,
    pub label: Text,
}

impl Note {
    pub fn new(body: Rectangle, label: Text) -> Self {
        Self {
            id: Uuid::new_v4(),
            body,
            label,
        }
    }

    pub fn text(&self) -> &str {
        &self.label.content
    }

    pub fn set_text(&mut self, content: impl Into<String>) {
        self.label.content = content.into();
    }
}

impl ShapeTrait for Note {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.body.bounds().union(self.label.bounds())
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        self.body.style()
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        self.body.style_mut()
    }

    fn transform(&mut self, affine: Affine) {
        self.body.transform(affine);
        self.label.transform(affine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Note {
        let body = Rectangle::new(Point::new(0.0, 0.0), 140.0, 100.0);
        let label = Text::new(Point::new(10.0, 10.0), "Note...")
            .with_font_size(14.0)
            .with_box_width(120.0);
        Note::new(body, label)
    }

    #[test]
    fn test_bounds_cover_body() {
        let note = sample();
        assert_eq!(note.bounds(), Rect::new(0.0, 0.0, 140.0, 100.0));
        assert_eq!(note.center(), Point::new(70.0, 50.0));
    }

    #[test]
    fn test_children_move_together() {
        let mut note = sample();
        note.transform(Affine::translate((30.0, 40.0)));
        assert_eq!(note.body.position, Point::new(30.0, 40.0));
        assert_eq!(note.label.position, Point::new(40.0, 50.0));
    }

    #[test]
    fn test_hit_inside_unfilled_body() {
        let note = sample();
        assert!(note.hit_test(Point::new(70.0, 80.0), 0.0));
        assert!(!note.hit_test(Point::new(200.0, 80.0), 0.0));
    }
}
