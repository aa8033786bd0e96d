//! The two drawable halves of a connector: the line and its arrowhead.
//!
//! Both carry the ids of the objects they link so tracking can be rebuilt
//! after a snapshot restore. Their geometry is derived; see `crate::connector`.

use super::{SerializableColor, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Straight line from the `from` object's center to the `to` object's center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorLine {
    pub(crate) id: ShapeId,
    pub start: Point,
    pub end: Point,
    pub from: ShapeId,
    pub to: ShapeId,
    pub style: ShapeStyle,
}

impl ConnectorLine {
    pub const STROKE_WIDTH: f64 = 2.0;

    pub fn new(start: Point, end: Point, from: ShapeId, to: ShapeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            from,
            to,
            style: ShapeStyle {
                stroke_color: SerializableColor::black(),
                stroke_width: Self::STROKE_WIDTH,
                ..ShapeStyle::default()
            },
        }
    }
}

impl ShapeTrait for ConnectorLine {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn center(&self) -> Point {
        self.start.midpoint(self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= tolerance + self.style.stroke_width / 2.0
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.start = affine * self.start;
        self.end = affine * self.end;
    }
}

/// Triangle arrowhead centered on the `to` endpoint.
///
/// `angle` is in degrees; 0 means the tip points up (towards -y).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorHead {
    pub(crate) id: ShapeId,
    /// The line this head belongs to.
    pub line: ShapeId,
    pub position: Point,
    pub size: f64,
    pub angle: f64,
    pub style: ShapeStyle,
}

impl ConnectorHead {
    pub const SIZE: f64 = 12.0;

    pub fn new(line: ShapeId, position: Point, angle: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            line,
            position,
            size: Self::SIZE,
            angle,
            style: ShapeStyle {
                stroke_width: 0.0,
                fill_color: Some(SerializableColor::black()),
                ..ShapeStyle::default()
            },
        }
    }

    /// Triangle corners (tip first) in world coordinates.
    pub fn vertices(&self) -> [Point; 3] {
        let half = self.size / 2.0;
        let rotate = Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.angle.to_radians());
        [
            rotate * Point::new(0.0, -half),
            rotate * Point::new(half, half),
            rotate * Point::new(-half, half),
        ]
    }
}

impl ShapeTrait for ConnectorHead {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        // Circumscribed square, valid for any rotation
        let reach = self.size * std::f64::consts::SQRT_2;
        Rect::from_center_size(self.position, (reach, reach))
    }

    fn center(&self) -> Point {
        self.position
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot() <= self.size / 2.0 + tolerance
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_hit() {
        let line = ConnectorLine::new(Point::ZERO, Point::new(100.0, 0.0), Uuid::new_v4(), Uuid::new_v4());
        assert!(line.hit_test(Point::new(50.0, 0.5), 0.0));
        assert!(!line.hit_test(Point::new(50.0, 5.0), 0.0));
        assert_eq!(line.center(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_head_vertices_follow_angle() {
        // 90 degrees: tip points right (+x)
        let head = ConnectorHead::new(Uuid::new_v4(), Point::new(10.0, 10.0), 90.0);
        let [tip, _, _] = head.vertices();
        assert!((tip.x - 16.0).abs() < 1e-9);
        assert!((tip.y - 10.0).abs() < 1e-9);
    }
}
