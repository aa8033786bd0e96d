//! Connectors: line + arrowhead pairs that stay attached to two objects.
//!
//! The registry only holds ids. Geometry lives in the document and is
//! recomputed from the endpoints' current centers whenever one of them moves.

use crate::canvas::CanvasDocument;
use crate::shapes::{ConnectorHead, ConnectorLine, Shape, ShapeId};
use kurbo::Point;
use thiserror::Error;

/// Errors raised when linking objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectorError {
    #[error("Cannot connect object {0} to itself")]
    SameEndpoint(ShapeId),
    #[error("Object not found: {0}")]
    UnknownObject(ShapeId),
    #[error("Object {0} cannot be used as a connector endpoint")]
    NotConnectable(ShapeId),
}

/// Ids of the parts of one connector and the objects it links.
///
/// `from`/`to` are weak: the objects may disappear without the connector
/// being told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    pub line: ShapeId,
    pub head: ShapeId,
    pub from: ShapeId,
    pub to: ShapeId,
}

impl Connector {
    pub fn touches(&self, id: ShapeId) -> bool {
        self.from == id || self.to == id
    }
}

/// Arrowhead rotation in degrees for a line running `from` → `to`.
///
/// The triangle points up at 0°, hence the quarter-turn offset.
pub fn arrowhead_angle(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees() + 90.0
}

/// Tracks the connectors present on the surface.
#[derive(Debug, Clone, Default)]
pub struct ConnectorRegistry {
    connectors: Vec<Connector>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line and arrowhead between the centers of `from` and `to`.
    pub fn create(
        &mut self,
        document: &mut CanvasDocument,
        from: ShapeId,
        to: ShapeId,
    ) -> Result<Connector, ConnectorError> {
        if from == to {
            return Err(ConnectorError::SameEndpoint(from));
        }
        let from_center = endpoint_center(document, from)?;
        let to_center = endpoint_center(document, to)?;

        let line = ConnectorLine::new(from_center, to_center, from, to);
        let line_id = line.id;
        let head = ConnectorHead::new(line_id, to_center, arrowhead_angle(from_center, to_center));
        let head_id = head.id;

        document.add_shape(Shape::ConnectorLine(line));
        document.add_shape(Shape::ConnectorHead(head));

        let connector = Connector {
            line: line_id,
            head: head_id,
            from,
            to,
        };
        self.connectors.push(connector);
        log::debug!("connector {} created: {} -> {}", line_id, from, to);
        Ok(connector)
    }

    /// Recompute every connector attached to `moved`. Returns how many were updated.
    pub fn refresh_for(&self, document: &mut CanvasDocument, moved: ShapeId) -> usize {
        self.connectors
            .iter()
            .filter(|c| c.touches(moved))
            .filter(|c| refresh(document, c))
            .count()
    }

    /// Re-derive tracking from the connector parts present in `document`.
    ///
    /// Used after a snapshot restore, where object identities survive but the
    /// previous tracking state does not apply.
    pub fn rebuild(&mut self, document: &CanvasDocument) {
        self.connectors.clear();
        for shape in document.shapes_ordered() {
            let Shape::ConnectorHead(head) = shape else {
                continue;
            };
            if let Some(Shape::ConnectorLine(line)) = document.get_shape(head.line) {
                self.connectors.push(Connector {
                    line: line.id,
                    head: head.id,
                    from: line.from,
                    to: line.to,
                });
            }
        }
        log::debug!("connector registry rebuilt with {} entries", self.connectors.len());
    }

    /// Forget every connector.
    pub fn clear(&mut self) {
        self.connectors.clear();
    }

    /// Connectors whose parts or endpoints no longer exist.
    pub fn dangling(&self, document: &CanvasDocument) -> Vec<Connector> {
        self.connectors
            .iter()
            .filter(|c| !is_intact(document, c))
            .copied()
            .collect()
    }

    /// Stop tracking dangling connectors. Their parts stay on the surface with
    /// frozen geometry. Returns how many were dropped.
    pub fn prune_dangling(&mut self, document: &CanvasDocument) -> usize {
        let before = self.connectors.len();
        self.connectors.retain(|c| is_intact(document, c));
        before - self.connectors.len()
    }

    pub fn by_line(&self, line: ShapeId) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.line == line)
    }

    pub fn attached_to(&self, id: ShapeId) -> impl Iterator<Item = &Connector> + '_ {
        self.connectors.iter().filter(move |c| c.touches(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connector> + '_ {
        self.connectors.iter()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

fn endpoint_center(document: &CanvasDocument, id: ShapeId) -> Result<Point, ConnectorError> {
    let shape = document
        .get_shape(id)
        .ok_or(ConnectorError::UnknownObject(id))?;
    if !shape.is_selectable() {
        return Err(ConnectorError::NotConnectable(id));
    }
    Ok(shape.center())
}

fn is_intact(document: &CanvasDocument, connector: &Connector) -> bool {
    [connector.line, connector.head, connector.from, connector.to]
        .iter()
        .all(|id| document.contains(*id))
}

/// Recompute line endpoints and arrowhead placement from the current centers.
///
/// Missing endpoints leave the geometry untouched.
fn refresh(document: &mut CanvasDocument, connector: &Connector) -> bool {
    let centers = (
        document.get_shape(connector.from).map(Shape::center),
        document.get_shape(connector.to).map(Shape::center),
    );
    let (Some(from), Some(to)) = centers else {
        log::debug!("connector {} has a missing endpoint, geometry frozen", connector.line);
        return false;
    };

    if let Some(Shape::ConnectorLine(line)) = document.get_shape_mut(connector.line) {
        line.start = from;
        line.end = to;
    }
    if let Some(Shape::ConnectorHead(head)) = document.get_shape_mut(connector.head) {
        head.position = to;
        head.angle = arrowhead_angle(from, to);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Rectangle};
    use kurbo::{Affine, Vec2};

    fn setup() -> (CanvasDocument, ShapeId, ShapeId) {
        let mut doc = CanvasDocument::new();
        let a = doc.add_shape(Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0)));
        let b = doc.add_shape(Shape::Ellipse(Ellipse::circle(Point::new(300.0, 25.0), 50.0)));
        (doc, a, b)
    }

    fn line_of(doc: &CanvasDocument, connector: &Connector) -> ConnectorLine {
        match doc.get_shape(connector.line) {
            Some(Shape::ConnectorLine(line)) => line.clone(),
            other => panic!("expected connector line, got {other:?}"),
        }
    }

    fn head_of(doc: &CanvasDocument, connector: &Connector) -> ConnectorHead {
        match doc.get_shape(connector.head) {
            Some(Shape::ConnectorHead(head)) => head.clone(),
            other => panic!("expected connector head, got {other:?}"),
        }
    }

    #[test]
    fn test_angle() {
        assert!((arrowhead_angle(Point::ZERO, Point::new(10.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((arrowhead_angle(Point::ZERO, Point::new(0.0, 10.0)) - 180.0).abs() < 1e-9);
        assert!((arrowhead_angle(Point::ZERO, Point::new(0.0, -10.0)) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_create_uses_centers() {
        let (mut doc, a, b) = setup();
        let mut registry = ConnectorRegistry::new();
        let connector = registry.create(&mut doc, a, b).unwrap();

        let line = line_of(&doc, &connector);
        assert_eq!(line.start, Point::new(50.0, 25.0));
        assert_eq!(line.end, Point::new(300.0, 25.0));
        let head = head_of(&doc, &connector);
        assert_eq!(head.position, Point::new(300.0, 25.0));
        assert!((head.angle - 90.0).abs() < 1e-9);
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_moving_one_endpoint_recomputes_only_that_end() {
        let (mut doc, a, b) = setup();
        let mut registry = ConnectorRegistry::new();
        let connector = registry.create(&mut doc, a, b).unwrap();

        doc.get_shape_mut(a)
            .unwrap()
            .transform(Affine::translate(Vec2::new(0.0, 200.0)));
        assert_eq!(registry.refresh_for(&mut doc, a), 1);

        let line = line_of(&doc, &connector);
        assert_eq!(line.start, Point::new(50.0, 225.0));
        assert_eq!(line.end, Point::new(300.0, 25.0));
        let head = head_of(&doc, &connector);
        let expected = arrowhead_angle(Point::new(50.0, 225.0), Point::new(300.0, 25.0));
        assert!((head.angle - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        let (mut doc, a, _) = setup();
        let mut registry = ConnectorRegistry::new();
        assert_eq!(registry.create(&mut doc, a, a), Err(ConnectorError::SameEndpoint(a)));

        let missing = uuid::Uuid::new_v4();
        assert_eq!(
            registry.create(&mut doc, a, missing),
            Err(ConnectorError::UnknownObject(missing))
        );
        assert!(registry.is_empty());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_connector_parts_are_not_endpoints() {
        let (mut doc, a, b) = setup();
        let mut registry = ConnectorRegistry::new();
        let connector = registry.create(&mut doc, a, b).unwrap();
        assert_eq!(
            registry.create(&mut doc, a, connector.line),
            Err(ConnectorError::NotConnectable(connector.line))
        );
    }

    #[test]
    fn test_dangling_endpoint_is_tolerated() {
        let (mut doc, a, b) = setup();
        let mut registry = ConnectorRegistry::new();
        let connector = registry.create(&mut doc, a, b).unwrap();
        let before = line_of(&doc, &connector);

        doc.remove_shape(b);
        assert_eq!(registry.refresh_for(&mut doc, a), 0);
        assert_eq!(line_of(&doc, &connector), before);
        assert_eq!(registry.dangling(&doc), vec![connector]);

        assert_eq!(registry.prune_dangling(&doc), 1);
        assert!(registry.is_empty());
        assert!(doc.contains(connector.line));
    }

    #[test]
    fn test_rebuild_from_document() {
        let (mut doc, a, b) = setup();
        let mut registry = ConnectorRegistry::new();
        let connector = registry.create(&mut doc, a, b).unwrap();

        let mut fresh = ConnectorRegistry::new();
        fresh.rebuild(&doc);
        assert_eq!(fresh.iter().copied().collect::<Vec<_>>(), vec![connector]);
        assert_eq!(fresh.attached_to(b).count(), 1);
        assert_eq!(fresh.by_line(connector.line), Some(&connector));
    }
}
