//! Commands accepted by the single surface-mutation entry point, and the
//! events they produce.

use crate::shapes::{SerializableColor, Shape, ShapeId, ShapeStyle};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// A mutation request for [`crate::Canvas::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SurfaceCommand {
    /// Place a new object on top of the stack.
    Add { shape: Shape },
    /// Link two objects with a line + arrowhead.
    AddConnector { from: ShapeId, to: ShapeId },
    /// Live drag step. Connectors follow; history does not record.
    Move { id: ShapeId, delta: Vec2 },
    /// End of a direct manipulation (drag release).
    Commit { id: ShapeId },
    /// Programmatic edit of one object.
    Update { id: ShapeId, change: ObjectChange },
    SetBackground { color: Option<SerializableColor> },
}

/// Edits carried by [`SurfaceCommand::Update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ObjectChange {
    /// Move and commit in one step.
    Translate { delta: Vec2 },
    /// Scale the object so its bounds become `width` × `height`.
    Resize { width: f64, height: f64 },
    Restyle { patch: StylePatch },
    ToggleBold,
    TextColor { color: SerializableColor },
    TextBackground { color: Option<SerializableColor> },
    SetText { content: String },
}

/// Partial style update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    /// `Some(None)` removes the fill.
    pub fill: Option<Option<SerializableColor>>,
    pub stroke_color: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
}

impl StylePatch {
    pub fn apply(&self, style: &mut ShapeStyle) {
        if let Some(fill) = self.fill {
            style.fill_color = fill;
        }
        if let Some(stroke) = self.stroke_color {
            style.stroke_color = stroke;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width.max(0.0);
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

/// What happened to the surface as the result of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Added(ShapeId),
    Moving(ShapeId),
    Modified(ShapeId),
    BackgroundChanged,
}

impl SurfaceEvent {
    /// Events that take a history snapshot.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, SurfaceEvent::Moving(_))
    }

    /// Object whose movement connectors must follow.
    pub fn moved_object(&self) -> Option<ShapeId> {
        match self {
            SurfaceEvent::Moving(id) | SurfaceEvent::Modified(id) => Some(*id),
            SurfaceEvent::Added(_) | SurfaceEvent::BackgroundChanged => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_patch_partial() {
        let mut style = ShapeStyle::default();
        let patch = StylePatch {
            fill: Some(Some(SerializableColor::white())),
            opacity: Some(3.0),
            ..StylePatch::default()
        };
        patch.apply(&mut style);
        assert_eq!(style.fill_color, Some(SerializableColor::white()));
        assert!((style.opacity - 1.0).abs() < f64::EPSILON);
        assert!((style.stroke_width - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_only_moving_skips_history() {
        let id = uuid::Uuid::new_v4();
        assert!(!SurfaceEvent::Moving(id).is_recorded());
        assert!(SurfaceEvent::Modified(id).is_recorded());
        assert!(SurfaceEvent::Added(id).is_recorded());
        assert_eq!(SurfaceEvent::Added(id).moved_object(), None);
    }

    #[test]
    fn test_command_json_shape() {
        let json = r#"{ "command": "commit", "id": "67e55044-10b1-426f-9247-bb680e5fe0c8" }"#;
        let command: SurfaceCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(command, SurfaceCommand::Commit { .. }));
    }
}
