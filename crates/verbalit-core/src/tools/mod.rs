//! Tool system for the moodboard.
//!
//! The controller only tracks which tool is active and the pointer gesture
//! in progress. It never touches the document; the canvas turns its answers
//! into commands.

pub mod factory;

use crate::shapes::{CompositeMode, SerializableColor, ShapeId, ShapeStyle};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Freehand brush presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenMode {
    #[default]
    Pen,
    Marker,
    Highlighter,
    Eraser,
}

impl PenMode {
    pub fn brush(self) -> Brush {
        match self {
            PenMode::Pen => Brush::solid(SerializableColor::black(), 3.0),
            PenMode::Marker => Brush::solid(SerializableColor::new(0, 0, 255, 255), 10.0),
            PenMode::Highlighter => Brush {
                opacity: 0.3,
                ..Brush::solid(SerializableColor::new(255, 255, 0, 255), 20.0)
            },
            PenMode::Eraser => Brush {
                composite: CompositeMode::DestinationOut,
                ..Brush::solid(SerializableColor::white(), 20.0)
            },
        }
    }
}

/// Stroke settings applied to new freehand objects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: SerializableColor,
    pub width: f64,
    pub opacity: f64,
    pub composite: CompositeMode,
}

impl Brush {
    fn solid(color: SerializableColor, width: f64) -> Self {
        Self {
            color,
            width,
            opacity: 1.0,
            composite: CompositeMode::SourceOver,
        }
    }

    pub fn style(&self) -> ShapeStyle {
        ShapeStyle {
            stroke_color: self.color,
            stroke_width: self.width,
            fill_color: None,
            opacity: self.opacity,
            composite: self.composite,
        }
    }
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Pen { mode: PenMode },
    /// Shape picker is open; the surface still behaves like select.
    ShapePending,
    /// Waiting for the source (`from: None`) or the target of a connector.
    ArrowPending { from: Option<ShapeId> },
}

impl ToolKind {
    /// Whether pointer-down picks objects.
    pub fn picks_objects(&self) -> bool {
        matches!(
            self,
            ToolKind::Select | ToolKind::ShapePending | ToolKind::ArrowPending { .. }
        )
    }
}

/// Shapes offered by the shape picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeChoice {
    Rectangle,
    Square,
    Circle,
}

/// Outcome of picking an object while arrow mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowStep {
    /// Not in arrow mode.
    Ignored,
    /// First object remembered as the source.
    Source(ShapeId),
    /// Second distinct object picked; arrow mode is over.
    Connect { from: ShapeId, to: ShapeId },
    /// Source picked twice; arrow mode is over.
    Cancelled,
}

/// Toolbar and keyboard actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ToolAction {
    Select,
    Pan,
    TogglePen,
    SetPenMode { mode: PenMode },
    OpenShapes,
    ChooseShape { shape: ShapeChoice },
    AddText,
    AddNote,
    StartArrow,
    /// Programmatic pick, same as clicking the object.
    SelectObject { id: Option<ShapeId> },
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Undo,
    Redo,
    Clear,
    SetBackground { color: Option<SerializableColor> },
    ToggleBold,
    TextColor { color: SerializableColor },
    TextBackground { color: Option<SerializableColor> },
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Last pointer position in screen coordinates.
    Panning { last: Point },
    /// Points in world coordinates.
    Stroke { points: Vec<Point> },
    Dragging {
        id: ShapeId,
        last: Point,
        moved: bool,
    },
}

/// Active tool plus the state of the current pointer gesture.
#[derive(Debug, Clone, Default)]
pub struct ToolController {
    current: ToolKind,
    pen_options_open: bool,
    gesture: Gesture,
}

impl ToolController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ToolKind {
        self.current
    }

    /// Brush used for new strokes, if a pen is active.
    pub fn brush(&self) -> Option<Brush> {
        match self.current {
            ToolKind::Pen { mode } => Some(mode.brush()),
            _ => None,
        }
    }

    pub fn pen_options_open(&self) -> bool {
        self.pen_options_open
    }

    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    fn switch(&mut self, tool: ToolKind) {
        if self.current != tool {
            log::debug!("tool: {:?} -> {:?}", self.current, tool);
        }
        self.current = tool;
        self.gesture = Gesture::Idle;
    }

    pub fn select(&mut self) {
        self.switch(ToolKind::Select);
        self.pen_options_open = false;
    }

    pub fn pan(&mut self) {
        self.switch(ToolKind::Pan);
        self.pen_options_open = false;
    }

    /// Enter pen mode, or toggle its options popup if already drawing.
    pub fn toggle_pen(&mut self) {
        if let ToolKind::Pen { .. } = self.current {
            self.pen_options_open = !self.pen_options_open;
        } else {
            self.switch(ToolKind::Pen {
                mode: PenMode::default(),
            });
            self.pen_options_open = true;
        }
    }

    pub fn set_pen_mode(&mut self, mode: PenMode) {
        self.switch(ToolKind::Pen { mode });
        self.pen_options_open = false;
    }

    pub fn open_shapes(&mut self) {
        self.switch(ToolKind::ShapePending);
        self.pen_options_open = false;
    }

    /// Close the shape picker after a choice.
    pub fn shape_chosen(&mut self) {
        self.select();
    }

    pub fn start_arrow(&mut self) {
        self.switch(ToolKind::ArrowPending { from: None });
        self.pen_options_open = false;
    }

    /// Feed a picked object to arrow mode.
    pub fn pick_for_arrow(&mut self, id: ShapeId) -> ArrowStep {
        let ToolKind::ArrowPending { from } = self.current else {
            return ArrowStep::Ignored;
        };
        match from {
            None => {
                self.current = ToolKind::ArrowPending { from: Some(id) };
                ArrowStep::Source(id)
            }
            Some(from) if from == id => {
                self.select();
                ArrowStep::Cancelled
            }
            Some(from) => {
                self.select();
                ArrowStep::Connect { from, to: id }
            }
        }
    }

    /// Forget a remembered arrow source, e.g. after the surface was restored.
    pub fn reset_arrow_source(&mut self) {
        if let ToolKind::ArrowPending { from: Some(_) } = self.current {
            self.current = ToolKind::ArrowPending { from: None };
        }
    }

    pub fn begin_pan(&mut self, screen: Point) {
        if self.current == ToolKind::Pan {
            self.gesture = Gesture::Panning { last: screen };
        }
    }

    /// Raw screen-space movement since the previous pan event.
    pub fn pan_delta(&mut self, screen: Point) -> Option<Vec2> {
        match &mut self.gesture {
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                Some(delta)
            }
            _ => None,
        }
    }

    pub fn end_pan(&mut self) -> bool {
        if let Gesture::Panning { .. } = self.gesture {
            self.gesture = Gesture::Idle;
            true
        } else {
            false
        }
    }

    pub fn begin_stroke(&mut self, world: Point) {
        if let ToolKind::Pen { .. } = self.current {
            self.gesture = Gesture::Stroke {
                points: vec![world],
            };
        }
    }

    pub fn extend_stroke(&mut self, world: Point) -> bool {
        match &mut self.gesture {
            Gesture::Stroke { points } => {
                points.push(world);
                true
            }
            _ => false,
        }
    }

    /// Finish the stroke. Strokes shorter than two points are discarded.
    pub fn finish_stroke(&mut self) -> Option<Vec<Point>> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Stroke { points } => (points.len() >= 2).then_some(points),
            other => {
                self.gesture = other;
                None
            }
        }
    }

    pub fn begin_drag(&mut self, id: ShapeId, world: Point) {
        if self.current.picks_objects() {
            self.gesture = Gesture::Dragging {
                id,
                last: world,
                moved: false,
            };
        }
    }

    /// World-space step for the dragged object.
    pub fn drag_to(&mut self, world: Point) -> Option<(ShapeId, Vec2)> {
        match &mut self.gesture {
            Gesture::Dragging { id, last, moved } => {
                let delta = world - *last;
                *last = world;
                if delta == Vec2::ZERO {
                    return None;
                }
                *moved = true;
                Some((*id, delta))
            }
            _ => None,
        }
    }

    /// Release. Returns the object when it actually moved.
    pub fn end_drag(&mut self) -> Option<ShapeId> {
        match self.gesture {
            Gesture::Dragging { id, moved, .. } => {
                self.gesture = Gesture::Idle;
                moved.then_some(id)
            }
            _ => None,
        }
    }

    /// Drop any gesture in progress.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }
}
