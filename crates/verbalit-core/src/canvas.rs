//! Canvas document and state management.

use crate::camera::Camera;
use crate::command::{ObjectChange, SurfaceCommand, SurfaceEvent};
use crate::config::SurfaceConfig;
use crate::connector::{Connector, ConnectorError, ConnectorRegistry};
use crate::history::{History, Snapshot};
use crate::input::PointerEvent;
use crate::shapes::{Freehand, ImageError, SerializableColor, Shape, ShapeId, Text};
use crate::tools::{factory, ArrowStep, ShapeChoice, ToolAction, ToolController, ToolKind};
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by surface mutations.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Object not found: {0}")]
    UnknownObject(ShapeId),
    #[error("Object already on the surface: {0}")]
    DuplicateObject(ShapeId),
    #[error("Object {0} has no text")]
    NotText(ShapeId),
    #[error("Invalid size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// All objects on the surface plus its background.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// Surface background color (None = default).
    #[serde(default)]
    pub background: Option<SerializableColor>,
    /// All objects, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Insertion order (back to front).
    z_order: Vec<ShapeId>,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            background: None,
            shapes: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    /// Add an object on top. Re-adding an existing id replaces it in place.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
        id
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    /// Remove every object. The background is left alone.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
    }

    /// Swap in a new set of objects, keeping their order.
    pub fn replace_contents(&mut self, shapes: Vec<Shape>, background: Option<SerializableColor>) {
        self.clear();
        for shape in shapes {
            self.add_shape(shape);
        }
        self.background = background;
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Objects in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn z_order(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Get the bounding box of all objects.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .values()
            .map(Shape::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Selectable objects under a point (world coordinates), topmost first.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|&id| {
                self.shapes
                    .get(&id)
                    .filter(|s| s.is_selectable() && s.hit_test(point, tolerance))
                    .map(|_| id)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The moodboard surface: document, view, tools, history and connectors.
///
/// Every document mutation goes through [`Canvas::apply`], which feeds the
/// resulting events to the connector registry and then to the history.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Camera for view transform.
    pub camera: Camera,
    pub tools: ToolController,
    pub config: SurfaceConfig,
    history: History,
    connectors: ConnectorRegistry,
    selection: Option<ShapeId>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a canvas with the default config and viewport.
    pub fn new() -> Self {
        Self::with_config(SurfaceConfig::default(), Size::new(1280.0, 800.0))
    }

    /// Create an empty canvas. The empty state is the first history entry.
    pub fn with_config(config: SurfaceConfig, viewport: Size) -> Self {
        let mut canvas = Self {
            document: CanvasDocument::new(),
            camera: Camera::new(&config, viewport),
            tools: ToolController::new(),
            history: History::with_limit(config.history_limit),
            connectors: ConnectorRegistry::new(),
            selection: None,
            config,
        };
        if let Err(err) = canvas.record_snapshot() {
            log::error!("failed to record initial snapshot: {}", err);
        }
        canvas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn connectors(&self) -> &ConnectorRegistry {
        &self.connectors
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply one command and run the event observers.
    pub fn apply(&mut self, command: SurfaceCommand) -> Result<Vec<SurfaceEvent>, SurfaceError> {
        let events = self.execute(command)?;
        for event in &events {
            self.observe(*event)?;
        }
        Ok(events)
    }

    fn execute(&mut self, command: SurfaceCommand) -> Result<Vec<SurfaceEvent>, SurfaceError> {
        match command {
            SurfaceCommand::Add { shape } => {
                if self.document.contains(shape.id()) {
                    return Err(SurfaceError::DuplicateObject(shape.id()));
                }
                let id = self.document.add_shape(shape);
                Ok(vec![SurfaceEvent::Added(id)])
            }
            SurfaceCommand::AddConnector { from, to } => {
                let connector = self.connectors.create(&mut self.document, from, to)?;
                Ok(vec![SurfaceEvent::Added(connector.line)])
            }
            SurfaceCommand::Move { id, delta } => {
                self.shape_mut(id)?.translate(delta);
                Ok(vec![SurfaceEvent::Moving(id)])
            }
            SurfaceCommand::Commit { id } => {
                self.shape_mut(id)?;
                Ok(vec![SurfaceEvent::Modified(id)])
            }
            SurfaceCommand::Update { id, change } => {
                apply_change(self.shape_mut(id)?, id, change)?;
                Ok(vec![SurfaceEvent::Modified(id)])
            }
            SurfaceCommand::SetBackground { color } => {
                self.document.background = color;
                Ok(vec![SurfaceEvent::BackgroundChanged])
            }
        }
    }

    fn observe(&mut self, event: SurfaceEvent) -> Result<(), SurfaceError> {
        if let Some(id) = event.moved_object() {
            self.connectors.refresh_for(&mut self.document, id);
        }
        if event.is_recorded() {
            self.record_snapshot()?;
        }
        Ok(())
    }

    fn shape_mut(&mut self, id: ShapeId) -> Result<&mut Shape, SurfaceError> {
        self.document
            .get_shape_mut(id)
            .ok_or(SurfaceError::UnknownObject(id))
    }

    /// Append a snapshot of the current document to the history.
    pub fn record_snapshot(&mut self) -> Result<(), SurfaceError> {
        let snapshot = Snapshot::capture(self.document.shapes_ordered(), self.document.background)?;
        self.history.record(snapshot);
        Ok(())
    }

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, SurfaceError> {
        let Some(snapshot) = self.history.undo().cloned() else {
            return Ok(false);
        };
        self.restore(&snapshot)?;
        Ok(true)
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, SurfaceError> {
        let Some(snapshot) = self.history.redo().cloned() else {
            return Ok(false);
        };
        self.restore(&snapshot)?;
        Ok(true)
    }

    /// Replace the surface contents with a snapshot without recording.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        let body = snapshot.body()?;
        self.document.replace_contents(body.shapes, body.background);
        self.connectors.rebuild(&self.document);
        self.tools.cancel();
        self.tools.reset_arrow_source();
        if self.selection.is_some_and(|id| !self.document.contains(id)) {
            self.selection = None;
        }
        log::debug!("surface restored ({} objects)", self.document.len());
        Ok(())
    }

    /// Empty the surface. The pre-clear state is recorded first so the clear
    /// can be undone.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        self.record_snapshot()?;
        self.document.clear();
        self.document.background = None;
        self.connectors.clear();
        self.tools.cancel();
        self.tools.reset_arrow_source();
        self.selection = None;
        log::info!("surface cleared");
        Ok(())
    }

    /// Connectors whose endpoints or parts have disappeared.
    pub fn dangling_connectors(&self) -> Vec<Connector> {
        self.connectors.dangling(&self.document)
    }

    pub fn prune_dangling_connectors(&mut self) -> usize {
        self.connectors.prune_dangling(&self.document)
    }

    /// Add an object at the top of the stack.
    pub fn add_shape(&mut self, shape: Shape) -> Result<ShapeId, SurfaceError> {
        let id = shape.id();
        self.apply(SurfaceCommand::Add { shape })?;
        Ok(id)
    }

    pub fn add_text(&mut self) -> Result<ShapeId, SurfaceError> {
        self.add_shape(factory::text(self.config.surface_center()))
    }

    pub fn add_note(&mut self) -> Result<ShapeId, SurfaceError> {
        self.add_shape(factory::note(self.config.surface_center()))
    }

    /// Add the picked shape and close the shape picker.
    pub fn choose_shape(&mut self, choice: ShapeChoice) -> Result<ShapeId, SurfaceError> {
        self.tools.shape_chosen();
        self.add_shape(factory::shape(choice, self.config.surface_center()))
    }

    /// Insert an encoded image, shrunk to fit the surface.
    pub fn add_image(&mut self, data: &[u8], width: u32, height: u32) -> Result<ShapeId, SurfaceError> {
        let shape = factory::image(
            self.config.surface_center(),
            data,
            width,
            height,
            (self.config.virtual_width, self.config.virtual_height),
            self.config.image_margin,
        )?;
        self.add_shape(shape)
    }

    /// Link two objects with an arrow.
    pub fn connect(&mut self, from: ShapeId, to: ShapeId) -> Result<Connector, SurfaceError> {
        let events = self.apply(SurfaceCommand::AddConnector { from, to })?;
        let line = events
            .iter()
            .find_map(|event| match event {
                SurfaceEvent::Added(id) => Some(*id),
                _ => None,
            })
            .ok_or(SurfaceError::UnknownObject(to))?;
        self.connectors
            .by_line(line)
            .copied()
            .ok_or(SurfaceError::UnknownObject(line))
    }

    /// Pick an object (or nothing). In arrow mode this feeds the arrow flow.
    ///
    /// An arrow source that has left the surface is forgotten, so the pick
    /// becomes the new source.
    pub fn select_object(&mut self, id: Option<ShapeId>) -> Result<(), SurfaceError> {
        let Some(id) = id else {
            self.selection = None;
            return Ok(());
        };
        if !self.document.contains(id) {
            return Err(SurfaceError::UnknownObject(id));
        }
        if let ToolKind::ArrowPending { from: Some(from) } = self.tools.current() {
            if !self.document.contains(from) {
                log::debug!("arrow source {} is gone", from);
                self.tools.reset_arrow_source();
            }
        }

        let step = self.tools.pick_for_arrow(id);
        self.selection = Some(id);
        match step {
            ArrowStep::Connect { from, to } => {
                self.connect(from, to)?;
            }
            ArrowStep::Cancelled => log::debug!("arrow cancelled"),
            ArrowStep::Source(_) | ArrowStep::Ignored => {}
        }
        Ok(())
    }

    /// Selected object if it carries editable text.
    fn selected_text(&self) -> Option<ShapeId> {
        self.selection.filter(|id| {
            matches!(
                self.document.get_shape(*id),
                Some(Shape::Text(_) | Shape::Note(_))
            )
        })
    }

    /// Apply a text change to the selection. Returns false when no text is selected.
    fn update_selected_text(&mut self, change: ObjectChange) -> Result<bool, SurfaceError> {
        let Some(id) = self.selected_text() else {
            return Ok(false);
        };
        self.apply(SurfaceCommand::Update { id, change })?;
        Ok(true)
    }

    pub fn toggle_bold(&mut self) -> Result<bool, SurfaceError> {
        self.update_selected_text(ObjectChange::ToggleBold)
    }

    pub fn set_text_color(&mut self, color: SerializableColor) -> Result<bool, SurfaceError> {
        self.update_selected_text(ObjectChange::TextColor { color })
    }

    pub fn set_text_background(
        &mut self,
        color: Option<SerializableColor>,
    ) -> Result<bool, SurfaceError> {
        self.update_selected_text(ObjectChange::TextBackground { color })
    }

    /// Handle a toolbar action.
    pub fn handle_action(&mut self, action: ToolAction) -> Result<(), SurfaceError> {
        log::debug!("action: {:?}", action);
        match action {
            ToolAction::Select => self.tools.select(),
            ToolAction::Pan => self.tools.pan(),
            ToolAction::TogglePen => self.tools.toggle_pen(),
            ToolAction::SetPenMode { mode } => self.tools.set_pen_mode(mode),
            ToolAction::OpenShapes => self.tools.open_shapes(),
            ToolAction::ChooseShape { shape } => {
                self.choose_shape(shape)?;
            }
            ToolAction::AddText => {
                self.add_text()?;
            }
            ToolAction::AddNote => {
                self.add_note()?;
            }
            ToolAction::StartArrow => {
                self.tools.start_arrow();
                self.selection = None;
            }
            ToolAction::SelectObject { id } => self.select_object(id)?,
            ToolAction::ZoomIn => self.camera.zoom_in(self.config.zoom_step),
            ToolAction::ZoomOut => self.camera.zoom_out(self.config.zoom_step),
            ToolAction::ResetZoom => self.camera.reset_zoom(),
            ToolAction::Undo => {
                self.undo()?;
            }
            ToolAction::Redo => {
                self.redo()?;
            }
            ToolAction::Clear => self.clear()?,
            ToolAction::SetBackground { color } => {
                self.apply(SurfaceCommand::SetBackground { color })?;
            }
            ToolAction::ToggleBold => {
                self.toggle_bold()?;
            }
            ToolAction::TextColor { color } => {
                self.set_text_color(color)?;
            }
            ToolAction::TextBackground { color } => {
                self.set_text_background(color)?;
            }
        }
        Ok(())
    }

    /// Handle a pointer event in screen coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<(), SurfaceError> {
        match event {
            PointerEvent::Wheel { position, delta_y } => {
                self.camera
                    .zoom_wheel(position, delta_y, self.config.wheel_base);
            }
            PointerEvent::Down { position } => {
                let world = self.camera.screen_to_world(position);
                match self.tools.current() {
                    ToolKind::Pan => self.tools.begin_pan(position),
                    ToolKind::Pen { .. } => self.tools.begin_stroke(world),
                    tool => {
                        let arrow = matches!(tool, ToolKind::ArrowPending { .. });
                        let hit = self
                            .document
                            .shapes_at_point(world, self.config.hit_tolerance / self.camera.zoom)
                            .first()
                            .copied();
                        self.select_object(hit)?;
                        if let Some(id) = hit.filter(|_| !arrow) {
                            self.tools.begin_drag(id, world);
                        }
                    }
                }
            }
            PointerEvent::Move { position } => {
                let world = self.camera.screen_to_world(position);
                if let Some(delta) = self.tools.pan_delta(position) {
                    self.camera.pan(delta);
                } else if !self.tools.extend_stroke(world) {
                    if let Some((id, delta)) = self.tools.drag_to(world) {
                        self.apply(SurfaceCommand::Move { id, delta })?;
                    }
                }
            }
            PointerEvent::Up { position } => {
                let world = self.camera.screen_to_world(position);
                if let Some(delta) = self.tools.pan_delta(position) {
                    self.camera.pan(delta);
                    self.tools.end_pan();
                } else if self.tools.extend_stroke(world) {
                    self.finish_stroke()?;
                } else {
                    if let Some((id, delta)) = self.tools.drag_to(world) {
                        self.apply(SurfaceCommand::Move { id, delta })?;
                    }
                    if let Some(id) = self.tools.end_drag() {
                        self.apply(SurfaceCommand::Commit { id })?;
                    }
                }
            }
        }
        Ok(())
    }

    fn finish_stroke(&mut self) -> Result<(), SurfaceError> {
        let (Some(points), Some(brush)) = (self.tools.finish_stroke(), self.tools.brush()) else {
            return Ok(());
        };
        let stroke = Freehand::from_points(points).with_style(brush.style());
        self.add_shape(Shape::Freehand(stroke))?;
        Ok(())
    }
}

/// Apply an edit to one object.
fn apply_change(shape: &mut Shape, id: ShapeId, change: ObjectChange) -> Result<(), SurfaceError> {
    match change {
        ObjectChange::Translate { delta } => shape.translate(delta),
        ObjectChange::Resize { width, height } => {
            let bounds = shape.bounds();
            if !(width > 0.0 && height > 0.0) || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
                return Err(SurfaceError::InvalidSize { width, height });
            }
            match shape {
                // Connector geometry is derived from the endpoints.
                Shape::ConnectorLine(_) | Shape::ConnectorHead(_) => {
                    return Err(SurfaceError::InvalidSize { width, height });
                }
                // Auto-sized text gets a fixed box so the width sticks.
                Shape::Text(text) if text.box_width.is_none() => {
                    text.box_width = Some(bounds.width());
                }
                _ => {}
            }
            let origin = bounds.origin().to_vec2();
            shape.transform(
                Affine::translate(origin)
                    * Affine::scale_non_uniform(width / bounds.width(), height / bounds.height())
                    * Affine::translate(-origin),
            );
        }
        ObjectChange::Restyle { patch } => patch.apply(shape.style_mut()),
        ObjectChange::ToggleBold => {
            let text = text_of(shape, id)?;
            text.font_weight = text.font_weight.toggled();
        }
        ObjectChange::TextColor { color } => text_of(shape, id)?.style.fill_color = Some(color),
        ObjectChange::TextBackground { color } => text_of(shape, id)?.background_color = color,
        ObjectChange::SetText { content } => text_of(shape, id)?.content = content,
    }
    Ok(())
}

/// Editable text of an object: the text itself or a note's label.
fn text_of(shape: &mut Shape, id: ShapeId) -> Result<&mut Text, SurfaceError> {
    match shape {
        Shape::Text(text) => Ok(text),
        Shape::Note(note) => Ok(&mut note.label),
        _ => Err(SurfaceError::NotText(id)),
    }
}
