//! Verbalit Core Library
//!
//! Platform-agnostic core of the Verbalit moodboard: the drawing surface with
//! its objects, tools, connectors and snapshot history, plus the journal,
//! auth session and inspiration panels that sit around it.

pub mod camera;
pub mod canvas;
pub mod command;
pub mod config;
pub mod connector;
pub mod history;
pub mod input;
pub mod journal;
pub mod panels;
pub mod session;
pub mod shapes;
pub mod storage;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasDocument, SurfaceError};
pub use command::{ObjectChange, StylePatch, SurfaceCommand, SurfaceEvent};
pub use config::SurfaceConfig;
pub use connector::{Connector, ConnectorError, ConnectorRegistry};
pub use history::{History, Snapshot};
pub use input::PointerEvent;
pub use journal::Journal;
pub use panels::{ImageSearchResult, Panel, Panels};
pub use session::{ApiError, AuthApi, AuthEnvelope, AuthSession, Notice};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use tools::{PenMode, ShapeChoice, ToolAction, ToolController, ToolKind};
