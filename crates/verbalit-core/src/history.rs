//! Full-snapshot linear undo/redo.
//!
//! Every recorded mutation stores a complete serialized copy of the surface.
//! That is fine for moodboard-sized documents; a diff-based log would be the
//! next step for large ones.

use crate::shapes::{SerializableColor, Shape};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serialized body of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SnapshotBody {
    pub(crate) shapes: Vec<Shape>,
    pub(crate) background: Option<SerializableColor>,
}

/// Immutable serialized copy of all objects and the surface background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    json: Arc<str>,
}

impl Snapshot {
    /// Serialize objects (in order) and background into a snapshot.
    pub(crate) fn capture<'a>(
        shapes: impl Iterator<Item = &'a Shape>,
        background: Option<SerializableColor>,
    ) -> Result<Self, serde_json::Error> {
        let body = SnapshotBody {
            shapes: shapes.cloned().collect(),
            background,
        };
        Ok(Self {
            json: serde_json::to_string(&body)?.into(),
        })
    }

    pub(crate) fn body(&self) -> Result<SnapshotBody, serde_json::Error> {
        serde_json::from_str(&self.json)
    }

    /// The serialized form.
    pub fn as_json(&self) -> &str {
        &self.json
    }

    /// Number of bytes the snapshot occupies.
    pub fn byte_len(&self) -> usize {
        self.json.len()
    }
}

/// Ordered snapshots plus the redo sequence.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that drops its oldest entries past `limit` snapshots.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.max(1)),
            ..Self::default()
        }
    }

    /// Append a snapshot and clear the redo sequence.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.entries.push(snapshot);
        self.redo.clear();

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
            }
        }
        log::debug!(
            "history: recorded snapshot #{} ({} bytes)",
            self.entries.len(),
            self.entries.last().map_or(0, Snapshot::byte_len)
        );
    }

    /// Step back. Returns the snapshot the surface must be restored to.
    ///
    /// No-op (returns `None`) when fewer than two snapshots exist.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.entries.len() < 2 {
            return None;
        }
        let current = self.entries.pop()?;
        self.redo.push(current);
        self.entries.last()
    }

    /// Step forward. Returns the snapshot the surface must be restored to.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let snapshot = self.redo.pop()?;
        self.entries.push(snapshot);
        self.entries.last()
    }

    pub fn can_undo(&self) -> bool {
        self.entries.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of snapshots in the history sequence.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Most recent snapshot, i.e. the state the surface should be in.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }
}
