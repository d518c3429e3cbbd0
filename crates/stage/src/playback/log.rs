//! Ring-buffer log of recently published snapshots.
//!
//! The [`PlaybackLog`] resource keeps the last 64 entries so callers (the
//! agent protocol, tests) can see what played without subscribing to events.

use bevy::prelude::*;
use serde::Serialize;

use crate::sprite::{SpriteId, SpriteVisualState};

/// Maximum number of entries retained in the ring buffer.
const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StepKind {
    Committed { index: usize, action: String },
    MessageCleared,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackLogEntry {
    pub sprite: SpriteId,
    pub at_ms: u64,
    pub kind: StepKind,
    pub state: SpriteVisualState,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PlaybackLog {
    entries: Vec<PlaybackLogEntry>,
}

impl PlaybackLog {
    /// Record an entry, evicting the oldest when full.
    pub fn push(&mut self, entry: PlaybackLogEntry) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    /// Return the last `n` entries (or fewer if the log is shorter).
    pub fn last_n(&self, n: usize) -> &[PlaybackLogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Entries for one sprite, oldest first.
    pub fn for_sprite(&self, sprite: SpriteId) -> impl Iterator<Item = &PlaybackLogEntry> {
        self.entries.iter().filter(move |e| e.sprite == sprite)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
