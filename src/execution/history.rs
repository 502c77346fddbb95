//! Undo/redo history of rendered images.

use image::RgbImage;
use std::collections::VecDeque;

/// Default number of snapshots kept.
pub const DEFAULT_CAPACITY: usize = 50;

/// Linear history with a cursor.
///
/// Invariant: when non-empty, `position < len`. Committing truncates any
/// entries after the cursor. Entry 0 is the original and is never evicted;
/// exceeding the capacity drops the oldest edit after it.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<RgbImage>,
    position: usize,
    capacity: usize,
}

impl History {
    /// Empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// History holding at most `capacity` snapshots, the original included
    /// (at least two).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            position: 0,
            capacity: capacity.max(2),
        }
    }

    /// Record a new state. Returns `false` without changing anything when
    /// the image is pixel-identical to the current entry.
    pub fn commit(&mut self, image: RgbImage) -> bool {
        if self.current() == Some(&image) {
            return false;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.position + 1);
        }
        self.entries.push_back(image);
        if self.entries.len() > self.capacity {
            self.entries.remove(1);
        }
        self.position = self.entries.len() - 1;
        log::debug!("History commit: {}/{}", self.position + 1, self.entries.len());
        true
    }

    /// Step back. Returns the new current entry, or `None` at the start.
    pub fn undo(&mut self) -> Option<&RgbImage> {
        if !self.can_undo() {
            return None;
        }
        self.position -= 1;
        log::debug!("Undo to {}/{}", self.position + 1, self.entries.len());
        self.entries.get(self.position)
    }

    /// Step forward. Returns the new current entry, or `None` at the end.
    pub fn redo(&mut self) -> Option<&RgbImage> {
        if !self.can_redo() {
            return None;
        }
        self.position += 1;
        log::debug!("Redo to {}/{}", self.position + 1, self.entries.len());
        self.entries.get(self.position)
    }

    /// Replace everything with a single entry.
    pub fn reset(&mut self, original: RgbImage) {
        self.entries.clear();
        self.entries.push_back(original);
        self.position = 0;
    }

    /// The entry at the cursor.
    pub fn current(&self) -> Option<&RgbImage> {
        self.entries.get(self.position)
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor index; entry 0 is the original.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Maximum number of snapshots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the cursor can step back.
    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    /// Whether the cursor can step forward.
    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.entries.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
