//! Host Collaborator Interfaces
//!
//! The placement engine never talks to an editing environment directly; it
//! goes through these traits. `TimelineHost` covers track/item/take creation
//! and cursor movement, `FileResolver` answers whether a clip label has a
//! backing source file, and `PauseDurationPrompt` supplies user-chosen pause
//! lengths before placement begins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Opaque handle to a host track. Valid for the lifetime of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackHandle(pub usize);

/// Opaque handle to a placed host item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle(pub usize);

/// Opaque handle to an item's take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TakeHandle(pub usize);

/// Track/item/take primitives of the hosting editor.
///
/// Creation is append-style: `create_track` has no position semantics, and
/// items are positioned after creation via `set_item_position`.
pub trait TimelineHost {
    fn create_track(&mut self, name: &str) -> Result<TrackHandle>;

    fn create_item(&mut self, track: TrackHandle) -> Result<ItemHandle>;
    fn set_item_position(&mut self, item: ItemHandle, seconds: f64) -> Result<()>;
    fn set_item_length(&mut self, item: ItemHandle, seconds: f64) -> Result<()>;
    fn set_item_mute(&mut self, item: ItemHandle, muted: bool) -> Result<()>;

    /// Returns the item's active take, creating one if it has none yet.
    fn create_take(&mut self, item: ItemHandle) -> Result<TakeHandle>;
    fn set_take_name(&mut self, take: TakeHandle, name: &str) -> Result<()>;
    fn set_take_source(&mut self, take: TakeHandle, source: &Path) -> Result<()>;

    /// Insert a media file on `track` at `position`; returns the new item and
    /// its natural length in seconds as determined by the host.
    fn insert_media(
        &mut self,
        track: TrackHandle,
        path: &Path,
        position: f64,
    ) -> Result<(ItemHandle, f64)>;

    fn cursor_position(&self) -> f64;
    fn set_cursor_position(&mut self, seconds: f64) -> Result<()>;

    /// Hint that the track layout changed and any UI should redraw.
    fn refresh_track_list(&mut self);
}

/// Resolves a clip label to its backing source file, if one exists.
pub trait FileResolver {
    fn resolve(&self, label: &str) -> Option<PathBuf>;
}

/// Supplies one duration per distinct pause kind, before placement starts.
pub trait PauseDurationPrompt {
    fn pause_lengths(&mut self, kinds: &[String]) -> Result<HashMap<String, f64>>;
}

/// A resolver over a fixed table, for callers that already know the answers.
impl FileResolver for HashMap<String, PathBuf> {
    fn resolve(&self, label: &str) -> Option<PathBuf> {
        self.get(label).cloned()
    }
}
