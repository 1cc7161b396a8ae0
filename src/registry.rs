//! Track Registry
//!
//! Maps track identifiers (performer names plus the reserved `_PAUSE` and
//! `_REPEAT` buckets) to host track handles. A track is created on first use
//! and reused for the rest of the run; there is no delete or rename.

use std::collections::HashMap;

use log::debug;

use crate::error::Result;
use crate::host::{TimelineHost, TrackHandle};

/// Reserved identifier for the track holding pause items.
pub const PAUSE_TRACK: &str = "_PAUSE";

/// Reserved identifier for the track holding repeat items.
pub const REPEAT_TRACK: &str = "_REPEAT";

/// Engine-owned registry of host tracks, keyed by identifier.
#[derive(Debug, Default)]
pub struct TrackRegistry {
    tracks: HashMap<String, TrackHandle>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handle for `id`, creating the host track on first sight.
    ///
    /// Creation names the track after its identifier and asks the host to
    /// refresh its track list. Subsequent calls return the stored handle with
    /// no host interaction.
    pub fn get_or_create<H: TimelineHost>(&mut self, host: &mut H, id: &str) -> Result<TrackHandle> {
        if let Some(&handle) = self.tracks.get(id) {
            return Ok(handle);
        }
        debug!("creating track {:?}", id);
        let handle = host.create_track(id)?;
        self.tracks.insert(id.to_string(), handle);
        host.refresh_track_list();
        Ok(handle)
    }

    /// Number of distinct tracks created so far.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
