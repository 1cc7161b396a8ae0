//! Placement Engine
//!
//! Walks the specification in document order, classifies each component
//! token, resolves it to a target track, places an item at the shared cursor
//! and advances the cursor by the item's length.
//!
//! The cursor is a single value threaded through the whole run: it is never
//! reset at disc or track boundaries, so the session is one linear timeline.
//! The previous-item reference used by repeat tokens IS track-local and is
//! cleared at the start of every track.

use std::collections::HashMap;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::availability::AvailabilityTracker;
use crate::component::Component;
use crate::error::{Result, SplicerError};
use crate::host::{FileResolver, ItemHandle, TimelineHost};
use crate::registry::{TrackRegistry, PAUSE_TRACK, REPEAT_TRACK};
use crate::spec::Specification;

/// Placeholder length, in seconds, for pauses without a table entry and for
/// clips whose source file is missing.
pub const DEFAULT_LENGTH: f64 = 1.0;

/// Record of one placed timeline item.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub item: ItemHandle,
    pub track_id: String,
    pub position: f64,
    pub length: f64,
    pub label: String,
    pub muted: bool,
    pub source: Option<PathBuf>,
}

/// The placement engine. One instance per run; owns the track registry, the
/// pause-length table and the availability tracker, and borrows the host and
/// resolver collaborators.
pub struct PlacementEngine<'a, H: TimelineHost, R: FileResolver> {
    host: &'a mut H,
    resolver: &'a R,
    registry: TrackRegistry,
    pause_lengths: HashMap<String, f64>,
    availability: AvailabilityTracker,
    cursor: f64,
}

impl<'a, H: TimelineHost, R: FileResolver> PlacementEngine<'a, H, R> {
    /// Create an engine starting at the host's current edit cursor.
    ///
    /// `pause_lengths` must already cover the kinds the user was prompted
    /// for; unknown kinds fall back to [`DEFAULT_LENGTH`].
    pub fn new(host: &'a mut H, resolver: &'a R, pause_lengths: HashMap<String, f64>) -> Self {
        let cursor = host.cursor_position();
        Self {
            host,
            resolver,
            registry: TrackRegistry::new(),
            pause_lengths,
            availability: AvailabilityTracker::new(),
            cursor,
        }
    }

    /// Place every component of the specification, in document order.
    ///
    /// Null tracks are skipped with no cursor effect. Returns the placed
    /// items in placement order. Fails fast on a repeat token at the start
    /// of a track; everything placed before the failure stays in the host.
    pub fn render(&mut self, spec: &Specification) -> Result<Vec<PlacedItem>> {
        let mut placed = Vec::with_capacity(spec.component_count());
        for disc in &spec.discs {
            debug!("placing disc {:?}", disc.name);
            for (track_index, track) in disc.tracks.iter().enumerate() {
                let components = match track {
                    Some(components) => components,
                    None => continue,
                };
                // Repeat context does not cross track boundaries.
                let mut prev_item: Option<PlacedItem> = None;
                for token in components {
                    let item = self
                        .place(token, prev_item.as_ref())
                        .map_err(|e| locate(e, &disc.name, track_index))?;
                    self.host.set_cursor_position(self.cursor)?;
                    placed.push(item.clone());
                    prev_item = Some(item);
                }
            }
        }
        info!(
            "placed {} items across {} tracks, cursor at {:.3}s",
            placed.len(),
            self.registry.len(),
            self.cursor
        );
        Ok(placed)
    }

    /// Place a single component at the current cursor and advance it.
    ///
    /// `prev_item` is the previously placed item of the same track traversal,
    /// required by repeat tokens.
    pub fn place(&mut self, token: &str, prev_item: Option<&PlacedItem>) -> Result<PlacedItem> {
        match Component::classify(token) {
            Component::Pause { kind } => self.place_pause(&kind),
            Component::Repeat => self.place_repeat(prev_item),
            Component::Clip { label, performer } => self.place_clip(&label, &performer),
        }
    }

    fn place_pause(&mut self, kind: &str) -> Result<PlacedItem> {
        let track = self.registry.get_or_create(self.host, PAUSE_TRACK)?;
        let length = self.pause_lengths.get(kind).copied().unwrap_or(DEFAULT_LENGTH);

        let item = self.host.create_item(track)?;
        self.host.set_item_position(item, self.cursor)?;
        self.host.set_item_length(item, length)?;
        let take = self.host.create_take(item)?;
        self.host.set_take_name(take, kind)?;

        Ok(self.advance(PlacedItem {
            item,
            track_id: PAUSE_TRACK.to_string(),
            position: self.cursor,
            length,
            label: kind.to_string(),
            muted: false,
            source: None,
        }))
    }

    fn place_repeat(&mut self, prev_item: Option<&PlacedItem>) -> Result<PlacedItem> {
        // place() does not know which disc and track it is serving; render()
        // wraps this into the located variant.
        let prev = prev_item.ok_or(SplicerError::RepeatWithoutPrevious)?;
        let track = self.registry.get_or_create(self.host, REPEAT_TRACK)?;

        let item = self.host.create_item(track)?;
        self.host.set_item_position(item, self.cursor)?;
        self.host.set_item_length(item, prev.length)?;
        self.host.set_item_mute(item, true)?;
        let take = self.host.create_take(item)?;
        self.host.set_take_name(take, &prev.label)?;
        if let Some(source) = &prev.source {
            self.host.set_take_source(take, source)?;
        }

        Ok(self.advance(PlacedItem {
            item,
            track_id: REPEAT_TRACK.to_string(),
            position: self.cursor,
            length: prev.length,
            label: prev.label.clone(),
            muted: true,
            source: prev.source.clone(),
        }))
    }

    fn place_clip(&mut self, label: &str, performer: &str) -> Result<PlacedItem> {
        let track = self.registry.get_or_create(self.host, performer)?;

        if let Some(path) = self.resolver.resolve(label) {
            match self.host.insert_media(track, &path, self.cursor) {
                Ok((item, length)) => {
                    let take = self.host.create_take(item)?;
                    self.host.set_take_name(take, label)?;
                    self.availability.mark_available(label);
                    return Ok(self.advance(PlacedItem {
                        item,
                        track_id: performer.to_string(),
                        position: self.cursor,
                        length,
                        label: label.to_string(),
                        muted: false,
                        source: Some(path),
                    }));
                }
                Err(e) => {
                    // Insertion trouble counts as a missing file; keep going.
                    warn!("failed to insert {:?}: {}", label, e);
                }
            }
        }

        self.availability.mark_unavailable(label);
        let item = self.host.create_item(track)?;
        self.host.set_item_position(item, self.cursor)?;
        self.host.set_item_length(item, DEFAULT_LENGTH)?;
        let take = self.host.create_take(item)?;
        self.host.set_take_name(take, label)?;

        Ok(self.advance(PlacedItem {
            item,
            track_id: performer.to_string(),
            position: self.cursor,
            length: DEFAULT_LENGTH,
            label: label.to_string(),
            muted: false,
            source: None,
        }))
    }

    fn advance(&mut self, placed: PlacedItem) -> PlacedItem {
        self.cursor += placed.length;
        placed
    }

    /// The current cursor position in seconds.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn availability(&self) -> &AvailabilityTracker {
        &self.availability
    }

    /// Consume the engine, keeping the availability record for reporting.
    pub fn into_availability(self) -> AvailabilityTracker {
        self.availability
    }
}

/// Attach disc/track location to a usage error raised during placement.
fn locate(err: SplicerError, disc: &str, track_index: usize) -> SplicerError {
    match err {
        SplicerError::RepeatWithoutPrevious => SplicerError::RepeatStartsTrack {
            disc: disc.to_string(),
            track_index,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{write_test_wav, SessionHost};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn no_clips() -> HashMap<String, PathBuf> {
        HashMap::new()
    }

    fn parse(json: &str) -> Specification {
        serde_json::from_str(json).unwrap()
    }

    fn track_id_of(host: &SessionHost, item: &PlacedItem) -> String {
        let placed = host.item(item.item).unwrap();
        host.track_name(placed.track).unwrap().to_string()
    }

    #[test]
    fn test_unresolved_clip_gets_default_length() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["Apple [Beau]"]]}"#);
        let placed = engine.render(&spec).unwrap();

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].track_id, "Beau");
        assert_eq!(placed[0].position, 0.0);
        assert_eq!(placed[0].length, DEFAULT_LENGTH);
        assert!(!placed[0].muted);
        assert!(placed[0].source.is_none());
        assert_eq!(
            engine.availability().sorted_unavailable(),
            vec!["Apple [Beau]"]
        );
        assert_eq!(engine.cursor(), 1.0);
    }

    #[test]
    fn test_pause_uses_table_length() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut lengths = HashMap::new();
        lengths.insert("_PAUSE_AFTER_WORD".to_string(), 4.0);
        let mut engine = PlacementEngine::new(&mut host, &resolver, lengths);

        let spec = parse(r#"{"Disc 1": [["_PAUSE_AFTER_WORD"]]}"#);
        let placed = engine.render(&spec).unwrap();

        assert_eq!(placed[0].track_id, PAUSE_TRACK);
        assert_eq!(placed[0].length, 4.0);
        assert_eq!(engine.cursor(), 4.0);
    }

    #[test]
    fn test_pause_without_table_entry_defaults() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["_PAUSE_UNKNOWN"]]}"#);
        let placed = engine.render(&spec).unwrap();

        assert_eq!(placed[0].length, DEFAULT_LENGTH);
    }

    #[test]
    fn test_repeat_duplicates_previous_item_muted() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["Apple [Beau]", "_REPEAT_PREVIOUS_WORD"]]}"#);
        let placed = engine.render(&spec).unwrap();

        assert_eq!(placed.len(), 2);
        let repeat = &placed[1];
        assert_eq!(repeat.track_id, REPEAT_TRACK);
        assert_eq!(repeat.label, "Apple [Beau]");
        assert!(repeat.muted);
        assert_eq!(repeat.length, placed[0].length);
        // Positioned immediately after the clip.
        assert_eq!(repeat.position, placed[0].position + placed[0].length);

        let hosted = host.item(repeat.item).unwrap();
        assert!(hosted.muted);
        assert_eq!(hosted.take_name.as_deref(), Some("Apple [Beau]"));
    }

    #[test]
    fn test_repeat_copies_source_of_resolved_clip() {
        let dir = tempdir().unwrap();
        let wav = dir.path().join("Apple [Beau].wav");
        write_test_wav(&wav, 2.0);
        let mut clips = HashMap::new();
        clips.insert("Apple [Beau]".to_string(), wav.clone());

        let mut host = SessionHost::new();
        let mut engine = PlacementEngine::new(&mut host, &clips, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["Apple [Beau]", "_REPEAT_PREVIOUS_WORD"]]}"#);
        let placed = engine.render(&spec).unwrap();

        assert!((placed[0].length - 2.0).abs() < 1e-6);
        assert_eq!(placed[1].source.as_deref(), Some(wav.as_path()));
        assert_eq!(placed[1].length, placed[0].length);
        assert_eq!(
            engine.availability().sorted_available(),
            vec!["Apple [Beau]"]
        );
    }

    #[test]
    fn test_repeat_first_in_track_fails() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["_REPEAT_PREVIOUS_WORD"]]}"#);
        let err = engine.render(&spec).unwrap_err();

        match err {
            SplicerError::RepeatStartsTrack { disc, track_index } => {
                assert_eq!(disc, "Disc 1");
                assert_eq!(track_index, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nothing was placed for the bad token.
        assert!(host.items().is_empty());
    }

    #[test]
    fn test_prev_item_resets_per_track_but_cursor_does_not() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        // A repeat at the start of the SECOND track must fail even though the
        // first track placed items.
        let spec = parse(
            r#"{"Disc 1": [["Apple [Beau]"], ["_REPEAT_PREVIOUS_WORD"]]}"#,
        );
        let err = engine.render(&spec).unwrap_err();
        assert!(matches!(
            err,
            SplicerError::RepeatStartsTrack { track_index: 1, .. }
        ));
    }

    #[test]
    fn test_cursor_continuous_across_discs_and_tracks() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut lengths = HashMap::new();
        lengths.insert("_PAUSE_AFTER_WORD".to_string(), 2.0);
        let mut engine = PlacementEngine::new(&mut host, &resolver, lengths);

        let spec = parse(
            r#"{
                "Disc 1": [["Apple [Beau]"], null, ["_PAUSE_AFTER_WORD"]],
                "Disc 2": [["Pear [Ana]"]]
            }"#,
        );
        let placed = engine.render(&spec).unwrap();

        let positions: Vec<f64> = placed.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0.0, 1.0, 3.0]);
        assert_eq!(engine.cursor(), 4.0);

        // Final cursor equals the sum of all placed lengths.
        let total: f64 = placed.iter().map(|p| p.length).sum();
        assert_eq!(engine.cursor(), total);
    }

    #[test]
    fn test_cursor_starts_at_host_position() {
        let mut host = SessionHost::new();
        host.set_cursor_position(10.0).unwrap();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["Apple [Beau]"]]}"#);
        let placed = engine.render(&spec).unwrap();

        assert_eq!(placed[0].position, 10.0);
        assert_eq!(engine.cursor(), 11.0);
    }

    #[test]
    fn test_host_cursor_follows_placement() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["Apple [Beau]", "Pear [Beau]"]]}"#);
        engine.render(&spec).unwrap();
        let end = engine.cursor();
        drop(engine);

        assert_eq!(host.cursor_position(), end);
    }

    #[test]
    fn test_malformed_brackets_land_on_empty_named_track() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["no brackets at all"]]}"#);
        let placed = engine.render(&spec).unwrap();
        assert_eq!(placed[0].track_id, "");
        assert_eq!(track_id_of(&host, &placed[0]), "");
    }

    #[test]
    fn test_performer_tracks_are_reused() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(
            r#"{"Disc 1": [["Apple [Beau]", "Pear [Beau]", "Plum [Ana]"]]}"#,
        );
        engine.render(&spec).unwrap();
        drop(engine);

        assert_eq!(host.track_count(), 2);
    }

    #[test]
    fn test_insert_failure_downgrades_to_unavailable() {
        // Resolver points at a file that is not valid WAV; insertion fails
        // and the clip must fall back to a placeholder.
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("Apple [Beau].wav");
        std::fs::write(&bogus, b"not a wav file").unwrap();
        let mut clips = HashMap::new();
        clips.insert("Apple [Beau]".to_string(), bogus);

        let mut host = SessionHost::new();
        let mut engine = PlacementEngine::new(&mut host, &clips, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["Apple [Beau]"]]}"#);
        let placed = engine.render(&spec).unwrap();

        assert_eq!(placed[0].length, DEFAULT_LENGTH);
        assert!(placed[0].source.is_none());
        assert_eq!(
            engine.availability().sorted_unavailable(),
            vec!["Apple [Beau]"]
        );
    }

    #[test]
    fn test_availability_deduplicates_repeated_labels() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let spec = parse(
            r#"{"Disc 1": [["Apple [Beau]", "Apple [Beau]"]], "Disc 2": [["Apple [Beau]"]]}"#,
        );
        engine.render(&spec).unwrap();

        assert_eq!(engine.availability().unavailable_count(), 1);
    }

    #[test]
    fn test_resolved_clip_marks_available_and_sets_source() {
        let dir = tempdir().unwrap();
        let wav = dir.path().join("Apple [Beau].wav");
        write_test_wav(&wav, 0.5);
        let mut clips = HashMap::new();
        clips.insert("Apple [Beau]".to_string(), wav.clone());

        let mut host = SessionHost::new();
        let mut engine = PlacementEngine::new(&mut host, &clips, HashMap::new());

        let spec = parse(r#"{"Disc 1": [["Apple [Beau]"]]}"#);
        let placed = engine.render(&spec).unwrap();

        assert!((placed[0].length - 0.5).abs() < 1e-6);
        assert_eq!(placed[0].source.as_deref(), Some(wav.as_path()));
        assert_eq!(engine.availability().available_count(), 1);
        assert_eq!(engine.availability().unavailable_count(), 0);
    }

    #[test]
    fn test_place_is_usable_standalone() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let first = engine.place("Apple [Beau]", None).unwrap();
        let second = engine.place("_REPEAT_PREVIOUS_WORD", Some(&first)).unwrap();

        assert_eq!(second.position, first.position + first.length);
        assert!(second.muted);
    }

    #[test]
    fn test_standalone_place_repeat_error_has_no_fabricated_location() {
        let mut host = SessionHost::new();
        let resolver = no_clips();
        let mut engine = PlacementEngine::new(&mut host, &resolver, HashMap::new());

        let err = engine.place("_REPEAT_PREVIOUS_WORD", None).unwrap_err();
        assert!(matches!(err, SplicerError::RepeatWithoutPrevious));
        // The message must not name a disc or track the call never saw.
        assert!(!err.to_string().contains("track 0"));
    }
}
