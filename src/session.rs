//! In-Memory Session Host
//!
//! `SessionHost` is a concrete `TimelineHost` that records tracks, items,
//! takes and the edit cursor in memory. The CLI uses it to run an import as a
//! session build and print the resulting timeline; the test suite uses it to
//! observe exactly what the engine asked the host to do.
//!
//! `FsResolver` is the matching `FileResolver`: clip labels resolve to
//! `<folder>/clips/<label>.wav` when that file exists, and natural lengths
//! are probed from the WAV header.

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{Result, SplicerError};
use crate::host::{FileResolver, ItemHandle, TakeHandle, TimelineHost, TrackHandle};

/// One track of the in-memory session.
#[derive(Debug, Clone)]
pub struct SessionTrack {
    pub name: String,
}

/// One placed item of the in-memory session.
#[derive(Debug, Clone)]
pub struct SessionItem {
    pub track: TrackHandle,
    pub position: f64,
    pub length: f64,
    pub muted: bool,
    pub take_name: Option<String>,
    pub take_source: Option<PathBuf>,
}

/// In-memory timeline host.
#[derive(Debug, Default)]
pub struct SessionHost {
    tracks: Vec<SessionTrack>,
    items: Vec<SessionItem>,
    cursor: f64,
    refreshes: usize,
}

impl SessionHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn track_name(&self, track: TrackHandle) -> Option<&str> {
        self.tracks.get(track.0).map(|t| t.name.as_str())
    }

    pub fn items(&self) -> &[SessionItem] {
        &self.items
    }

    pub fn item(&self, item: ItemHandle) -> Option<&SessionItem> {
        self.items.get(item.0)
    }

    /// How many track-list refreshes the host was asked for.
    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    fn item_mut(&mut self, item: ItemHandle) -> Result<&mut SessionItem> {
        self.items.get_mut(item.0).ok_or_else(|| SplicerError::Host {
            reason: format!("unknown item handle {}", item.0),
        })
    }
}

impl TimelineHost for SessionHost {
    fn create_track(&mut self, name: &str) -> Result<TrackHandle> {
        self.tracks.push(SessionTrack {
            name: name.to_string(),
        });
        Ok(TrackHandle(self.tracks.len() - 1))
    }

    fn create_item(&mut self, track: TrackHandle) -> Result<ItemHandle> {
        if track.0 >= self.tracks.len() {
            return Err(SplicerError::Host {
                reason: format!("unknown track handle {}", track.0),
            });
        }
        self.items.push(SessionItem {
            track,
            position: 0.0,
            length: 0.0,
            muted: false,
            take_name: None,
            take_source: None,
        });
        Ok(ItemHandle(self.items.len() - 1))
    }

    fn set_item_position(&mut self, item: ItemHandle, seconds: f64) -> Result<()> {
        self.item_mut(item)?.position = seconds;
        Ok(())
    }

    fn set_item_length(&mut self, item: ItemHandle, seconds: f64) -> Result<()> {
        self.item_mut(item)?.length = seconds;
        Ok(())
    }

    fn set_item_mute(&mut self, item: ItemHandle, muted: bool) -> Result<()> {
        self.item_mut(item)?.muted = muted;
        Ok(())
    }

    fn create_take(&mut self, item: ItemHandle) -> Result<TakeHandle> {
        // Takes share their item's index; an item has at most one take here.
        self.item_mut(item)?;
        Ok(TakeHandle(item.0))
    }

    fn set_take_name(&mut self, take: TakeHandle, name: &str) -> Result<()> {
        self.item_mut(ItemHandle(take.0))?.take_name = Some(name.to_string());
        Ok(())
    }

    fn set_take_source(&mut self, take: TakeHandle, source: &Path) -> Result<()> {
        self.item_mut(ItemHandle(take.0))?.take_source = Some(source.to_path_buf());
        Ok(())
    }

    fn insert_media(
        &mut self,
        track: TrackHandle,
        path: &Path,
        position: f64,
    ) -> Result<(ItemHandle, f64)> {
        let length = wav_length_seconds(path)?;
        let item = self.create_item(track)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let entry = self.item_mut(item)?;
        entry.position = position;
        entry.length = length;
        entry.take_name = Some(name);
        entry.take_source = Some(path.to_path_buf());
        Ok((item, length))
    }

    fn cursor_position(&self) -> f64 {
        self.cursor
    }

    fn set_cursor_position(&mut self, seconds: f64) -> Result<()> {
        self.cursor = seconds;
        Ok(())
    }

    fn refresh_track_list(&mut self) {
        self.refreshes += 1;
    }
}

/// Natural length of a WAV file in seconds, from its header.
pub fn wav_length_seconds(path: &Path) -> Result<f64> {
    let reader = hound::WavReader::open(path).map_err(|e| SplicerError::Host {
        reason: format!("cannot read {}: {}", path.display(), e),
    })?;
    let spec = reader.spec();
    Ok(f64::from(reader.duration()) / f64::from(spec.sample_rate))
}

/// Resolves clip labels against a `clips/` directory next to the input
/// document; a clip named `Apple [Beau]` is expected at `clips/Apple [Beau].wav`.
#[derive(Debug, Clone)]
pub struct FsResolver {
    clips_dir: PathBuf,
}

impl FsResolver {
    /// `folder` is the directory containing the specification document.
    pub fn new(folder: &Path) -> Self {
        Self::with_clips_dir(folder.join("clips"))
    }

    /// Resolve against an explicit clips directory.
    pub fn with_clips_dir(clips_dir: PathBuf) -> Self {
        Self { clips_dir }
    }

    pub fn clips_dir(&self) -> &Path {
        &self.clips_dir
    }
}

impl FileResolver for FsResolver {
    fn resolve(&self, label: &str) -> Option<PathBuf> {
        let path = self.clips_dir.join(format!("{}.wav", label));
        if path.is_file() {
            Some(path)
        } else {
            if !self.clips_dir.is_dir() {
                warn!("clips directory missing: {}", self.clips_dir.display());
            }
            None
        }
    }
}

/// Test fixture: write a silent mono WAV of the given length.
#[cfg(test)]
pub(crate) fn write_test_wav(path: &Path, seconds: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..(44100.0 * seconds) as usize {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}
