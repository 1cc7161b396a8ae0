//! Specification Document Model
//!
//! The input document is a JSON object mapping disc names to arrays of
//! tracks; each track is either `null` (skipped) or an array of component
//! token strings. Disc order is document order and is load-bearing, so the
//! parser builds an explicitly ordered `Vec<Disc>` instead of trusting the
//! iteration order of a map type.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::component::PAUSE_PREFIX;
use crate::error::{Result, SplicerError};

/// A track is either absent (`null` in the document) or an ordered sequence
/// of component tokens.
pub type Track = Option<Vec<String>>;

/// One disc of the production: a name and its tracks, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disc {
    pub name: String,
    pub tracks: Vec<Track>,
}

/// The full production specification, discs in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Specification {
    pub discs: Vec<Disc>,
}

impl Specification {
    /// Load a specification from a JSON file. Parse failures are fatal and
    /// happen before any placement.
    pub fn load(path: &Path) -> Result<Specification> {
        if !path.exists() {
            return Err(SplicerError::SpecNotFound {
                path: path.display().to_string(),
            });
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let spec = serde_json::from_reader(reader)?;
        Ok(spec)
    }

    /// Collect every distinct pause kind referenced anywhere in the
    /// document, in first-occurrence order.
    ///
    /// This is the mandatory pre-pass: pause durations must be known before
    /// the placement pass starts, so the prompt for them runs up front over
    /// the complete set of kinds.
    pub fn pause_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = Vec::new();
        for disc in &self.discs {
            for track in disc.tracks.iter().flatten() {
                for token in track {
                    if token.starts_with(PAUSE_PREFIX) && !kinds.iter().any(|k| k == token) {
                        kinds.push(token.clone());
                    }
                }
            }
        }
        kinds
    }

    /// Total number of component tokens across all discs and tracks.
    pub fn component_count(&self) -> usize {
        self.discs
            .iter()
            .flat_map(|d| d.tracks.iter().flatten())
            .map(|t| t.len())
            .sum()
    }
}

impl<'de> Deserialize<'de> for Specification {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SpecVisitor;

        impl<'de> Visitor<'de> for SpecVisitor {
            type Value = Specification;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of disc name to an array of tracks")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut discs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, tracks)) = map.next_entry::<String, Vec<Track>>()? {
                    discs.push(Disc { name, tracks });
                }
                Ok(Specification { discs })
            }
        }

        deserializer.deserialize_map(SpecVisitor)
    }
}
