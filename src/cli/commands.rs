//! CLI Command Implementation
//!
//! Wires the placement engine to the concrete collaborators: the in-memory
//! session host, the filesystem clip resolver, the stdin pause prompt and the
//! report file sink.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

use log::info;

use crate::cli::Cli;
use crate::engine::PlacementEngine;
use crate::error::{Result, SplicerError};
use crate::host::PauseDurationPrompt;
use crate::report;
use crate::session::{FsResolver, SessionHost};
use crate::spec::Specification;

/// Run the import described by the parsed CLI arguments.
pub fn run_import(cli: &Cli) -> Result<()> {
    let folder = cli
        .spec
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    info!("loading specification: {}", cli.spec.display());
    let spec = Specification::load(&cli.spec)?;
    println!(
        "Loaded {} disc(s), {} component(s)",
        spec.discs.len(),
        spec.component_count()
    );

    // Pause lengths must be complete before the placement pass starts.
    let kinds = spec.pause_kinds();
    let given = parse_pause_flags(&cli.pauses)?;
    let pause_lengths = resolve_pause_lengths(&kinds, given, &mut StdinPrompt)?;

    let resolver = match &cli.clips_dir {
        Some(dir) => FsResolver::with_clips_dir(dir.clone()),
        None => FsResolver::new(&folder),
    };
    info!("resolving clips against {}", resolver.clips_dir().display());

    let mut host = SessionHost::new();
    let mut engine = PlacementEngine::new(&mut host, &resolver, pause_lengths);
    let placed = engine.render(&spec)?;
    let cursor = engine.cursor();
    let availability = engine.into_availability();

    println!(
        "Placed {} item(s) on {} track(s); timeline ends at {:.3}s",
        placed.len(),
        host.track_count(),
        cursor
    );
    println!(
        "Available: {} | Unavailable: {}",
        availability.available_count(),
        availability.unavailable_count()
    );

    if !cli.no_report {
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let path = report::write_report(&folder, &timestamp, &availability)?;
        println!("Report written: {}", path.display());
    }

    Ok(())
}

/// Parse repeated `--pause KIND=SECONDS` flags into a length table.
pub fn parse_pause_flags(flags: &[String]) -> Result<HashMap<String, f64>> {
    let mut table = HashMap::new();
    for flag in flags {
        let (kind, value) = flag.split_once('=').ok_or_else(|| {
            SplicerError::InvalidPauseLength {
                kind: flag.clone(),
                reason: "expected KIND=SECONDS".to_string(),
            }
        })?;
        let seconds: f64 = value.parse().map_err(|_| SplicerError::InvalidPauseLength {
            kind: kind.to_string(),
            reason: format!("{:?} is not a number", value),
        })?;
        validate_pause_length(kind, seconds)?;
        table.insert(kind.to_string(), seconds);
    }
    Ok(table)
}

/// Lengths feed the timeline cursor directly, so anything that could move it
/// backwards (negative, NaN, infinite) is rejected up front. `seconds < 0.0`
/// alone would wave NaN through: every comparison with NaN is false.
fn validate_pause_length(kind: &str, seconds: f64) -> Result<()> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SplicerError::InvalidPauseLength {
            kind: kind.to_string(),
            reason: format!("{} is not a non-negative number of seconds", seconds),
        });
    }
    Ok(())
}

/// Combine flag-supplied lengths with prompted ones so every discovered kind
/// has an entry. Kinds already covered by flags are never prompted for.
///
/// Prompted values are validated here, so every `PauseDurationPrompt`
/// implementation is held to the same rules as the `--pause` flags.
pub fn resolve_pause_lengths(
    kinds: &[String],
    given: HashMap<String, f64>,
    prompt: &mut dyn PauseDurationPrompt,
) -> Result<HashMap<String, f64>> {
    let missing: Vec<String> = kinds
        .iter()
        .filter(|k| !given.contains_key(*k))
        .cloned()
        .collect();

    let mut table = given;
    if !missing.is_empty() {
        let prompted = prompt.pause_lengths(&missing)?;
        for (kind, seconds) in &prompted {
            validate_pause_length(kind, *seconds)?;
        }
        table.extend(prompted);
    }
    Ok(table)
}

/// Interactive pause-length collection over stdin, one kind per line.
pub struct StdinPrompt;

impl PauseDurationPrompt for StdinPrompt {
    fn pause_lengths(&mut self, kinds: &[String]) -> Result<HashMap<String, f64>> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        let mut table = HashMap::new();

        for kind in kinds {
            print!("Length for {} (seconds): ", kind);
            io::stdout().flush()?;

            let line = lines.next().transpose()?.ok_or_else(|| SplicerError::Prompt {
                reason: format!("no input for pause kind {:?}", kind),
            })?;
            let seconds: f64 =
                line.trim()
                    .parse()
                    .map_err(|_| SplicerError::InvalidPauseLength {
                        kind: kind.clone(),
                        reason: format!("{:?} is not a number", line.trim()),
                    })?;
            validate_pause_length(kind, seconds)?;
            table.insert(kind.clone(), seconds);
        }
        Ok(table)
    }
}
