//! Availability Report
//!
//! Renders the tracker's two sets into a fixed-layout text report and writes
//! it next to the input document, named with the run's timestamp.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::availability::AvailabilityTracker;
use crate::error::Result;

/// Header line of every report.
pub const REPORT_HEADER: &str = "Clip Splicer Report";

/// Render the report text. Pure function of its inputs: same timestamp and
/// sets, same output.
pub fn render(timestamp: &str, available: &[String], unavailable: &[String]) -> String {
    let mut out = String::new();
    out.push_str(REPORT_HEADER);
    out.push('\n');
    out.push_str(timestamp);
    out.push_str("\n\n");

    out.push_str("Available components\n");
    for label in available {
        out.push_str(label);
        out.push('\n');
    }

    out.push('\n');
    out.push_str("Unavailable components\n");
    for label in unavailable {
        out.push_str(label);
        out.push('\n');
    }

    out
}

/// Write the rendered report for `tracker` into `folder`, returning the path
/// of the created file (`clip_splicer_report-<timestamp>.txt`).
pub fn write_report(folder: &Path, timestamp: &str, tracker: &AvailabilityTracker) -> Result<PathBuf> {
    let text = render(
        timestamp,
        &tracker.sorted_available(),
        &tracker.sorted_unavailable(),
    );
    let path = folder.join(format!("clip_splicer_report-{}.txt", timestamp));
    fs::write(&path, text)?;
    info!("wrote report to {}", path.display());
    Ok(path)
}
