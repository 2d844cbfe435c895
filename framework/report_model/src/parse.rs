use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// The category every report carries for the overall build duration
pub const TOTAL_WALL_TIME: &str = "Total wall time";

/// Lines of interest contain one of these markers, everything else in the report is noise.
const LINE_MARKERS: [&str; 2] = [TOTAL_WALL_TIME, "items"];

/// A named timing value taken from one line of a timing report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSample {
    pub category: String,
    /// Rounded to 3 decimal places
    pub value: f64,
}

/// Parse one line of a timing report.
///
/// Only lines containing `Total wall time` or `items` are considered. The category is the
/// trimmed text before the first colon and the value is the first whitespace separated token
/// after it. Lines that don't fit that shape are skipped by returning `None`.
pub fn parse_line(line: &str) -> Option<MetricSample> {
    if !LINE_MARKERS.iter().any(|marker| line.contains(marker)) {
        return None;
    }

    let (category, rest) = line.split_once(':')?;
    let value = rest.split_whitespace().next()?.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(MetricSample {
        category: category.trim().to_string(),
        value: round3(value),
    })
}

/// Parse every line of a timing report, keeping samples in file order.
///
/// Reports are read as raw bytes, since build tools write in the console's locale encoding.
/// Invalid UTF-8 is replaced per line and never fails the whole report.
pub fn parse_report<R: BufRead>(reader: R) -> std::io::Result<Vec<MetricSample>> {
    let mut samples = Vec::new();
    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(line.strip_suffix(b"\r").unwrap_or(&line));
        if let Some(sample) = parse_line(&line) {
            samples.push(sample);
        }
    }
    Ok(samples)
}

fn round3(value: f64) -> f64 {
    let scaled = value * 1000.0;
    if scaled.is_finite() {
        scaled.round() / 1000.0
    } else {
        // Too large for a fractional part to exist
        value
    }
}
