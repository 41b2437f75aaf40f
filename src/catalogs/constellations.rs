//! Constellation stick-figure lines.
//!
//! One segment per row: `constellation_code, hd_id_1, hd_id_2`. Anything after
//! a `#` is a comment. Rows whose first cell is a header keyword are ignored.

use std::path::Path;

use tracing::{info, warn};

use super::LoadReport;
use crate::SkyError;

const HEADER_KEYWORDS: [&str; 4] = ["constellation", "con", "code", "abbr"];

/// A line between two stars, identified by HD number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstellationSegment {
    pub constellation: String,
    pub hd_a: u32,
    pub hd_b: u32,
}

fn parse_hd(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    let digits = cell
        .strip_prefix("HD")
        .or_else(|| cell.strip_prefix("hd"))
        .unwrap_or(cell)
        .trim();
    digits.parse().ok()
}

pub fn parse_constellation_lines(data: &str) -> (Vec<ConstellationSegment>, LoadReport) {
    let mut segments = Vec::new();
    let mut report = LoadReport::default();

    for (idx, raw) in data.lines().enumerate() {
        let line_no = idx as u64 + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let cells: Vec<&str> = content.split(',').map(str::trim).collect();
        let first = cells[0].to_ascii_lowercase();
        if HEADER_KEYWORDS.contains(&first.as_str()) {
            continue;
        }

        report.rows_read += 1;
        let parsed = match cells.as_slice() {
            [code, a, b, ..] if !code.is_empty() => match (parse_hd(a), parse_hd(b)) {
                (Some(hd_a), Some(hd_b)) => Ok(ConstellationSegment {
                    constellation: code.to_string(),
                    hd_a,
                    hd_b,
                }),
                _ => Err(SkyError::malformed(line_no, format!("bad HD ids in '{}'", content))),
            },
            _ => Err(SkyError::malformed(
                line_no,
                format!("expected 'code, hd, hd' but got '{}'", content),
            )),
        };
        match parsed {
            Ok(seg) => segments.push(seg),
            Err(e) => {
                warn!("Skipping constellation line: {}", e);
                report.issues.push(e);
            }
        }
    }

    report.loaded = segments.len();
    info!("Parsed {} constellation segments", report.loaded);
    (segments, report)
}

/// Load constellation lines from disk. A missing file is logged and yields none.
pub fn load_constellation_lines_from_file<P: AsRef<Path>>(
    path: P,
) -> (Vec<ConstellationSegment>, LoadReport) {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(data) => parse_constellation_lines(&data),
        Err(e) => {
            warn!("Constellation lines {} unavailable: {}", path.display(), e);
            let report = LoadReport {
                issues: vec![SkyError::MissingResource {
                    path: path.to_path_buf(),
                }],
                ..Default::default()
            };
            (Vec::new(), report)
        }
    }
}
