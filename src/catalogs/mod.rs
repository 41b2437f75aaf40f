//! Raw text formats: HYG-style star tables, planet ephemeris tables and
//! constellation line lists.
//!
//! Every parser is row-tolerant. A row that cannot be read is logged, noted in
//! the [`LoadReport`] and skipped; a missing file yields an empty result.

pub mod constellations;
pub mod hyg;
pub mod planets;

use crate::SkyError;

/// What happened while reading one table.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Data rows seen (header excluded).
    pub rows_read: usize,
    /// Records produced.
    pub loaded: usize,
    /// Recoverable problems: skipped rows and missing files.
    pub issues: Vec<SkyError>,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.issues
            .iter()
            .filter(|e| matches!(e, SkyError::MalformedRecord { .. }))
            .count()
    }

    pub fn missing_resource(&self) -> bool {
        self.issues
            .iter()
            .any(|e| matches!(e, SkyError::MissingResource { .. }))
    }

    pub(crate) fn merge(&mut self, other: LoadReport) {
        self.rows_read += other.rows_read;
        self.loaded += other.loaded;
        self.issues.extend(other.issues);
    }
}

// ── Field helpers ───────────────────────────────────────────────────────────

/// Numeric field; absent or unparseable values become `NaN`, never `0`.
pub(crate) fn parse_f64(field: Option<&str>) -> f64 {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Secondary identifier (HIP, HD, HR); absent or unparseable becomes `None`.
pub(crate) fn parse_id(field: Option<&str>) -> Option<u32> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<u32>().ok())
}

pub(crate) fn parse_text(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
