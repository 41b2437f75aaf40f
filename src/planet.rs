use chrono::{NaiveDate, NaiveDateTime};
use rkyv::{Archive, Deserialize, Serialize};

/// One ephemeris snapshot of a solar-system body for one date.
///
/// A planet table usually holds several rows per body (one per date);
/// all of them are kept and the one nearest the observer date is drawn.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Planet {
    /// Row ordinal within its table; the ordering tie-break.
    pub id: u64,
    pub body: String,
    /// Date text exactly as it appeared in the table.
    pub date: String,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub offset_arcsec: [f64; 2],
    pub offset_rad: [f64; 2],
    pub distance_au: f64,
    pub magnitude: f64,
}

impl Planet {
    pub fn has_position(&self) -> bool {
        !self.ra_deg.is_nan() && !self.dec_deg.is_nan()
    }

    pub fn display_name(&self) -> Option<&str> {
        let name = self.body.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// The snapshot date, if the date text parses as `yyyy-MM-dd` (optionally
    /// followed by a time).
    pub fn date(&self) -> Option<NaiveDate> {
        let text = self.date.trim();
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M")
                    .ok()
                    .map(|dt| dt.date())
            })
            .or_else(|| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|dt| dt.date())
            })
    }
}
