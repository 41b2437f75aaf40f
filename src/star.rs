use rkyv::{Archive, Deserialize, Serialize};

/// Id given to a star whose table row has no usable primary id. It sorts
/// after every real id among equal magnitudes.
pub const UNKNOWN_ID: u64 = u64::MAX;

/// A star as loaded from an HYG-style catalog table.
///
/// Right ascension is stored in degrees (the table carries hours).
/// Missing numeric fields are `NaN`; missing identifiers are `None`.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Star {
    /// Primary catalog id, used as the stable ordering tie-break.
    /// [`UNKNOWN_ID`] when the table's id was unusable.
    pub id: u64,
    pub hip: Option<u32>,
    pub hd: Option<u32>,
    pub hr: Option<u32>,
    pub gliese: Option<String>,
    pub bayer_flamsteed: Option<String>,
    pub proper: Option<String>,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub distance_pc: f64,
    /// Proper motion in RA (mas/yr).
    pub pm_ra: f64,
    /// Proper motion in Dec (mas/yr).
    pub pm_dec: f64,
    pub radial_velocity: f64,
    pub magnitude: f64,
    pub abs_magnitude: f64,
    pub spectral_type: Option<String>,
    /// B−V color index.
    pub color_index: f64,
    /// Cartesian position in parsecs.
    pub position: [f64; 3],
    /// Cartesian velocity in parsecs/yr.
    pub velocity: [f64; 3],
    pub ra_rad: f64,
    pub dec_rad: f64,
    pub pm_ra_rad: f64,
    pub pm_dec_rad: f64,
    /// Three-letter constellation abbreviation, when the table has one.
    pub constellation: Option<String>,
}

impl Star {
    /// `true` when both RA and Dec are present.
    pub fn has_position(&self) -> bool {
        !self.ra_deg.is_nan() && !self.dec_deg.is_nan()
    }

    /// The name shown on charts: the proper name, if the star has one.
    pub fn display_name(&self) -> Option<&str> {
        self.proper.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
pub(crate) fn test_star(id: u64, ra_deg: f64, dec_deg: f64, magnitude: f64) -> Star {
    Star {
        id,
        hip: None,
        hd: None,
        hr: None,
        gliese: None,
        bayer_flamsteed: None,
        proper: None,
        ra_deg,
        dec_deg,
        distance_pc: f64::NAN,
        pm_ra: 0.0,
        pm_dec: 0.0,
        radial_velocity: 0.0,
        magnitude,
        abs_magnitude: f64::NAN,
        spectral_type: None,
        color_index: f64::NAN,
        position: [0.0; 3],
        velocity: [0.0; 3],
        ra_rad: ra_deg.to_radians(),
        dec_rad: dec_deg.to_radians(),
        pm_ra_rad: 0.0,
        pm_dec_rad: 0.0,
        constellation: None,
    }
}
