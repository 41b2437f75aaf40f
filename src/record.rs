//! The catalog entry type shared by every downstream stage.

use std::cmp::Ordering;

use rkyv::{Archive, Deserialize, Serialize};

use crate::{Planet, Star};

/// A star or a planet snapshot.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub enum CelestialRecord {
    Star(Star),
    Planet(Planet),
}

impl CelestialRecord {
    pub fn ra_deg(&self) -> f64 {
        match self {
            CelestialRecord::Star(s) => s.ra_deg,
            CelestialRecord::Planet(p) => p.ra_deg,
        }
    }

    pub fn dec_deg(&self) -> f64 {
        match self {
            CelestialRecord::Star(s) => s.dec_deg,
            CelestialRecord::Planet(p) => p.dec_deg,
        }
    }

    pub fn magnitude(&self) -> f64 {
        match self {
            CelestialRecord::Star(s) => s.magnitude,
            CelestialRecord::Planet(p) => p.magnitude,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            CelestialRecord::Star(s) => s.id,
            CelestialRecord::Planet(p) => p.id,
        }
    }

    /// Records with a missing RA or Dec never reach projection.
    pub fn has_position(&self) -> bool {
        match self {
            CelestialRecord::Star(s) => s.has_position(),
            CelestialRecord::Planet(p) => p.has_position(),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            CelestialRecord::Star(s) => s.display_name(),
            CelestialRecord::Planet(p) => p.display_name(),
        }
    }

    pub fn is_planet(&self) -> bool {
        matches!(self, CelestialRecord::Planet(_))
    }

    pub fn as_star(&self) -> Option<&Star> {
        match self {
            CelestialRecord::Star(s) => Some(s),
            CelestialRecord::Planet(_) => None,
        }
    }

    pub fn as_planet(&self) -> Option<&Planet> {
        match self {
            CelestialRecord::Planet(p) => Some(p),
            CelestialRecord::Star(_) => None,
        }
    }

    /// Brightest first, then stars before planets, then ascending id.
    ///
    /// Magnitudes are compared with `total_cmp`, so the order is total and
    /// identical across runs.
    pub fn visible_order(&self, other: &Self) -> Ordering {
        self.magnitude()
            .total_cmp(&other.magnitude())
            .then_with(|| self.is_planet().cmp(&other.is_planet()))
            .then_with(|| self.id().cmp(&other.id()))
    }
}

impl From<Star> for CelestialRecord {
    fn from(star: Star) -> Self {
        CelestialRecord::Star(star)
    }
}

impl From<Planet> for CelestialRecord {
    fn from(planet: Planet) -> Self {
        CelestialRecord::Planet(planet)
    }
}
