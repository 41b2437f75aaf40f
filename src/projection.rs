//! Visibility and projection engine.
//!
//! For one observer snapshot, every record in the catalog's visible set goes
//! through the same steps:
//!
//! 1. skip it if RA or Dec is missing (and, for planets, if it is not the
//!    snapshot nearest the observer date),
//! 2. compute hour angle, then altitude and azimuth,
//! 3. cull it at or below the horizon,
//! 4. project it onto a dome or a chart.
//!
//! Output keeps the visible set's order, so identical inputs give identical
//! output.

use std::collections::HashSet;
use std::f64::consts::FRAC_PI_2;

use nalgebra::Vector3;
use tracing::debug;

use crate::horizon::{equatorial_to_horizontal, HorizonPosition};
use crate::magnitude::MagnitudeStyle;
use crate::time::hour_angle_deg;
use crate::{Catalog, CelestialRecord, ObserverSnapshot};

/// Maps a horizon position to a render-space point.
pub trait Projection {
    type Point: Clone + PartialEq + std::fmt::Debug;

    fn project(&self, position: &HorizonPosition) -> Self::Point;
}

/// Points on a sphere of radius `radius` around the observer.
/// +Y is the zenith, +Z north, +X east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomeProjection {
    pub radius: f64,
}

impl Projection for DomeProjection {
    type Point = Vector3<f64>;

    fn project(&self, position: &HorizonPosition) -> Vector3<f64> {
        let (sin_alt, cos_alt) = position.altitude_rad.sin_cos();
        let (sin_az, cos_az) = position.azimuth_rad.sin_cos();
        Vector3::new(
            self.radius * cos_alt * sin_az,
            self.radius * sin_alt,
            self.radius * cos_alt * cos_az,
        )
    }
}

/// Settings for the live 3D dome.
#[derive(Debug, Clone)]
pub struct DomeConfig {
    /// Dome radius in scene units.
    /// Default: 100.0
    pub radius: f64,

    /// Point size and opacity range, in scene units. The limit is taken
    /// from the catalog at render time.
    /// Default: radii 0.15 to 0.9, opacity 0.3 to 1.0
    pub style: MagnitudeStyle,
}

impl Default for DomeConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            style: MagnitudeStyle {
                min_radius: 0.15,
                max_radius: 0.9,
                ..MagnitudeStyle::default()
            },
        }
    }
}

impl DomeConfig {
    pub fn projection(&self) -> DomeProjection {
        DomeProjection {
            radius: self.radius,
        }
    }
}

/// A pixel on a chart, flagged invalid if it falls outside the horizon disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartPoint {
    pub x: i32,
    pub y: i32,
    pub valid: bool,
}

/// Zenith-centered azimuthal-equidistant chart.
///
/// Distance from the center is linear in zenith angle: the zenith sits at the
/// center and the horizon on a circle of `radius_px`. North is toward +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartProjection {
    pub center_x: i32,
    pub center_y: i32,
    pub radius_px: f64,
}

impl ChartProjection {
    /// Center the horizon disc in a `width × height` image, `margin` pixels
    /// inside the shorter side.
    pub fn for_image(width: u32, height: u32, margin: u32) -> Self {
        let half = width.min(height) as f64 / 2.0;
        Self {
            center_x: (width / 2) as i32,
            center_y: (height / 2) as i32,
            radius_px: (half - margin as f64).max(1.0),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let dx = (x - self.center_x) as f64;
        let dy = (y - self.center_y) as f64;
        dx * dx + dy * dy <= self.radius_px * self.radius_px
    }
}

impl Projection for ChartProjection {
    type Point = ChartPoint;

    fn project(&self, position: &HorizonPosition) -> ChartPoint {
        let r01 = (FRAC_PI_2 - position.altitude_rad) / FRAC_PI_2;
        let pr = r01 * self.radius_px;
        let (sin_az, cos_az) = position.azimuth_rad.sin_cos();
        let x = self.center_x + (pr * sin_az).round() as i32;
        let y = self.center_y + (pr * cos_az).round() as i32;
        ChartPoint {
            x,
            y,
            valid: self.contains(x, y),
        }
    }
}

/// One record that survived culling, with where it landed.
#[derive(Debug, Clone, PartialEq)]
pub struct Projected<'a, P> {
    pub record: &'a CelestialRecord,
    /// Index into [`Catalog::records`].
    pub record_index: usize,
    pub horizon: HorizonPosition,
    pub point: P,
    pub magnitude: f64,
}

/// Altitude and azimuth of a record, or `None` if its RA or Dec is missing.
pub fn horizon_position(
    observer: &ObserverSnapshot,
    record: &CelestialRecord,
) -> Option<HorizonPosition> {
    if !record.has_position() {
        return None;
    }
    let ha = hour_angle_deg(observer.lst_deg(), record.ra_deg());
    Some(equatorial_to_horizontal(
        ha.to_radians(),
        record.dec_deg().to_radians(),
        observer.latitude_rad(),
    ))
}

/// Run the visible set through culling and projection.
pub fn project_visible<'a, P: Projection>(
    observer: &ObserverSnapshot,
    catalog: &'a Catalog,
    projection: &P,
) -> Vec<Projected<'a, P::Point>> {
    let current_planets: HashSet<usize> = catalog
        .planet_snapshots_for(observer.utc().date_naive())
        .into_iter()
        .collect();

    let mut out = Vec::new();
    let mut missing = 0usize;
    let mut culled = 0usize;

    for idx in catalog.visible_indices() {
        let record = &catalog.records()[idx];
        if record.is_planet() && !current_planets.contains(&idx) {
            continue;
        }
        let Some(horizon) = horizon_position(observer, record) else {
            missing += 1;
            continue;
        };
        if !horizon.is_above_horizon() {
            culled += 1;
            continue;
        }
        out.push(Projected {
            record,
            record_index: idx,
            horizon,
            point: projection.project(&horizon),
            magnitude: record.magnitude(),
        });
    }

    debug!(
        "Projected {} records ({} below horizon, {} without position) at LST {:.3} deg",
        out.len(),
        culled,
        missing,
        observer.lst_deg()
    );
    out
}
