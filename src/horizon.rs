//! Equatorial to horizontal (altitude/azimuth) conversion.
//!
//! Azimuth uses the `atan2` form, which stays well defined near the celestial
//! poles and at the zenith. The raw result is measured from the south; it is
//! rotated by π to give the usual north-based, clockwise-through-east bearing.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::time::normalize_rad;

/// Objects at or below this altitude (radians) are treated as below the horizon.
pub const HORIZON_EPSILON_RAD: f64 = 1e-6;

/// Horizon-relative position of one object for one observer instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonPosition {
    /// Altitude above the horizon, `[-π/2, π/2]`.
    pub altitude_rad: f64,
    /// North-based azimuth, `[0, 2π)`.
    pub azimuth_rad: f64,
}

impl HorizonPosition {
    /// `false` for anything at or within [`HORIZON_EPSILON_RAD`] of the horizon or below.
    pub fn is_above_horizon(&self) -> bool {
        self.altitude_rad > HORIZON_EPSILON_RAD
    }

    /// The zenith, azimuth 0.
    pub fn zenith() -> Self {
        Self {
            altitude_rad: FRAC_PI_2,
            azimuth_rad: 0.0,
        }
    }
}

/// Convert hour angle / declination to altitude / azimuth for an observer latitude.
///
/// All inputs are radians. The `sin(alt)` argument is clamped to `[-1, 1]`
/// so rounding overshoot never turns into a NaN altitude.
pub fn equatorial_to_horizontal(ha_rad: f64, dec_rad: f64, lat_rad: f64) -> HorizonPosition {
    let (sin_dec, cos_dec) = dec_rad.sin_cos();
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_ha, cos_ha) = ha_rad.sin_cos();

    let sin_alt = (sin_dec * sin_lat + cos_dec * cos_lat * cos_ha).clamp(-1.0, 1.0);
    let altitude_rad = sin_alt.asin();

    let az_south = sin_ha.atan2(cos_ha * sin_lat - dec_rad.tan() * cos_lat);
    let azimuth_rad = normalize_rad(az_south + PI);

    HorizonPosition {
        altitude_rad,
        azimuth_rad,
    }
}
