//! Apparent magnitude to rendered size and opacity.
//!
//! `t = clamp01(mag / limit)` is shaped by a power curve before easing
//! between the bright and faint ends: `t^1.7` for size and `t^1.3` for
//! opacity. A linear ramp makes faint objects look too bright.

/// Exponent applied to the normalized magnitude for size.
pub const SIZE_EXPONENT: f64 = 1.7;
/// Exponent applied to the normalized magnitude for opacity.
pub const ALPHA_EXPONENT: f64 = 1.3;

/// Size and opacity range a magnitude maps into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeStyle {
    /// Magnitude that maps to the faint end of both ranges.
    pub magnitude_limit: f64,
    /// Radius of the faintest objects.
    pub min_radius: f64,
    /// Radius of objects at magnitude 0 or brighter.
    pub max_radius: f64,
    /// Opacity of the faintest objects.
    pub min_alpha: f64,
    /// Opacity of objects at magnitude 0 or brighter.
    pub max_alpha: f64,
}

impl Default for MagnitudeStyle {
    /// Pixel radii suited to a chart around 1000 px across.
    fn default() -> Self {
        Self {
            magnitude_limit: 6.0,
            min_radius: 0.8,
            max_radius: 4.5,
            min_alpha: 0.3,
            max_alpha: 1.0,
        }
    }
}

impl MagnitudeStyle {
    /// Normalized faintness in `[0, 1]`; 0 is brightest.
    pub fn faintness(&self, magnitude: f64) -> f64 {
        if self.magnitude_limit <= 0.0 || magnitude.is_nan() {
            return 1.0;
        }
        (magnitude / self.magnitude_limit).clamp(0.0, 1.0)
    }

    /// The same ranges, scaled to a different faint limit.
    ///
    /// Renders call this with the catalog's limit so the faintest visible
    /// object lands exactly on the faint end.
    pub fn with_limit(self, magnitude_limit: f64) -> Self {
        Self {
            magnitude_limit,
            ..self
        }
    }

    pub fn radius(&self, magnitude: f64) -> f64 {
        let t = self.faintness(magnitude).powf(SIZE_EXPONENT);
        lerp(self.max_radius, self.min_radius, t)
    }

    pub fn alpha(&self, magnitude: f64) -> f64 {
        let t = self.faintness(magnitude).powf(ALPHA_EXPONENT);
        lerp(self.max_alpha, self.min_alpha, t)
    }
}

/// Exact at both ends: `t = 0` gives `a`, `t = 1` gives `b`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}
