//! Observer location and instant.
//!
//! An [`ObserverSnapshot`] is built once per render from a validated
//! latitude, longitude and wall-clock time. The sidereal quantities every
//! projection needs are derived up front and never change afterwards.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{Result, SkyError};
use crate::time::{
    greenwich_mean_sidereal_time_deg, julian_date, local_sidereal_time_deg, local_to_utc,
    LocalDateTime,
};

/// Immutable observer input plus everything derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverSnapshot {
    latitude_deg: f64,
    longitude_deg: f64,
    local: LocalDateTime,
    utc: DateTime<Utc>,
    julian_date: f64,
    gmst_deg: f64,
    lst_deg: f64,
    latitude_rad: f64,
}

impl ObserverSnapshot {
    /// Validate the input and derive UTC, Julian Date and sidereal time.
    ///
    /// Latitude must lie in `[-90, 90]`, longitude (east-positive) in
    /// `[-180, 180]`, and the wall-clock date in `[1900-01-01, 2100-01-01]`.
    pub fn new(
        latitude_deg: f64,
        longitude_deg: f64,
        local: impl Into<LocalDateTime>,
    ) -> Result<Self> {
        let local = local.into();
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(SkyError::invalid_observer(format!(
                "latitude {} outside [-90, 90]",
                latitude_deg
            )));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(SkyError::invalid_observer(format!(
                "longitude {} outside [-180, 180]",
                longitude_deg
            )));
        }
        let date = local.wall_clock().date();
        if date < min_date() || date > max_date() {
            return Err(SkyError::invalid_observer(format!(
                "date {} outside [{}, {}]",
                date,
                min_date(),
                max_date()
            )));
        }

        let utc = local_to_utc(local);
        let julian_date = julian_date(utc);
        let gmst_deg = greenwich_mean_sidereal_time_deg(julian_date);
        let lst_deg = local_sidereal_time_deg(gmst_deg, longitude_deg);

        Ok(Self {
            latitude_deg,
            longitude_deg,
            local,
            utc,
            julian_date,
            gmst_deg,
            lst_deg,
            latitude_rad: latitude_deg.to_radians(),
        })
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn local(&self) -> LocalDateTime {
        self.local
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }

    pub fn julian_date(&self) -> f64 {
        self.julian_date
    }

    pub fn gmst_deg(&self) -> f64 {
        self.gmst_deg
    }

    pub fn lst_deg(&self) -> f64 {
        self.lst_deg
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude_rad
    }
}

fn min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn max_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2100, 1, 1).unwrap_or(NaiveDate::MAX)
}

// ── Input parsing ───────────────────────────────────────────────────────────

/// Parse a latitude given as decimal degrees (`"40.7128"`, `"-33.9"`) or as
/// degrees, minutes and hemisphere (`"40 42.8 N"`, `"33°52'S"`).
pub fn parse_latitude(text: &str) -> Result<f64> {
    let value = parse_angle(text, 'N', 'S')?;
    if !(-90.0..=90.0).contains(&value) {
        return Err(SkyError::invalid_observer(format!(
            "latitude {} outside [-90, 90]",
            value
        )));
    }
    Ok(value)
}

/// Parse an east-positive longitude; `W` hemisphere negates.
pub fn parse_longitude(text: &str) -> Result<f64> {
    let value = parse_angle(text, 'E', 'W')?;
    if !(-180.0..=180.0).contains(&value) {
        return Err(SkyError::invalid_observer(format!(
            "longitude {} outside [-180, 180]",
            value
        )));
    }
    Ok(value)
}

/// Parse a `yyyy-MM-dd` date and an `HH:mm` time into a zone-less wall clock.
pub fn parse_local_date_time(date: &str, time: &str) -> Result<NaiveDateTime> {
    let d = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| SkyError::invalid_observer(format!("date '{}': {}", date, e)))?;
    let t = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|e| SkyError::invalid_observer(format!("time '{}': {}", time, e)))?;
    Ok(d.and_time(t))
}

fn parse_angle(text: &str, positive: char, negative: char) -> Result<f64> {
    let trimmed = text.trim();
    let upper = trimmed.to_ascii_uppercase();

    let (body, sign) = match upper.chars().last() {
        Some(c) if c == positive => (&upper[..upper.len() - 1], 1.0),
        Some(c) if c == negative => (&upper[..upper.len() - 1], -1.0),
        _ => (upper.as_str(), 1.0),
    };

    let parts: Vec<&str> = body
        .split(|c: char| c.is_whitespace() || c == '°' || c == '\'' || c == ',')
        .filter(|s| !s.is_empty())
        .collect();

    let bad = || SkyError::invalid_observer(format!("cannot parse angle '{}'", trimmed));
    let value = match parts.as_slice() {
        [deg] => deg.parse::<f64>().map_err(|_| bad())?,
        [deg, min] => {
            let d: f64 = deg.parse().map_err(|_| bad())?;
            let m: f64 = min.parse().map_err(|_| bad())?;
            if !(0.0..60.0).contains(&m) || (sign < 0.0 && d < 0.0) {
                return Err(bad());
            }
            d.signum() * (d.abs() + m / 60.0)
        }
        _ => return Err(bad()),
    };
    if !value.is_finite() {
        return Err(bad());
    }
    Ok(sign * value)
}
