//! Time scales and sidereal time.
//!
//! Converts an observer's wall-clock time to UTC, then to a Julian Date, and
//! from there to Greenwich and local mean sidereal time. Everything here is a
//! pure function; angles come out normalized to `[0, 360)` degrees or
//! `[0, 2π)` radians.

use std::f64::consts::TAU;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, Offset,
    TimeZone, Timelike, Utc,
};

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT, treated as UTC here).
pub const J2000_JD: f64 = 2_451_545.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

// IAU 1982 GMST polynomial, degrees.
const GMST_BASE_DEG: f64 = 280.460_618_37;
const GMST_ROTATION_PER_DAY: f64 = 360.985_647_366_29;
const GMST_T2: f64 = 0.000_387_933;
const GMST_T3_DIVISOR: f64 = 38_710_000.0;

/// A wall-clock reading as handed over by whoever collected the observer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalDateTime {
    /// No zone attached; interpreted in the process's local zone.
    Unspecified(NaiveDateTime),
    /// Carries an explicit UTC offset.
    Zoned(DateTime<FixedOffset>),
    /// Already UTC.
    Utc(DateTime<Utc>),
}

impl LocalDateTime {
    /// The wall-clock reading as the observer would read it.
    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            LocalDateTime::Unspecified(naive) => *naive,
            LocalDateTime::Zoned(dt) => dt.naive_local(),
            LocalDateTime::Utc(dt) => dt.naive_utc(),
        }
    }
}

impl From<NaiveDateTime> for LocalDateTime {
    fn from(naive: NaiveDateTime) -> Self {
        LocalDateTime::Unspecified(naive)
    }
}

impl From<DateTime<FixedOffset>> for LocalDateTime {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        LocalDateTime::Zoned(dt)
    }
}

impl From<DateTime<Utc>> for LocalDateTime {
    fn from(dt: DateTime<Utc>) -> Self {
        LocalDateTime::Utc(dt)
    }
}

/// Convert an observer wall-clock reading to a UTC instant.
///
/// Never fails for a valid calendar date: an ambiguous local time (DST fold)
/// resolves to the earlier instant, and a skipped one (DST gap) is shifted by
/// the offset in force at that moment.
pub fn local_to_utc(local: LocalDateTime) -> DateTime<Utc> {
    match local {
        LocalDateTime::Utc(dt) => dt,
        LocalDateTime::Zoned(dt) => dt.with_timezone(&Utc),
        LocalDateTime::Unspecified(naive) => match Local.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let offset = Local.offset_from_utc_datetime(&naive).fix();
                let shifted = naive - Duration::seconds(offset.local_minus_utc() as i64);
                Utc.from_utc_datetime(&shifted)
            }
        },
    }
}

/// Julian Date for a UTC instant (Gregorian calendar, Meeus ch. 7).
///
/// The day fraction includes hours, minutes, seconds and milliseconds.
pub fn julian_date(utc: DateTime<Utc>) -> f64 {
    let mut year = utc.year() as f64;
    let mut month = utc.month() as f64;
    if month <= 2.0 {
        year -= 1.0;
        month += 12.0;
    }

    let day_fraction = (utc.hour() as f64
        + utc.minute() as f64 / 60.0
        + (utc.second() as f64 + utc.timestamp_subsec_millis() as f64 / 1000.0) / 3600.0)
        / 24.0;
    let day = utc.day() as f64 + day_fraction;

    let a = (year / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (year + 4716.0)).floor() + (30.6001 * (month + 1.0)).floor() + day + b - 1524.5
}

/// Greenwich Mean Sidereal Time in degrees for a Julian Date.
pub fn greenwich_mean_sidereal_time_deg(jd: f64) -> f64 {
    let days = jd - J2000_JD;
    let t = days / DAYS_PER_JULIAN_CENTURY;
    let gmst = GMST_BASE_DEG + GMST_ROTATION_PER_DAY * days + GMST_T2 * t * t
        - t * t * t / GMST_T3_DIVISOR;
    normalize_deg(gmst)
}

/// Local Mean Sidereal Time; longitude is east-positive.
pub fn local_sidereal_time_deg(gmst_deg: f64, longitude_deg: f64) -> f64 {
    normalize_deg(gmst_deg + longitude_deg)
}

/// Hour angle of a target west of the local meridian.
pub fn hour_angle_deg(lst_deg: f64, ra_deg: f64) -> f64 {
    normalize_deg(lst_deg - ra_deg)
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_rad(rad: f64) -> f64 {
    let r = rad.rem_euclid(TAU);
    if r >= TAU {
        0.0
    } else {
        r
    }
}
