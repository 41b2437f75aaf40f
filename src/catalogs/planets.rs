//! Planet ephemeris tables.
//!
//! A header line then rows of exactly ten fields, in this order:
//!
//! ```text
//! body,date,ra_deg,dec_deg,x_arcsec,y_arcsec,x_rad,y_rad,distance_au,magnitude
//! ```
//!
//! One row per body per date. A row whose RA or Dec is missing is still kept;
//! it just never gets drawn.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tracing::{info, warn};

use super::{parse_f64, LoadReport};
use crate::{Planet, SkyError};

pub const PLANET_COLUMNS: usize = 10;

pub const PLANET_HEADER: [&str; PLANET_COLUMNS] = [
    "body",
    "date",
    "ra_deg",
    "dec_deg",
    "x_arcsec",
    "y_arcsec",
    "x_rad",
    "y_rad",
    "distance_au",
    "magnitude",
];

fn parse_planet_record(record: &csv::StringRecord, id: u64, line: u64) -> Result<Planet, SkyError> {
    if record.len() != PLANET_COLUMNS {
        return Err(SkyError::malformed(
            line,
            format!(
                "planet rows need exactly {} fields, got {}",
                PLANET_COLUMNS,
                record.len()
            ),
        ));
    }
    let body = record.get(0).map(str::trim).unwrap_or_default();
    if body.is_empty() {
        return Err(SkyError::malformed(line, "planet row without a body name"));
    }
    let f = |i: usize| parse_f64(record.get(i));

    Ok(Planet {
        id,
        body: body.to_string(),
        date: record.get(1).map(str::trim).unwrap_or_default().to_string(),
        ra_deg: f(2),
        dec_deg: f(3),
        offset_arcsec: [f(4), f(5)],
        offset_rad: [f(6), f(7)],
        distance_au: f(8),
        magnitude: f(9),
    })
}

/// Parse a planet table from any reader. Row ids are assigned in file order.
pub fn parse_planet_table<R: Read>(reader: R) -> (Vec<Planet>, LoadReport) {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut planets = Vec::new();
    let mut report = LoadReport::default();

    for (idx, result) in rdr.records().enumerate() {
        report.rows_read += 1;
        let fallback_line = idx as u64 + 2;
        let parsed = match result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |p| p.line());
                parse_planet_record(&record, planets.len() as u64, line)
            }
            Err(e) => Err(SkyError::malformed(fallback_line, e.to_string())),
        };
        match parsed {
            Ok(planet) => planets.push(planet),
            Err(e) => {
                warn!("Skipping planet row: {}", e);
                report.issues.push(e);
            }
        }
    }

    report.loaded = planets.len();
    info!(
        "Parsed {} planet snapshots from {} rows ({} skipped)",
        report.loaded,
        report.rows_read,
        report.skipped()
    );
    (planets, report)
}

pub fn parse_planet_table_str(data: &str) -> (Vec<Planet>, LoadReport) {
    parse_planet_table(data.as_bytes())
}

/// Load a planet table from disk. A missing file is logged and yields no rows.
pub fn load_planet_table_from_file<P: AsRef<Path>>(path: P) -> (Vec<Planet>, LoadReport) {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => {
            info!("Loading planet table from {}", path.display());
            parse_planet_table(BufReader::new(file))
        }
        Err(e) => {
            warn!("Planet table {} unavailable: {}", path.display(), e);
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

/// Write planet snapshots in the fixed ten-column schema. `NaN` is written as
/// an empty field so it reads back as missing.
pub fn write_planet_table<W: Write>(writer: W, planets: &[Planet]) -> Result<(), SkyError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PLANET_HEADER)?;
    for p in planets {
        let num = |v: f64| if v.is_nan() { String::new() } else { v.to_string() };
        wtr.write_record([
            p.body.clone(),
            p.date.clone(),
            num(p.ra_deg),
            num(p.dec_deg),
            num(p.offset_arcsec[0]),
            num(p.offset_arcsec[1]),
            num(p.offset_rad[0]),
            num(p.offset_rad[1]),
            num(p.distance_au),
            num(p.magnitude),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
