//! HYG-style star tables.
//!
//! A header line followed by comma-separated rows. The first 27 columns are
//! positional and required:
//!
//! ```text
//! id,hip,hd,hr,gl,bf,proper,ra,dec,dist,pmra,pmdec,rv,mag,absmag,spect,ci,
//! x,y,z,vx,vy,vz,rarad,decrad,pmrarad,pmdecrad[,bayer,flam,con,...]
//! ```
//!
//! RA is in hours, Dec in degrees. Numbers use the invariant `.` decimal
//! format; strings may be quoted. Trailing columns beyond the 27 are optional;
//! column 29 (`con`) is kept when present.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info, warn};

use super::{parse_f64, parse_id, parse_text, LoadReport};
use crate::star::UNKNOWN_ID;
use crate::{SkyError, Star};

/// Columns every star row must supply.
pub const REQUIRED_COLUMNS: usize = 27;

const ID: usize = 0;
const HIP: usize = 1;
const HD: usize = 2;
const HR: usize = 3;
const GL: usize = 4;
const BF: usize = 5;
const PROPER: usize = 6;
const RA_HOURS: usize = 7;
const DEC: usize = 8;
const DIST: usize = 9;
const PMRA: usize = 10;
const PMDEC: usize = 11;
const RV: usize = 12;
const MAG: usize = 13;
const ABSMAG: usize = 14;
const SPECT: usize = 15;
const CI: usize = 16;
const X: usize = 17;
const VX: usize = 20;
const RARAD: usize = 23;
const DECRAD: usize = 24;
const PMRARAD: usize = 25;
const PMDECRAD: usize = 26;
const CON: usize = 29;

/// Parse one table row into a [`Star`].
///
/// Fails only when the row is too short. An unusable primary id becomes
/// [`UNKNOWN_ID`]; any other bad field becomes `NaN` / `None`.
fn parse_star_record(record: &csv::StringRecord, line: u64) -> Result<Star, SkyError> {
    if record.len() < REQUIRED_COLUMNS {
        return Err(SkyError::malformed(
            line,
            format!(
                "only {} of {} required star fields",
                record.len(),
                REQUIRED_COLUMNS
            ),
        ));
    }

    let id = record
        .get(ID)
        .map(str::trim)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            debug!("Line {}: unusable star id {:?}", line, record.get(ID));
            UNKNOWN_ID
        });

    let f = |i: usize| parse_f64(record.get(i));
    let ra_hours = f(RA_HOURS);

    Ok(Star {
        id,
        hip: parse_id(record.get(HIP)),
        hd: parse_id(record.get(HD)),
        hr: parse_id(record.get(HR)),
        gliese: parse_text(record.get(GL)),
        bayer_flamsteed: parse_text(record.get(BF)),
        proper: parse_text(record.get(PROPER)),
        ra_deg: ra_hours * 15.0,
        dec_deg: f(DEC),
        distance_pc: f(DIST),
        pm_ra: f(PMRA),
        pm_dec: f(PMDEC),
        radial_velocity: f(RV),
        magnitude: f(MAG),
        abs_magnitude: f(ABSMAG),
        spectral_type: parse_text(record.get(SPECT)),
        color_index: f(CI),
        position: [f(X), f(X + 1), f(X + 2)],
        velocity: [f(VX), f(VX + 1), f(VX + 2)],
        ra_rad: f(RARAD),
        dec_rad: f(DECRAD),
        pm_ra_rad: f(PMRARAD),
        pm_dec_rad: f(PMDECRAD),
        constellation: parse_text(record.get(CON)),
    })
}

/// Parse a star table from any reader.
pub fn parse_star_table<R: Read>(reader: R) -> (Vec<Star>, LoadReport) {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut stars = Vec::new();
    let mut report = LoadReport::default();

    for (idx, result) in rdr.records().enumerate() {
        report.rows_read += 1;
        let fallback_line = idx as u64 + 2;
        let parsed = match result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |p| p.line());
                parse_star_record(&record, line)
            }
            Err(e) => Err(SkyError::malformed(fallback_line, e.to_string())),
        };
        match parsed {
            Ok(star) => stars.push(star),
            Err(e) => {
                warn!("Skipping star row: {}", e);
                report.issues.push(e);
            }
        }
    }

    report.loaded = stars.len();
    info!(
        "Parsed {} stars from {} rows ({} skipped)",
        report.loaded,
        report.rows_read,
        report.skipped()
    );
    (stars, report)
}

/// Parse a star table held in memory.
pub fn parse_star_table_str(data: &str) -> (Vec<Star>, LoadReport) {
    parse_star_table(data.as_bytes())
}

/// Load a star table from disk. A missing file is logged and yields no stars.
pub fn load_star_table_from_file<P: AsRef<Path>>(path: P) -> (Vec<Star>, LoadReport) {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => {
            info!("Loading star table from {}", path.display());
            parse_star_table(BufReader::new(file))
        }
        Err(e) => {
            warn!("Star table {} unavailable: {}", path.display(), e);
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

#[cfg(test)]
pub(crate) const HEADER: &str = "id,hip,hd,hr,gl,bf,proper,ra,dec,dist,pmra,pmdec,rv,mag,absmag,spect,ci,x,y,z,vx,vy,vz,rarad,decrad,pmrarad,pmdecrad,bayer,flam,con";
