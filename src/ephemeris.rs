//! Build planet tables from an ephemeris source.
//!
//! The source is anything that can answer "where is this body on this date".
//! Bodies are fetched one at a time, in the order given; a failure for one
//! body is recorded and the rest are still fetched. The result is written in
//! the same ten-column schema the catalog loader reads.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::catalogs::planets::write_planet_table;
use crate::{Planet, Result};

const ARCSEC_PER_DEG: f64 = 3600.0;

/// Solar-system bodies a planet table can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    pub const ALL: [Body; 8] = [
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// Name written to the `body` column.
    pub fn label(&self) -> &'static str {
        match self {
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One body's apparent place on one date, as an ephemeris service reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetRecord {
    pub ra_deg: f64,
    pub dec_deg: f64,
    /// Offset from the nominal position, arcseconds (x, y).
    pub offset_arcsec: [f64; 2],
    pub distance_au: f64,
    pub magnitude: f64,
}

/// Something that can look up a body's position for a date.
#[allow(async_fn_in_trait)]
pub trait EphemerisSource {
    async fn fetch(&self, body: Body, date: NaiveDate) -> anyhow::Result<PlanetRecord>;
}

/// Result of a table build.
#[derive(Debug, Clone)]
pub struct PlanetTable {
    pub planets: Vec<Planet>,
    /// Bodies that could not be fetched, with the reason.
    pub failures: Vec<(Body, String)>,
    /// The table in CSV form, header included.
    pub csv: String,
}

impl PlanetTable {
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), &self.csv)?;
        info!(
            "Wrote {} planet rows to {}",
            self.planets.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

/// Fetch each body in turn and assemble the table.
pub async fn build_planet_table<S: EphemerisSource>(
    source: &S,
    bodies: &[Body],
    date: NaiveDate,
) -> Result<PlanetTable> {
    let date_text = date.format("%Y-%m-%d").to_string();
    let mut planets = Vec::with_capacity(bodies.len());
    let mut failures = Vec::new();

    for &body in bodies {
        match source.fetch(body, date).await {
            Ok(rec) => {
                let offset_rad = rec.offset_arcsec.map(|a| (a / ARCSEC_PER_DEG).to_radians());
                planets.push(Planet {
                    id: planets.len() as u64,
                    body: body.label().to_string(),
                    date: date_text.clone(),
                    ra_deg: rec.ra_deg,
                    dec_deg: rec.dec_deg,
                    offset_arcsec: rec.offset_arcsec,
                    offset_rad,
                    distance_au: rec.distance_au,
                    magnitude: rec.magnitude,
                });
            }
            Err(e) => {
                warn!("Ephemeris fetch for {} on {} failed: {:#}", body, date_text, e);
                failures.push((body, format!("{:#}", e)));
            }
        }
    }

    let mut buf = Vec::new();
    write_planet_table(&mut buf, &planets)?;
    // Every field written above is valid UTF-8
    let csv = String::from_utf8_lossy(&buf).into_owned();

    info!(
        "Built planet table for {}: {} bodies, {} failed",
        date_text,
        planets.len(),
        failures.len()
    );
    Ok(PlanetTable {
        planets,
        failures,
        csv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::planets::parse_planet_table_str;
    use std::cell::RefCell;

    struct MockSource {
        calls: RefCell<Vec<Body>>,
    }

    impl EphemerisSource for MockSource {
        async fn fetch(&self, body: Body, _date: NaiveDate) -> anyhow::Result<PlanetRecord> {
            self.calls.borrow_mut().push(body);
            if body == Body::Mars {
                anyhow::bail!("service returned no data");
            }
            let k = body as usize as f64;
            Ok(PlanetRecord {
                ra_deg: 30.0 * k,
                dec_deg: -5.0 + k,
                offset_arcsec: [3600.0, 0.0],
                distance_au: 1.0 + k,
                magnitude: k - 3.0,
            })
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_rest() {
        let source = MockSource {
            calls: RefCell::new(Vec::new()),
        };
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let table = build_planet_table(&source, &Body::ALL, date).await.unwrap();

        assert_eq!(*source.calls.borrow(), Body::ALL.to_vec());
        assert_eq!(table.planets.len(), 7);
        assert_eq!(table.failures.len(), 1);
        assert_eq!(table.failures[0].0, Body::Mars);
        assert!(table.failures[0].1.contains("no data"));
        assert!(table.planets.iter().all(|p| p.body != "Mars"));
        assert!((table.planets[0].offset_rad[0] - 1.0_f64.to_radians()).abs() < 1e-15);
    }

    #[tokio::test]
    async fn table_reads_back_through_the_loader() {
        let source = MockSource {
            calls: RefCell::new(Vec::new()),
        };
        let date = NaiveDate::from_ymd_opt(2031, 12, 24).unwrap();
        let table = build_planet_table(&source, &[Body::Venus, Body::Saturn], date)
            .await
            .unwrap();
        let (planets, report) = parse_planet_table_str(&table.csv);
        assert_eq!(report.skipped(), 0);
        assert_eq!(planets.len(), 2);
        assert_eq!(planets[1].body, "Saturn");
        assert_eq!(planets[1].date, "2031-12-24");
        assert_eq!(planets[1].ra_deg, 150.0);
        assert_eq!(planets[0].date(), Some(date));
    }
}
