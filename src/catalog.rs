//! Loaded celestial records and their brightness-ordered visible subset.
//!
//! `Catalog` owns every record read from the star and planet tables for the
//! life of a viewing session. The visible set is computed in the same pass
//! that builds the catalog: records with a magnitude at or below the limit,
//! sorted brightest first with the record id as a stable tie-break. Render
//! passes iterate it as-is and never re-sort.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use rkyv::{Archive, Deserialize, Serialize};
use tracing::info;

use crate::catalogs::hyg::{load_star_table_from_file, parse_star_table_str};
use crate::catalogs::planets::{load_planet_table_from_file, parse_planet_table_str};
use crate::catalogs::LoadReport;
use crate::{CelestialRecord, Planet, Star};

/// Parameters controlling which records are considered visible.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Faintest apparent magnitude kept in the visible set. Default 6.0.
    pub magnitude_limit: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            magnitude_limit: 6.0,
        }
    }
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct Catalog {
    magnitude_limit: f64,
    records: Vec<CelestialRecord>,
    /// Indices into `records`, brightest first.
    visible: Vec<u32>,
    /// `(hd, record index)` sorted by HD number, load order within equal HD.
    hd_index: Vec<(u32, u32)>,
}

impl Catalog {
    /// Build a catalog from parsed stars and planet snapshots.
    pub fn new(stars: Vec<Star>, planets: Vec<Planet>, config: &CatalogConfig) -> Self {
        let limit = config.magnitude_limit;
        let mut records: Vec<CelestialRecord> = Vec::with_capacity(stars.len() + planets.len());
        let mut visible = Vec::new();

        let all = stars
            .into_iter()
            .map(CelestialRecord::from)
            .chain(planets.into_iter().map(CelestialRecord::from));
        for record in all {
            let mag = record.magnitude();
            if !mag.is_nan() && mag <= limit {
                visible.push(records.len() as u32);
            }
            records.push(record);
        }

        visible.sort_by(|&a, &b| records[a as usize].visible_order(&records[b as usize]));

        let mut hd_index: Vec<(u32, u32)> = records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| Some((r.as_star()?.hd?, i as u32)))
            .collect();
        hd_index.sort_by_key(|&(hd, _)| hd);

        info!(
            "Catalog holds {} records, {} at or brighter than magnitude {:.1}",
            records.len(),
            visible.len(),
            limit
        );

        Self {
            magnitude_limit: limit,
            records,
            visible,
            hd_index,
        }
    }

    /// Parse in-memory star and (optionally) planet tables.
    pub fn from_tables(
        star_table: &str,
        planet_table: Option<&str>,
        config: &CatalogConfig,
    ) -> (Self, LoadReport) {
        let (stars, mut report) = parse_star_table_str(star_table);
        let planets = match planet_table {
            Some(text) => {
                let (planets, planet_report) = parse_planet_table_str(text);
                report.merge(planet_report);
                planets
            }
            None => Vec::new(),
        };
        (Self::new(stars, planets, config), report)
    }

    /// Load star and (optionally) planet tables from disk.
    ///
    /// Missing files are logged and contribute nothing; the catalog is still
    /// built from whatever could be read.
    pub fn load<P: AsRef<Path>>(
        star_path: P,
        planet_path: Option<P>,
        config: &CatalogConfig,
    ) -> (Self, LoadReport) {
        let (stars, mut report) = load_star_table_from_file(star_path);
        let planets = match planet_path {
            Some(path) => {
                let (planets, planet_report) = load_planet_table_from_file(path);
                report.merge(planet_report);
                planets
            }
            None => Vec::new(),
        };
        (Self::new(stars, planets, config), report)
    }

    pub fn magnitude_limit(&self) -> f64 {
        self.magnitude_limit
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every loaded record, in load order.
    pub fn records(&self) -> &[CelestialRecord] {
        &self.records
    }

    pub fn stars(&self) -> impl Iterator<Item = &Star> {
        self.records.iter().filter_map(CelestialRecord::as_star)
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.records.iter().filter_map(CelestialRecord::as_planet)
    }

    /// Number of records in the visible set.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Indices into [`Catalog::records`] in visible order.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible.iter().map(|&i| i as usize)
    }

    /// The visible set, brightest first.
    pub fn visible(&self) -> impl Iterator<Item = &CelestialRecord> {
        self.visible.iter().map(move |&i| &self.records[i as usize])
    }

    /// Record indices of the planet snapshots to draw for `date`: per body,
    /// the row with the nearest date. Undated rows are used only for a body
    /// with no dated rows; ties go to the earlier row.
    pub fn planet_snapshots_for(&self, date: NaiveDate) -> Vec<usize> {
        // body -> (distance in days, record index); BTreeMap keeps output order stable
        let mut best: BTreeMap<&str, (i64, usize)> = BTreeMap::new();
        for (idx, record) in self.records.iter().enumerate() {
            let Some(planet) = record.as_planet() else {
                continue;
            };
            let distance = planet
                .date()
                .map_or(i64::MAX, |d| (d - date).num_days().abs());
            best.entry(planet.body.as_str())
                .and_modify(|cur| {
                    if distance < cur.0 {
                        *cur = (distance, idx);
                    }
                })
                .or_insert((distance, idx));
        }
        let mut out: Vec<usize> = best.into_values().map(|(_, idx)| idx).collect();
        out.sort_unstable();
        out
    }

    /// Find a star by its Henry Draper number.
    ///
    /// When several stars share the number, the first loaded one is returned.
    pub fn star_by_hd(&self, hd: u32) -> Option<&Star> {
        let pos = self.hd_index.partition_point(|&(h, _)| h < hd);
        let &(found, idx) = self.hd_index.get(pos)?;
        if found != hd {
            return None;
        }
        self.records[idx as usize].as_star()
    }
}

// ── Serialization ───────────────────────────────────────────────────────────

impl Catalog {
    /// Serialize the parsed catalog with rkyv.
    pub fn to_rkyv_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map_err(|e| anyhow::anyhow!("rkyv serialization failed: {}", e))?;
        Ok(bytes.to_vec())
    }

    /// Save the parsed catalog so later sessions can skip text parsing.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let bytes = self.to_rkyv_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            "Saved catalog to {} ({} bytes)",
            path.as_ref().display(),
            bytes.len()
        );
        Ok(())
    }

    /// Load a catalog written by [`Catalog::save_to_file`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let raw = std::fs::read(path.as_ref())?;
        let mut bytes = rkyv::util::AlignedVec::<16>::new();
        bytes.extend_from_slice(&raw);
        let catalog = rkyv::from_bytes::<Self, rkyv::rancor::Error>(&bytes)
            .map_err(|e| anyhow::anyhow!("rkyv deserialization failed: {}", e))?;
        info!(
            "Loaded catalog: {} records, {} visible",
            catalog.len(),
            catalog.visible_len()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star::test_star;

    fn planet(id: u64, body: &str, date: &str, mag: f64) -> Planet {
        Planet {
            id,
            body: body.to_string(),
            date: date.to_string(),
            ra_deg: 100.0,
            dec_deg: 10.0,
            offset_arcsec: [0.0; 2],
            offset_rad: [0.0; 2],
            distance_au: 1.0,
            magnitude: mag,
        }
    }

    #[test]
    fn visible_set_filters_and_sorts() {
        let stars = vec![
            test_star(100, 0.0, 0.0, 1.0),
            test_star(7, 0.0, 0.0, 6.5),
            test_star(50, 0.0, 0.0, 1.0),
            test_star(3, 0.0, 0.0, f64::NAN),
            test_star(9, 0.0, 0.0, -0.5),
            test_star(11, 0.0, 0.0, 6.0),
        ];
        let catalog = Catalog::new(stars, Vec::new(), &CatalogConfig::default());
        assert_eq!(catalog.len(), 6);
        let ids: Vec<u64> = catalog.visible().map(|r| r.id()).collect();
        assert_eq!(ids, vec![9, 50, 100, 11]);
    }

    #[test]
    fn magnitude_limit_is_configurable() {
        let stars = vec![test_star(1, 0.0, 0.0, 3.0), test_star(2, 0.0, 0.0, 4.5)];
        let config = CatalogConfig {
            magnitude_limit: 4.0,
        };
        let catalog = Catalog::new(stars, Vec::new(), &config);
        assert_eq!(catalog.visible_len(), 1);
        assert_eq!(catalog.magnitude_limit(), 4.0);
    }

    #[test]
    fn planets_join_the_visible_set() {
        let stars = vec![test_star(1, 0.0, 0.0, 0.5)];
        let planets = vec![
            planet(0, "Venus", "2024-06-01", -3.9),
            planet(1, "Neptune", "2024-06-01", 7.8),
        ];
        let catalog = Catalog::new(stars, planets, &CatalogConfig::default());
        let visible: Vec<&CelestialRecord> = catalog.visible().collect();
        assert_eq!(visible.len(), 2);
        assert!(visible[0].is_planet());
        assert_eq!(catalog.planets().count(), 2);
    }

    #[test]
    fn nearest_planet_snapshot_per_body() {
        let planets = vec![
            planet(0, "Mars", "2024-05-30", 1.0),
            planet(1, "Mars", "2024-06-02", 1.0),
            planet(2, "Venus", "2024-06-10", -3.9),
            planet(3, "Moon", "unknown", -12.0),
            planet(4, "Mars", "2024-06-04", 1.0),
        ];
        let catalog = Catalog::new(Vec::new(), planets, &CatalogConfig::default());
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let picked: Vec<u64> = catalog
            .planet_snapshots_for(date)
            .into_iter()
            .map(|i| catalog.records()[i].id())
            .collect();
        assert_eq!(picked, vec![1, 2, 3]);
    }

    #[test]
    fn lookup_by_hd() {
        let mut vega = test_star(5, 279.2, 38.8, 0.03);
        vega.hd = Some(172167);
        let catalog = Catalog::new(vec![vega], Vec::new(), &CatalogConfig::default());
        assert_eq!(catalog.star_by_hd(172167).map(|s| s.id), Some(5));
        assert!(catalog.star_by_hd(1).is_none());
    }

    #[test]
    fn hd_lookup_over_many_stars() {
        let stars: Vec<Star> = (0..500u32)
            .rev()
            .map(|i| {
                let mut s = test_star(i as u64, 0.0, 0.0, 3.0);
                // Every third star has no HD number
                s.hd = (i % 3 != 0).then_some(i * 10);
                s
            })
            .collect();
        let mut twin = test_star(9999, 0.0, 0.0, 3.0);
        twin.hd = Some(40);
        let mut all = stars;
        all.push(twin);
        let catalog = Catalog::new(all, Vec::new(), &CatalogConfig::default());

        assert_eq!(catalog.star_by_hd(4990).map(|s| s.id), Some(499));
        assert_eq!(catalog.star_by_hd(10).map(|s| s.id), Some(1));
        assert!(catalog.star_by_hd(30).is_none());
        assert!(catalog.star_by_hd(15).is_none());
        assert!(catalog.star_by_hd(u32::MAX).is_none());
        // Shared HD number: the first loaded star wins
        assert_eq!(catalog.star_by_hd(40).map(|s| s.id), Some(4));
    }

    #[test]
    fn unknown_ids_sort_last_among_equals() {
        let stars = vec![
            test_star(crate::star::UNKNOWN_ID, 0.0, 0.0, 2.0),
            test_star(8, 0.0, 0.0, 2.0),
            test_star(3, 0.0, 0.0, 2.5),
        ];
        let catalog = Catalog::new(stars, Vec::new(), &CatalogConfig::default());
        let ids: Vec<u64> = catalog.visible().map(|r| r.id()).collect();
        assert_eq!(ids, vec![8, crate::star::UNKNOWN_ID, 3]);
    }

    #[test]
    fn rkyv_cache_preserves_order() {
        let stars = vec![test_star(2, 10.0, 10.0, 2.0), test_star(1, 20.0, 20.0, 1.0)];
        let catalog = Catalog::new(
            stars,
            vec![planet(0, "Mars", "2024-06-01", 1.5)],
            &CatalogConfig::default(),
        );
        let path = std::env::temp_dir().join(format!("skychart-cache-{}.rkyv", std::process::id()));
        catalog.save_to_file(&path).unwrap();
        let loaded = Catalog::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let a: Vec<u64> = catalog.visible().map(|r| r.id()).collect();
        let b: Vec<u64> = loaded.visible().map(|r| r.id()).collect();
        assert_eq!(a, b);
        assert_eq!(loaded.len(), catalog.len());
        assert_eq!(loaded.planets().next().map(|p| p.body.as_str()), Some("Mars"));
        assert!(loaded.stars().all(|s| s.distance_pc.is_nan()));
    }
}
