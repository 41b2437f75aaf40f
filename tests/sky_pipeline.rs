//! End-to-end tests: parse catalog text, build an observer, project, render
//! and export, all through the public API with inline fixtures.

use chrono::{FixedOffset, NaiveDate, TimeZone};
use skychart::catalogs::constellations::parse_constellation_lines;
use skychart::observer::{parse_latitude, parse_local_date_time, parse_longitude};
use skychart::{
    project_visible, render_chart, Body, Catalog, CatalogConfig, ChartConfig, DomeProjection,
    EphemerisSource, ObserverSnapshot, PlanetRecord, Sky, SkyError,
};

const STAR_HEADER: &str = "id,hip,hd,hr,gl,bf,proper,ra,dec,dist,pmra,pmdec,rv,mag,absmag,spect,ci,x,y,z,vx,vy,vz,rarad,decrad,pmrarad,pmdecrad";

/// A 27-column HYG row with only the fields these tests care about.
fn star_row(id: u64, hd: Option<u32>, proper: &str, ra_hours: f64, dec: f64, mag: f64) -> String {
    let mut cells = vec![String::new(); 27];
    cells[0] = id.to_string();
    cells[2] = hd.map(|h| h.to_string()).unwrap_or_default();
    cells[6] = proper.to_string();
    cells[7] = ra_hours.to_string();
    cells[8] = dec.to_string();
    cells[13] = mag.to_string();
    cells.join(",")
}

fn star_table(rows: &[String]) -> String {
    let mut text = String::from(STAR_HEADER);
    for r in rows {
        text.push('\n');
        text.push_str(r);
    }
    text.push('\n');
    text
}

fn fixture_rows() -> Vec<String> {
    vec![
        star_row(11767, Some(8890), "Polaris", 2.5303, 89.264, 1.98),
        star_row(91262, Some(172167), "Vega", 18.6156, 38.78, 0.03),
        star_row(69673, Some(124897), "Arcturus", 14.261, 19.18, -0.05),
        // Never rises at 40N
        star_row(5, None, "", 5.0, -80.0, 2.5),
        // Too faint for the default limit
        star_row(6, None, "", 14.0, 30.0, 7.2),
    ]
}

const PLANETS: &str = "body,date,ra_deg,dec_deg,x_arcsec,y_arcsec,x_rad,y_rad,distance_au,magnitude
Saturn,2024-05-01,120.0,10.0,0,0,0,0,9.8,0.9
Saturn,2024-06-01,210.0,10.0,0,0,0,0,9.7,0.8
Jupiter,2024-06-01,60.0,20.0,0,0,0,0,5.9,-2.0
";

fn new_york() -> ObserverSnapshot {
    let lat = parse_latitude("40 42.768 N").unwrap();
    let lon = parse_longitude("74°0.36'W").unwrap();
    let naive = parse_local_date_time("2024-06-01", "22:00").unwrap();
    let edt = FixedOffset::west_opt(4 * 3600).unwrap();
    ObserverSnapshot::new(lat, lon, edt.from_local_datetime(&naive).unwrap()).unwrap()
}

#[test]
fn load_project_and_render() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();

    let (catalog, report) = Catalog::from_tables(
        &star_table(&fixture_rows()),
        Some(PLANETS),
        &CatalogConfig::default(),
    );
    assert_eq!(report.skipped(), 0);
    assert_eq!(catalog.len(), 8);
    // Faint star dropped; Jupiter and both Saturn rows kept
    assert_eq!(catalog.visible_len(), 7);

    let observer = new_york();
    assert!((observer.latitude_deg() - 40.7128).abs() < 1e-9);
    assert!((observer.longitude_deg() + 74.006).abs() < 1e-9);

    let projected = project_visible(&observer, &catalog, &DomeProjection { radius: 100.0 });
    let names: Vec<&str> = projected
        .iter()
        .map(|p| p.record.display_name().unwrap_or("?"))
        .collect();
    // Jupiter sits near the Sun in June; the May Saturn row is superseded
    assert_eq!(names, vec!["Arcturus", "Vega", "Saturn", "Polaris"]);
    for p in &projected {
        assert!(p.horizon.altitude_rad > 0.0);
        assert!((p.point.norm() - 100.0).abs() < 1e-9);
    }
    let polaris = projected.last().unwrap();
    assert!((polaris.horizon.altitude_rad.to_degrees() - 40.0).abs() < 1.0);

    let config = ChartConfig {
        width: 400,
        height: 400,
        ..ChartConfig::default()
    };
    let (lines, _) = parse_constellation_lines("Boo,124897,172167\n");
    let chart = render_chart(&observer, &catalog, &lines, &config);
    assert_eq!((chart.width(), chart.height()), (400, 400));
    let lit = chart
        .pixels()
        .iter()
        .filter(|p| **p != config.background)
        .count();
    assert!(lit > 0);
    assert!(chart.pixels().iter().any(|p| *p == config.label_color));
}

#[test]
fn short_row_is_skipped_and_counted() {
    let rows = fixture_rows();
    let mut with_bad = rows.clone();
    with_bad.insert(2, "99,1,2".to_string());

    let (good, _) = Catalog::from_tables(&star_table(&rows), None, &CatalogConfig::default());
    let (bad, report) =
        Catalog::from_tables(&star_table(&with_bad), None, &CatalogConfig::default());

    // The short row contributes nothing: same stars as the fixture without it
    assert_eq!(bad.len(), good.len());
    assert_eq!(report.rows_read, rows.len() + 1);
    assert_eq!(report.loaded, report.rows_read - 1);
    assert_eq!(report.skipped(), 1);
    match &report.issues[0] {
        SkyError::MalformedRecord { line, .. } => assert_eq!(*line, 4),
        other => panic!("unexpected issue {:?}", other),
    }
}

#[test]
fn equal_magnitudes_order_by_id() {
    let rows = vec![
        star_row(100, None, "", 1.0, 10.0, 1.0),
        star_row(50, None, "", 2.0, 20.0, 1.0),
        star_row(75, None, "", 3.0, 30.0, 0.5),
    ];
    let (catalog, _) = Catalog::from_tables(&star_table(&rows), None, &CatalogConfig::default());
    let ids: Vec<u64> = catalog.visible().map(|r| r.id()).collect();
    assert_eq!(ids, vec![75, 50, 100]);
}

#[test]
fn missing_files_give_an_empty_catalog() {
    let (catalog, report) = Catalog::load(
        "/nonexistent/stars.csv",
        Some("/nonexistent/planets.csv"),
        &CatalogConfig::default(),
    );
    assert!(catalog.is_empty());
    assert!(report.missing_resource());
    assert_eq!(report.issues.len(), 2);
}

#[test]
fn catalog_files_and_cache_round_trip() {
    let dir = std::env::temp_dir().join(format!("skychart-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let stars = dir.join("stars.csv");
    let planets = dir.join("planets.csv");
    let cache = dir.join("catalog.rkyv");
    std::fs::write(&stars, star_table(&fixture_rows())).unwrap();
    std::fs::write(&planets, PLANETS).unwrap();

    let (catalog, report) = Catalog::load(&stars, Some(&planets), &CatalogConfig::default());
    assert_eq!(report.issues.len(), 0);
    catalog.save_to_file(&cache).unwrap();
    let cached = Catalog::load_from_file(&cache).unwrap();

    let a: Vec<u64> = catalog.visible().map(|r| r.id()).collect();
    let b: Vec<u64> = cached.visible().map(|r| r.id()).collect();
    assert_eq!(a, b);
    assert_eq!(cached.star_by_hd(172167).and_then(|s| s.proper.as_deref()), Some("Vega"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn session_reports_missing_inputs() {
    let mut sky = Sky::default();
    assert!(matches!(
        sky.render_dome(),
        Err(SkyError::MissingPrerequisite(_))
    ));
    sky.set_observer(new_york());
    assert!(matches!(
        sky.render_chart(),
        Err(SkyError::MissingPrerequisite("catalog"))
    ));

    let (catalog, _) = Catalog::from_tables(
        &star_table(&fixture_rows()),
        Some(PLANETS),
        &CatalogConfig::default(),
    );
    sky.set_catalog(catalog);
    let n = sky.render_dome().unwrap().len();
    assert_eq!(n, 4);
    for _ in 0..120 {
        sky.advance(1.0 / 60.0);
    }
    assert_eq!(sky.point_cloud().len(), n);
    for p in sky.point_cloud().points() {
        assert!(p.alpha > 0.0 && p.alpha <= 1.0);
        assert!(p.size > 0.0);
    }
}

#[test]
fn observer_range_is_enforced() {
    let naive = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert!(matches!(
        ObserverSnapshot::new(91.0, 0.0, naive),
        Err(SkyError::InvalidObserver { .. })
    ));
    assert!(matches!(
        ObserverSnapshot::new(0.0, -181.0, naive),
        Err(SkyError::InvalidObserver { .. })
    ));
    let too_late = NaiveDate::from_ymd_opt(2100, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert!(ObserverSnapshot::new(0.0, 0.0, too_late.and_utc()).is_err());
}

struct FixedSource;

impl EphemerisSource for FixedSource {
    async fn fetch(&self, body: Body, _date: NaiveDate) -> anyhow::Result<PlanetRecord> {
        match body {
            Body::Venus => anyhow::bail!("timed out"),
            _ => Ok(PlanetRecord {
                ra_deg: 210.0,
                dec_deg: 5.0,
                offset_arcsec: [0.0, 0.0],
                distance_au: 1.5,
                magnitude: 1.0,
            }),
        }
    }
}

#[tokio::test]
async fn ephemeris_table_feeds_the_catalog() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let table = skychart::build_planet_table(&FixedSource, &[Body::Venus, Body::Mars], date)
        .await
        .unwrap();
    assert_eq!(table.failures.len(), 1);

    let (catalog, report) = Catalog::from_tables(
        &star_table(&fixture_rows()),
        Some(&table.csv),
        &CatalogConfig::default(),
    );
    assert_eq!(report.skipped(), 0);
    assert_eq!(catalog.planets().count(), 1);

    let projected = project_visible(&new_york(), &catalog, &DomeProjection { radius: 1.0 });
    assert!(projected.iter().any(|p| p.record.display_name() == Some("Mars")));
}
