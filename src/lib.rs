//! # skychart
//!
//! Observer-centred sky charts: given where and when you are standing, work
//! out which catalog stars and planets are above the horizon and draw them,
//! either as a live 3D dome or as a flat zenith-centred chart exported to
//! JPEG.
//!
//! ## Features
//!
//! - **Sidereal time**: Julian Date, IAU GMST polynomial, local sidereal time
//!   and hour angle
//! - **Horizon transform**: altitude/azimuth with a pole-safe `atan2` azimuth
//! - **Catalogs**: HYG-style star tables, planet ephemeris snapshots and
//!   constellation line lists, all row-tolerant; parsed catalogs cache with
//!   [rkyv](https://docs.rs/rkyv)
//! - **Projections**: a 3D dome and a 2D azimuthal-equidistant chart, both fed
//!   in brightest-first order
//! - **Chart export**: soft glows, constellation lines, a 5×7 bitmap font with
//!   collision-avoiding label placement, and JPEG encoding (`image` feature)
//! - **Twinkle**: a per-frame, drift-free flicker for the live dome
//!
//! ## Example
//!
//! ```no_run
//! use skychart::{Catalog, CatalogConfig, ObserverSnapshot, Sky};
//! use skychart::observer::parse_local_date_time;
//!
//! let (catalog, report) =
//!     Catalog::load("data/hygdata_v41.csv", Some("data/planets.csv"), &CatalogConfig::default());
//! println!("{} stars loaded, {} rows skipped", report.loaded, report.skipped());
//!
//! let when = parse_local_date_time("2024-06-01", "22:00").unwrap();
//! let observer = ObserverSnapshot::new(40.7128, -74.006, when).unwrap();
//!
//! let mut sky = Sky::default();
//! sky.set_catalog(catalog);
//! sky.set_observer(observer);
//!
//! // Live view: rebuild once, then twinkle every frame
//! sky.render_dome().unwrap();
//! sky.advance(1.0 / 60.0);
//!
//! // Static chart
//! let path = sky.export_chart("charts").unwrap();
//! println!("Saved {}", path.display());
//! ```

pub mod catalog;
/// Raw text formats: HYG star tables, planet tables, constellation lines
pub mod catalogs;
pub mod chart;
pub mod ephemeris;
mod error;
pub mod horizon;
pub mod magnitude;
mod noise;
pub mod observer;
pub mod planet;
pub mod projection;
pub mod record;
pub mod sky;
pub mod star;
pub mod time;
pub mod twinkle;

pub use catalog::{Catalog, CatalogConfig};
pub use catalogs::constellations::ConstellationSegment;
pub use catalogs::LoadReport;
pub use chart::{render_chart, ChartBuffer, ChartConfig};
#[cfg(feature = "image")]
pub use chart::{encode_jpeg, save_chart};
pub use ephemeris::{build_planet_table, Body, EphemerisSource, PlanetRecord, PlanetTable};
pub use error::{Result, SkyError};
pub use horizon::HorizonPosition;
pub use magnitude::MagnitudeStyle;
pub use observer::ObserverSnapshot;
pub use planet::Planet;
pub use projection::{
    project_visible, ChartPoint, ChartProjection, DomeConfig, DomeProjection, Projected,
    Projection,
};
pub use record::CelestialRecord;
pub use sky::Sky;
pub use star::Star;
pub use time::LocalDateTime;
pub use twinkle::{LivePoint, PointCloud, Twinkle, TwinkleConfig};
