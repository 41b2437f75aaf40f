//! A viewing session: one catalog, one observer, one live dome.

#[cfg(feature = "image")]
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalogs::constellations::ConstellationSegment;
use crate::chart::{render_chart, ChartBuffer, ChartConfig};
use crate::projection::{project_visible, DomeConfig};
use crate::twinkle::{PointCloud, Twinkle, TwinkleConfig};
use crate::{Catalog, ObserverSnapshot, Result, SkyError};

/// Catalog, observer and dome state for an interactive view.
///
/// Re-rendering and twinkle both take `&mut self`, so a re-render always
/// finishes resizing the point cloud before the next twinkle pass sees it.
#[derive(Debug)]
pub struct Sky {
    catalog: Option<Catalog>,
    observer: Option<ObserverSnapshot>,
    constellations: Vec<ConstellationSegment>,
    dome: DomeConfig,
    chart: ChartConfig,
    cloud: PointCloud,
    twinkle: Twinkle,
}

impl Default for Sky {
    fn default() -> Self {
        Self::new(DomeConfig::default(), ChartConfig::default(), TwinkleConfig::default())
    }
}

impl Sky {
    pub fn new(dome: DomeConfig, chart: ChartConfig, twinkle: TwinkleConfig) -> Self {
        Self {
            catalog: None,
            observer: None,
            constellations: Vec::new(),
            dome,
            chart,
            cloud: PointCloud::default(),
            twinkle: Twinkle::new(twinkle),
        }
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
    }

    pub fn set_observer(&mut self, observer: ObserverSnapshot) {
        self.observer = Some(observer);
    }

    pub fn set_constellations(&mut self, segments: Vec<ConstellationSegment>) {
        self.constellations = segments;
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn observer(&self) -> Option<&ObserverSnapshot> {
        self.observer.as_ref()
    }

    pub fn chart_config(&self) -> &ChartConfig {
        &self.chart
    }

    pub fn chart_config_mut(&mut self) -> &mut ChartConfig {
        &mut self.chart
    }

    /// The live dome as of the last render and twinkle pass.
    pub fn point_cloud(&self) -> &PointCloud {
        &self.cloud
    }

    fn inputs(&self) -> Result<(&ObserverSnapshot, &Catalog)> {
        let observer = self
            .observer
            .as_ref()
            .ok_or(SkyError::MissingPrerequisite("observer"))?;
        let catalog = self
            .catalog
            .as_ref()
            .ok_or(SkyError::MissingPrerequisite("catalog"))?;
        Ok((observer, catalog))
    }

    /// Rebuild the live dome for the current observer.
    ///
    /// On error the previous point cloud is left untouched.
    pub fn render_dome(&mut self) -> Result<&PointCloud> {
        let observer = self
            .observer
            .as_ref()
            .ok_or(SkyError::MissingPrerequisite("observer"))?;
        let catalog = self
            .catalog
            .as_ref()
            .ok_or(SkyError::MissingPrerequisite("catalog"))?;
        let projected = project_visible(observer, catalog, &self.dome.projection());
        let style = self.dome.style.with_limit(catalog.magnitude_limit());
        let cloud = self.twinkle.generate(&projected, &style);
        debug!("Dome rebuilt with {} points", cloud.len());
        self.cloud = cloud;
        Ok(&self.cloud)
    }

    /// Run one twinkle pass over the live dome.
    pub fn advance(&mut self, dt: f64) {
        self.twinkle.advance(dt, &mut self.cloud);
    }

    /// Render a chart of the current sky without writing it anywhere.
    pub fn render_chart(&self) -> Result<ChartBuffer> {
        let (observer, catalog) = self.inputs()?;
        Ok(render_chart(observer, catalog, &self.constellations, &self.chart))
    }

    /// Render a chart and save it as JPEG into `dir`.
    #[cfg(feature = "image")]
    pub fn export_chart<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let (observer, _) = self.inputs()?;
        let buffer = self.render_chart()?;
        let path = crate::chart::save_chart(&buffer, dir, observer, self.chart.jpeg_quality)?;
        tracing::info!("Exported chart {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star::test_star;
    use crate::CatalogConfig;
    use chrono::NaiveDate;

    fn observer() -> ObserverSnapshot {
        let naive = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        ObserverSnapshot::new(40.0, -74.0, naive.and_utc()).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                test_star(1, 0.0, 90.0, 0.5),
                test_star(2, 0.0, 89.0, 3.0),
                test_star(3, 0.0, 88.0, 5.5),
                test_star(4, 0.0, -89.0, 1.0),
            ],
            Vec::new(),
            &CatalogConfig::default(),
        )
    }

    #[test]
    fn render_needs_observer_and_catalog() {
        let mut sky = Sky::default();
        assert!(matches!(
            sky.render_dome(),
            Err(SkyError::MissingPrerequisite("observer"))
        ));
        sky.set_observer(observer());
        assert!(matches!(
            sky.render_dome(),
            Err(SkyError::MissingPrerequisite("catalog"))
        ));
        assert!(matches!(
            sky.render_chart(),
            Err(SkyError::MissingPrerequisite("catalog"))
        ));
        assert!(sky.point_cloud().is_empty());
    }

    #[test]
    fn render_then_twinkle() {
        let mut sky = Sky::default();
        sky.set_observer(observer());
        sky.set_catalog(catalog());
        assert_eq!(sky.render_dome().unwrap().len(), 3);
        let before = sky.point_cloud().clone();
        sky.advance(0.25);
        let after = sky.point_cloud();
        assert_eq!(after.len(), 3);
        for (a, b) in before.points().iter().zip(after.points()) {
            assert_eq!(a.base_size, b.base_size);
            assert_eq!(a.position, b.position);
        }
        // Brightest first
        assert!(after.points()[0].base_size > after.points()[2].base_size);
    }

    #[test]
    fn dome_sizes_follow_the_catalog_limit() {
        let config = CatalogConfig {
            magnitude_limit: 4.0,
        };
        let mut sky = Sky::default();
        sky.set_observer(observer());
        sky.set_catalog(Catalog::new(
            vec![test_star(1, 0.0, 89.5, 4.0), test_star(2, 0.0, 88.0, 0.0)],
            Vec::new(),
            &config,
        ));
        let style = DomeConfig::default().style;
        let cloud = sky.render_dome().unwrap();
        let faintest = &cloud.points()[1];
        assert_eq!(faintest.base_size, style.min_radius);
        assert_eq!(faintest.base_alpha, style.min_alpha);
        assert_eq!(cloud.points()[0].base_size, style.max_radius);
    }

    #[test]
    fn rerender_resizes_cloud() {
        let mut sky = Sky::default();
        sky.set_observer(observer());
        sky.set_catalog(catalog());
        sky.render_dome().unwrap();
        sky.set_catalog(Catalog::new(
            vec![test_star(9, 0.0, 90.0, 1.0)],
            Vec::new(),
            &CatalogConfig::default(),
        ));
        assert_eq!(sky.render_dome().unwrap().len(), 1);
        sky.advance(0.1);
        assert_eq!(sky.point_cloud().len(), 1);
    }

    #[cfg(feature = "image")]
    #[test]
    fn export_requires_inputs_and_writes_jpeg() {
        let dir = std::env::temp_dir().join(format!("skychart-sky-{}", std::process::id()));
        let mut sky = Sky::default();
        assert!(matches!(
            sky.export_chart(&dir),
            Err(SkyError::MissingPrerequisite(_))
        ));
        assert!(!dir.exists());
        sky.set_observer(observer());
        sky.set_catalog(catalog());
        sky.chart_config_mut().width = 128;
        sky.chart_config_mut().height = 128;
        let path = sky.export_chart(&dir).unwrap();
        assert!(path.exists());
        assert!(path.to_string_lossy().ends_with("40.0000N_74.0000W.jpg"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
