//! Static sky chart rendering.
//!
//! A chart is a zenith-centered azimuthal-equidistant view of the sky above
//! an observer, drawn into an RGB [`ChartBuffer`]. Layers are composited in
//! a fixed order:
//!
//! 1. background fill
//! 2. horizon ring
//! 3. constellation lines
//! 4. star and planet glows, brightest first
//! 5. labels
//!
//! The chart is drawn with north toward larger row indices and flipped once
//! at the end, so row 0 of the returned buffer is the top of a north-up
//! image.
//!
//! JPEG encoding lives in [`export`] and requires the `image` feature.

use std::collections::HashMap;

use tracing::debug;

use crate::catalogs::constellations::ConstellationSegment;
use crate::magnitude::MagnitudeStyle;
use crate::projection::{project_visible, ChartPoint, ChartProjection};
use crate::{Catalog, ObserverSnapshot};

#[cfg(feature = "image")]
pub mod export;
pub mod font;
pub mod labels;
pub mod raster;

#[cfg(feature = "image")]
pub use export::{encode_jpeg, save_chart};
pub use labels::{LabelCandidate, PlacedLabel};
pub use raster::{ChartBuffer, Rgb};

/// Chart layout and appearance.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Image width in pixels.
    /// Default: 1024
    pub width: u32,
    /// Image height in pixels.
    /// Default: 1024
    pub height: u32,
    /// Gap between the horizon circle and the nearest image edge.
    /// Default: 16
    pub margin: u32,
    /// Default: near-black blue
    pub background: Rgb,

    /// Draw the horizon circle.
    /// Default: true
    pub horizon_ring: bool,
    /// Default: 2.0
    pub ring_thickness: f64,
    pub ring_color: Rgb,

    /// Solid core drawn over each planet's white glow, so planets read
    /// apart from stars.
    /// Default: pale amber
    pub planet_color: Rgb,

    /// Draw constellation stick figures between visible stars.
    /// Default: true
    pub constellation_lines: bool,
    pub line_color: Rgb,
    /// Line width; each Bresenham step stamps a disc of radius `thickness - 1`.
    /// Default: 1
    pub line_thickness: u32,

    /// Draw names next to bright named objects.
    /// Default: true
    pub labels: bool,
    /// Only objects at or brighter than this magnitude get a label.
    /// Default: 1.5
    pub label_magnitude_cutoff: f64,
    /// Integer scale applied to the 5×7 font.
    /// Default: 1
    pub label_scale: u32,
    /// Reject label positions that overlap an earlier label.
    /// Default: true
    pub label_collision_avoidance: bool,
    /// Occupancy grid cell size in pixels.
    /// Default: 4
    pub label_cell_size: u32,
    pub label_color: Rgb,

    /// JPEG quality, 1-100.
    /// Default: 90
    pub jpeg_quality: u8,

    /// Glow radius and opacity by magnitude, in pixels. The limit is taken
    /// from the catalog at render time.
    pub style: MagnitudeStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            margin: 16,
            background: [6, 8, 20],
            horizon_ring: true,
            ring_thickness: 2.0,
            ring_color: [90, 110, 150],
            planet_color: [255, 214, 140],
            constellation_lines: true,
            line_color: [60, 80, 120],
            line_thickness: 1,
            labels: true,
            label_magnitude_cutoff: 1.5,
            label_scale: 1,
            label_collision_avoidance: true,
            label_cell_size: 4,
            label_color: [200, 200, 210],
            jpeg_quality: 90,
            style: MagnitudeStyle::default(),
        }
    }
}

impl ChartConfig {
    pub fn projection(&self) -> ChartProjection {
        ChartProjection::for_image(self.width, self.height, self.margin)
    }
}

/// Render the sky above `observer` into a north-up chart.
pub fn render_chart(
    observer: &ObserverSnapshot,
    catalog: &Catalog,
    segments: &[ConstellationSegment],
    config: &ChartConfig,
) -> ChartBuffer {
    let mut buf = ChartBuffer::new(config.width, config.height, config.background);
    let projection = config.projection();

    if config.horizon_ring {
        raster::circle_outline(
            &mut buf,
            projection.center_x,
            projection.center_y,
            projection.radius_px,
            config.ring_thickness,
            config.ring_color,
        );
    }

    let projected = project_visible(observer, catalog, &projection);

    let mut lines_drawn = 0usize;
    if config.constellation_lines && !segments.is_empty() {
        let by_hd: HashMap<u32, ChartPoint> = projected
            .iter()
            .filter(|p| p.point.valid)
            .filter_map(|p| Some((p.record.as_star()?.hd?, p.point)))
            .collect();
        for seg in segments {
            if let (Some(a), Some(b)) = (by_hd.get(&seg.hd_a), by_hd.get(&seg.hd_b)) {
                raster::thick_line(
                    &mut buf,
                    (a.x, a.y),
                    (b.x, b.y),
                    config.line_thickness,
                    config.line_color,
                );
                lines_drawn += 1;
            }
        }
    }

    let style = config.style.with_limit(catalog.magnitude_limit());
    for p in projected.iter().filter(|p| p.point.valid) {
        let radius = style.radius(p.magnitude);
        raster::soft_dot(&mut buf, p.point.x, p.point.y, radius, style.alpha(p.magnitude));
        if p.record.is_planet() {
            raster::fill_disc(
                &mut buf,
                p.point.x,
                p.point.y,
                (radius / 3.0).floor() as i32,
                config.planet_color,
            );
        }
    }

    let mut labels_drawn = 0usize;
    if config.labels {
        let candidates: Vec<LabelCandidate> = projected
            .iter()
            .filter(|p| p.point.valid && p.magnitude <= config.label_magnitude_cutoff)
            .filter_map(|p| {
                let text = font::sanitize_label(p.record.display_name()?);
                (!text.is_empty()).then(|| LabelCandidate {
                    text,
                    x: p.point.x,
                    y: p.point.y,
                    magnitude: p.magnitude,
                })
            })
            .collect();
        let placed = labels::place_labels(
            candidates,
            config.width,
            config.height,
            config.label_scale,
            config.label_cell_size,
            config.label_collision_avoidance,
        );
        for label in &placed {
            font::draw_text(
                &mut buf,
                label.x,
                label.y,
                &label.text,
                config.label_scale,
                config.label_color,
            );
        }
        labels_drawn = placed.len();
    }

    raster::flip_vertical(&mut buf);

    debug!(
        "Rendered {}x{} chart: {} objects, {} constellation lines, {} labels",
        config.width,
        config.height,
        projected.len(),
        lines_drawn,
        labels_drawn
    );
    buf
}

fn format_coordinate(value: f64, positive: char, negative: char) -> String {
    let hemisphere = if value < 0.0 { negative } else { positive };
    format!("{:.4}{}", value.abs(), hemisphere)
}

/// `skychart_<yyyyMMdd_HHmm>_<lat>_<lon>.jpg`, stamped with the observer's
/// local wall-clock time.
pub fn chart_file_name(observer: &ObserverSnapshot) -> String {
    format!(
        "skychart_{}_{}_{}.jpg",
        observer.local().wall_clock().format("%Y%m%d_%H%M"),
        format_coordinate(observer.latitude_deg(), 'N', 'S'),
        format_coordinate(observer.longitude_deg(), 'E', 'W'),
    )
}
