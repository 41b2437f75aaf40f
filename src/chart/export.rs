//! JPEG encoding and saving of rendered charts.
//!
//! Requires the `image` feature.

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use tracing::info;

use super::{chart_file_name, ChartBuffer};
use crate::{ObserverSnapshot, Result};

/// Encode a chart as JPEG. `quality` is clamped to 1-100.
pub fn encode_jpeg(buffer: &ChartBuffer, quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode(
        &buffer.to_raw(),
        buffer.width(),
        buffer.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out)
}

/// Encode `buffer` and write it into `dir` under [`chart_file_name`].
///
/// The directory is created if needed. Returns the written path.
pub fn save_chart<P: AsRef<Path>>(
    buffer: &ChartBuffer,
    dir: P,
    observer: &ObserverSnapshot,
    quality: u8,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(chart_file_name(observer));
    let bytes = encode_jpeg(buffer, quality)?;
    std::fs::write(&path, &bytes)?;
    info!(
        "Saved {}x{} chart to {} ({} bytes)",
        buffer.width(),
        buffer.height(),
        path.display(),
        bytes.len()
    );
    Ok(path)
}
