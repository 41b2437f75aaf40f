//! Pixel buffer and drawing primitives for sky charts.
//!
//! Every primitive takes the buffer it draws into; there is no shared canvas.
//! Coordinates are signed so shapes may hang off the edge; anything outside
//! the buffer is clipped.

/// 8-bit RGB color.
pub type Rgb = [u8; 3];

/// Row-major RGB pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl ChartBuffer {
    /// New buffer filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite one pixel. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Add `color * weight` to one pixel, saturating each channel at 255.
    pub fn add(&mut self, x: i32, y: i32, color: Rgb, weight: f64) {
        if weight <= 0.0 {
            return;
        }
        if let Some(i) = self.index(x, y) {
            let px = &mut self.pixels[i];
            for (c, add) in px.iter_mut().zip(color) {
                let v = *c as f64 + add as f64 * weight;
                *c = v.round().min(255.0) as u8;
            }
        }
    }

    /// Interleaved `RGBRGB...` bytes, row 0 first.
    pub fn to_raw(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

const WHITE: Rgb = [255, 255, 255];

/// Additive white glow with a `(1 - d/r)^2` falloff, peaking at `alpha` in
/// the center.
pub fn soft_dot(buf: &mut ChartBuffer, cx: i32, cy: i32, radius: f64, alpha: f64) {
    if radius <= 0.0 || alpha <= 0.0 {
        return;
    }
    let reach = radius.ceil() as i32;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d = ((dx * dx + dy * dy) as f64).sqrt() / radius;
            if d >= 1.0 {
                continue;
            }
            let falloff = (1.0 - d) * (1.0 - d);
            buf.add(cx + dx, cy + dy, WHITE, alpha * falloff);
        }
    }
}

/// Solid disc; radius 0 sets a single pixel.
pub fn fill_disc(buf: &mut ChartBuffer, cx: i32, cy: i32, radius: i32, color: Rgb) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                buf.set(cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham line that stamps a disc of radius `thickness - 1` at every step.
pub fn thick_line(
    buf: &mut ChartBuffer,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    thickness: u32,
    color: Rgb,
) {
    let stamp = thickness.saturating_sub(1) as i32;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        fill_disc(buf, x, y, stamp, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Fill the annulus `radius - thickness < d <= radius`.
pub fn circle_outline(
    buf: &mut ChartBuffer,
    cx: i32,
    cy: i32,
    radius: f64,
    thickness: f64,
    color: Rgb,
) {
    let inner = (radius - thickness).max(0.0);
    let (inner2, outer2) = (inner * inner, radius * radius);
    let reach = radius.ceil() as i32;
    let y_min = (cy - reach).max(0);
    let y_max = (cy + reach).min(buf.height as i32 - 1);
    let x_min = (cx - reach).max(0);
    let x_max = (cx + reach).min(buf.width as i32 - 1);
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            if in_annulus(x - cx, y - cy, inner2, outer2) {
                buf.set(x, y, color);
            }
        }
    }
}

pub(crate) fn in_annulus(dx: i32, dy: i32, inner2: f64, outer2: f64) -> bool {
    let d2 = (dx * dx + dy * dy) as f64;
    d2 > inner2 && d2 <= outer2
}

/// Swap rows top to bottom in place.
pub fn flip_vertical(buf: &mut ChartBuffer) {
    let w = buf.width as usize;
    let h = buf.height as usize;
    for row in 0..h / 2 {
        let (top, bottom) = buf.pixels.split_at_mut((h - 1 - row) * w);
        top[row * w..(row + 1) * w].swap_with_slice(&mut bottom[..w]);
    }
}
