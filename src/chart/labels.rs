//! Greedy label placement.
//!
//! Brighter objects claim space first. Each candidate tries a fixed list of
//! anchors around its point and takes the first one whose box is in bounds
//! and, with collision avoidance on, overlaps no occupied cell. A label that
//! fits nowhere is dropped.

use super::font::text_size;

/// A label waiting to be placed next to a chart point (y-up).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidate {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub magnitude: f64,
}

/// A label with its box: bottom-left corner plus size, in y-up pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLabel {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    UpperRight,
    LowerRight,
    UpperLeft,
    LowerLeft,
    Above,
    Below,
}

const ANCHORS: [Anchor; 6] = [
    Anchor::UpperRight,
    Anchor::LowerRight,
    Anchor::UpperLeft,
    Anchor::LowerLeft,
    Anchor::Above,
    Anchor::Below,
];

impl Anchor {
    /// Bottom-left of a `w × h` box placed `gap` pixels from `(x, y)`.
    fn origin(self, x: i32, y: i32, w: i32, h: i32, gap: i32) -> (i32, i32) {
        match self {
            Anchor::UpperRight => (x + gap, y + gap),
            Anchor::LowerRight => (x + gap, y - gap - h),
            Anchor::UpperLeft => (x - gap - w, y + gap),
            Anchor::LowerLeft => (x - gap - w, y - gap - h),
            Anchor::Above => (x - w / 2, y + gap),
            Anchor::Below => (x - w / 2, y - gap - h),
        }
    }
}

/// Coarse occupancy grid over the chart.
#[derive(Debug, Clone)]
pub struct LabelPlacer {
    width: i32,
    height: i32,
    cell: i32,
    cols: usize,
    occupied: Vec<bool>,
    avoid_collisions: bool,
}

impl LabelPlacer {
    pub fn new(width: u32, height: u32, cell_size: u32, avoid_collisions: bool) -> Self {
        let cell = cell_size.max(1);
        let cols = width.div_ceil(cell) as usize;
        let rows = height.div_ceil(cell) as usize;
        Self {
            width: width as i32,
            height: height as i32,
            cell: cell as i32,
            cols,
            occupied: vec![false; cols * rows],
            avoid_collisions,
        }
    }

    fn cells(&self, x: i32, y: i32, w: i32, h: i32) -> impl Iterator<Item = usize> + '_ {
        let (c0, c1) = (x / self.cell, (x + w - 1) / self.cell);
        let (r0, r1) = (y / self.cell, (y + h - 1) / self.cell);
        (r0..=r1).flat_map(move |r| (c0..=c1).map(move |c| r as usize * self.cols + c as usize))
    }

    fn fits(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        if x < 0 || y < 0 || x + w > self.width || y + h > self.height {
            return false;
        }
        !self.avoid_collisions || self.cells(x, y, w, h).all(|i| !self.occupied[i])
    }

    /// Try every anchor in order; mark and return the first box that fits.
    pub fn place(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        gap: i32,
    ) -> Option<(i32, i32)> {
        let (w, h) = (width as i32, height as i32);
        if w == 0 || h == 0 {
            return None;
        }
        let (bx, by) = ANCHORS
            .iter()
            .map(|a| a.origin(x, y, w, h, gap))
            .find(|&(bx, by)| self.fits(bx, by, w, h))?;
        let marked: Vec<usize> = self.cells(bx, by, w, h).collect();
        for i in marked {
            self.occupied[i] = true;
        }
        Some((bx, by))
    }
}

/// Place candidates brightest first. The input order only breaks magnitude ties.
pub fn place_labels(
    mut candidates: Vec<LabelCandidate>,
    width: u32,
    height: u32,
    scale: u32,
    cell_size: u32,
    avoid_collisions: bool,
) -> Vec<PlacedLabel> {
    candidates.sort_by(|a, b| a.magnitude.total_cmp(&b.magnitude));
    let mut placer = LabelPlacer::new(width, height, cell_size, avoid_collisions);
    let gap = 2 * scale.max(1) as i32 + 1;

    candidates
        .into_iter()
        .filter_map(|c| {
            let (w, h) = text_size(&c.text, scale.max(1));
            let (x, y) = placer.place(c.x, c.y, w, h, gap)?;
            Some(PlacedLabel {
                text: c.text,
                x,
                y,
                width: w,
                height: h,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(text: &str, x: i32, y: i32, magnitude: f64) -> LabelCandidate {
        LabelCandidate {
            text: text.to_string(),
            x,
            y,
            magnitude,
        }
    }

    fn overlaps(a: &PlacedLabel, b: &PlacedLabel) -> bool {
        a.x < b.x + b.width as i32
            && b.x < a.x + a.width as i32
            && a.y < b.y + b.height as i32
            && b.y < a.y + a.height as i32
    }

    #[test]
    fn first_anchor_is_upper_right() {
        let placed = place_labels(vec![cand("VEGA", 50, 50, 0.0)], 200, 200, 1, 4, true);
        assert_eq!(placed.len(), 1);
        assert_eq!((placed[0].x, placed[0].y), (53, 53));
        assert_eq!((placed[0].width, placed[0].height), (23, 7));
    }

    #[test]
    fn falls_back_when_out_of_bounds() {
        // Too close to the right edge for the right-hand anchors
        let placed = place_labels(vec![cand("DENEB", 195, 50, 1.2)], 200, 200, 1, 4, true);
        assert_eq!(placed.len(), 1);
        assert!(placed[0].x + placed[0].width as i32 <= 195);
    }

    #[test]
    fn brighter_label_wins_and_nothing_overlaps() {
        let candidates = vec![
            cand("FAINT", 40, 40, 1.4),
            cand("BRIGHT", 40, 40, -1.0),
            cand("MID", 41, 41, 0.5),
        ];
        let placed = place_labels(candidates, 120, 120, 1, 2, true);
        assert_eq!(placed[0].text, "BRIGHT");
        assert_eq!((placed[0].x, placed[0].y), (43, 43));
        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                assert!(!overlaps(a, b), "{} overlaps {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn labels_that_fit_nowhere_are_dropped() {
        // Only the centered anchors fit a 20 px chart: above and below
        let candidates = vec![
            cand("AB", 10, 10, 0.0),
            cand("CD", 10, 10, 1.0),
            cand("EF", 10, 10, 2.0),
        ];
        let placed = place_labels(candidates, 20, 20, 1, 1, true);
        let texts: Vec<&str> = placed.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["AB", "CD"]);
        assert_eq!((placed[0].x, placed[0].y), (5, 13));
        assert_eq!((placed[1].x, placed[1].y), (5, 0));
        let huge = place_labels(vec![cand("ANTARES", 5, 5, 1.0)], 20, 20, 2, 4, true);
        assert!(huge.is_empty());
    }

    #[test]
    fn collisions_allowed_when_disabled() {
        let candidates = vec![cand("AB", 30, 30, 0.0), cand("CD", 30, 30, 1.0)];
        let placed = place_labels(candidates, 100, 100, 1, 4, false);
        assert_eq!(placed.len(), 2);
        assert_eq!((placed[0].x, placed[0].y), (placed[1].x, placed[1].y));
    }
}
