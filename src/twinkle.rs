//! Per-frame twinkle for the live dome point cloud.
//!
//! Each point gets a random phase and speed when the cloud is generated.
//! Every [`Twinkle::advance`] call recomputes size and alpha from the point's
//! base values, so repeated frames never compound.
//!
//! Points fall into three tiers by base size:
//!
//! - **large**: Perlin noise blended with a sine, raised to a power, mapped
//!   across a wide range
//! - **medium**: a single smoothed noise term over a narrower range
//! - **small**: slow, heavily smoothed flicker of alpha only

use std::f64::consts::TAU;

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::debug;

use crate::magnitude::{lerp, MagnitudeStyle};
use crate::noise::Perlin;
use crate::projection::Projected;

/// A multiplier range `(low, high)` applied to a base value.
pub type Range = (f64, f64);

#[derive(Debug, Clone)]
pub struct TwinkleConfig {
    /// Seed for phases, speeds and the noise table.
    /// Default: 42
    pub seed: u64,
    /// Per-point speed multiplier range.
    /// Default: (0.6, 1.6)
    pub speed: Range,
    /// Base size at or above which a point is in the large tier.
    /// Default: 0.6
    pub large_threshold: f64,
    /// Base size at or above which a point is in the medium tier.
    /// Default: 0.35
    pub medium_threshold: f64,
    /// Default: size (0.7, 1.4), alpha (0.5, 1.0)
    pub large_size: Range,
    pub large_alpha: Range,
    /// Exponent applied to the blended large-tier signal.
    /// Default: 1.6
    pub large_exponent: f64,
    /// Default: size (0.88, 1.12), alpha (0.7, 1.0)
    pub medium_size: Range,
    pub medium_alpha: Range,
    /// Small points keep their size; only alpha moves.
    /// Default: (0.85, 1.0)
    pub small_alpha: Range,
    /// Noise samples per second of animation time.
    /// Default: 0.9
    pub noise_frequency: f64,
}

impl Default for TwinkleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            speed: (0.6, 1.6),
            large_threshold: 0.6,
            medium_threshold: 0.35,
            large_size: (0.7, 1.4),
            large_alpha: (0.5, 1.0),
            large_exponent: 1.6,
            medium_size: (0.88, 1.12),
            medium_alpha: (0.7, 1.0),
            small_alpha: (0.85, 1.0),
            noise_frequency: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Large,
    Medium,
    Small,
}

/// One point of the live dome.
#[derive(Debug, Clone, PartialEq)]
pub struct LivePoint {
    /// Index into the catalog's records.
    pub record_index: usize,
    pub position: Vector3<f64>,
    pub base_size: f64,
    pub base_alpha: f64,
    pub size: f64,
    pub alpha: f64,
    pub phase: f64,
    pub speed: f64,
}

/// The projected dome, ready for drawing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<LivePoint>,
}

impl PointCloud {
    pub fn points(&self) -> &[LivePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Positions as `f32` triples for upload to a renderer.
    pub fn positions_f32(&self) -> Vec<[f32; 3]> {
        self.points
            .iter()
            .map(|p| [p.position.x as f32, p.position.y as f32, p.position.z as f32])
            .collect()
    }
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Seeded twinkle state: RNG for new points, noise table and elapsed time.
#[derive(Debug)]
pub struct Twinkle {
    config: TwinkleConfig,
    noise: Perlin,
    rng: StdRng,
    elapsed: f64,
}

impl Twinkle {
    pub fn new(config: TwinkleConfig) -> Self {
        Self {
            noise: Perlin::new(config.seed),
            rng: StdRng::seed_from_u64(config.seed),
            elapsed: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &TwinkleConfig {
        &self.config
    }

    /// Animation time accumulated by [`Twinkle::advance`], in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn tier(&self, base_size: f64) -> Tier {
        if base_size >= self.config.large_threshold {
            Tier::Large
        } else if base_size >= self.config.medium_threshold {
            Tier::Medium
        } else {
            Tier::Small
        }
    }

    /// Build a fresh cloud from projected dome points, assigning each a
    /// random phase and speed.
    pub fn generate(
        &mut self,
        projected: &[Projected<'_, Vector3<f64>>],
        style: &MagnitudeStyle,
    ) -> PointCloud {
        let (lo, hi) = self.config.speed;
        let points = projected
            .iter()
            .map(|p| {
                let base_size = style.radius(p.magnitude);
                let base_alpha = style.alpha(p.magnitude);
                LivePoint {
                    record_index: p.record_index,
                    position: p.point,
                    base_size,
                    base_alpha,
                    size: base_size,
                    alpha: base_alpha,
                    phase: self.rng.random::<f64>() * TAU,
                    speed: lerp(lo, hi, self.rng.random::<f64>()),
                }
            })
            .collect();
        PointCloud { points }
    }

    /// Step animation time by `dt` seconds and restyle every point.
    pub fn advance(&mut self, dt: f64, cloud: &mut PointCloud) {
        self.elapsed += dt.max(0.0);
        let mut counts = [0usize; 3];
        for point in &mut cloud.points {
            let tier = self.tier(point.base_size);
            let (size_mult, alpha_mult) = self.multipliers(tier, point.phase, point.speed);
            point.size = point.base_size * size_mult;
            point.alpha = (point.base_alpha * alpha_mult).clamp(0.0, 1.0);
            counts[tier as usize] += 1;
        }
        debug!(
            "Twinkle at t={:.3}s: {} large, {} medium, {} small",
            self.elapsed, counts[0], counts[1], counts[2]
        );
    }

    fn multipliers(&self, tier: Tier, phase: f64, speed: f64) -> (f64, f64) {
        let c = &self.config;
        let t = self.elapsed * speed;
        match tier {
            Tier::Large => {
                let n = self.noise.get(t * c.noise_frequency, phase);
                let s = 0.5 + 0.5 * (t * 2.3 + phase).sin();
                let v = (0.6 * n + 0.4 * s).clamp(0.0, 1.0).powf(c.large_exponent);
                (
                    lerp(c.large_size.0, c.large_size.1, v),
                    lerp(c.large_alpha.0, c.large_alpha.1, v),
                )
            }
            Tier::Medium => {
                let n = self.noise.get(t * c.noise_frequency * 0.6, phase + 17.0);
                let v = smoothstep(n);
                (
                    lerp(c.medium_size.0, c.medium_size.1, v),
                    lerp(c.medium_alpha.0, c.medium_alpha.1, v),
                )
            }
            Tier::Small => {
                let n = self.noise.get(t * c.noise_frequency * 0.25, phase + 31.0);
                let v = smoothstep(smoothstep(n));
                (1.0, lerp(c.small_alpha.0, c.small_alpha.1, v))
            }
        }
    }
}

impl Default for Twinkle {
    fn default() -> Self {
        Self::new(TwinkleConfig::default())
    }
}
