//! Seeded 2D gradient (Perlin) noise.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Classic Perlin noise over a shuffled 256-entry permutation table.
#[derive(Debug, Clone)]
pub struct Perlin {
    perm: [u8; 512],
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

impl Perlin {
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut StdRng::seed_from_u64(seed));
        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().enumerate() {
            *p = table[i & 255];
        }
        Self { perm }
    }

    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }

    /// Noise at `(x, y)`, in `[0, 1]`. Integer lattice points give 0.5.
    pub fn get(&self, x: f64, y: f64) -> f64 {
        let (x0, y0) = (x.floor(), y.floor());
        let (xf, yf) = (x - x0, y - y0);
        let xi = (x0 as i64).rem_euclid(256) as usize;
        let yi = (y0 as i64).rem_euclid(256) as usize;
        let (u, v) = (fade(xf), fade(yf));

        let aa = grad(self.hash(xi, yi), xf, yf);
        let ba = grad(self.hash(xi + 1, yi), xf - 1.0, yf);
        let ab = grad(self.hash(xi, yi + 1), xf, yf - 1.0);
        let bb = grad(self.hash(xi + 1, yi + 1), xf - 1.0, yf - 1.0);

        let x1 = aa + u * (ba - aa);
        let x2 = ab + u * (bb - ab);
        let n = x1 + v * (x2 - x1);
        ((n + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}
