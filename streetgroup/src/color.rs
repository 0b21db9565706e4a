use serde::{Deserialize, Serialize};

use crate::algorithms::components::Clustering;
use crate::model::Color;

const GOLDEN_RATIO_CONJ: f64 = 0.618_033_988_749_894_9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Independent pseudo-random RGB per cluster.
    #[default]
    Random,
    /// Hues spaced by the golden ratio; neighbouring ids stay far apart.
    GoldenHue,
}

/// Pure mapping from cluster id to color. Same seed, same id, same color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub seed: u64,
    pub scheme: ColorScheme,
}

impl Default for Palette {
    fn default() -> Self {
        Palette { seed: 0x5EED, scheme: ColorScheme::Random }
    }
}

#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn unit(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let h6 = (h.fract() * 6.0).max(0.0);
    let sector = h6.floor() as u32 % 6;
    let f = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to8 = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    (to8(r), to8(g), to8(b))
}

impl Palette {
    pub fn new(seed: u64) -> Self {
        Palette { seed, ..Palette::default() }
    }

    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn color_for(&self, cluster: u32) -> Color {
        match self.scheme {
            ColorScheme::Random => {
                let h = splitmix64(self.seed ^ splitmix64(cluster as u64));
                Color { r: (h >> 16) as u8, g: (h >> 24) as u8, b: (h >> 32) as u8, a: 255 }
            }
            ColorScheme::GoldenHue => {
                let offset = unit(splitmix64(self.seed));
                let hue = (offset + cluster as f64 * GOLDEN_RATIO_CONJ).fract();
                let (r, g, b) = hsv_to_rgb(hue, 0.75, 0.9);
                Color { r, g, b, a: 255 }
            }
        }
    }

    /// Color for every input index, by its cluster.
    pub fn assign(&self, clustering: &Clustering) -> Vec<Color> {
        let per_cluster: Vec<Color> = (0..clustering.cluster_count() as u32).map(|c| self.color_for(c)).collect();
        clustering.labels().iter().map(|&l| per_cluster[l as usize]).collect()
    }
}
