use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use serde::Deserialize;

use super::NoiseSource;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    #[default]
    OpenSimplex2,
    Perlin,
    Value,
    Cellular,
}

impl NoiseKind {
    fn noise_type(self) -> NoiseType {
        match self {
            NoiseKind::OpenSimplex2 => NoiseType::OpenSimplex2,
            NoiseKind::Perlin => NoiseType::Perlin,
            NoiseKind::Value => NoiseType::Value,
            NoiseKind::Cellular => NoiseType::Cellular,
        }
    }
}

/// One fastnoise-lite generator with a fixed sampling transform.
///
/// `value(x, y) = noise(x * scale + offset.0, y * scale + offset.1) * strength`
pub struct NoiseField {
    noise: FastNoiseLite,
    seed: i32,
    scale: f64,
    offset: (f64, f64),
    strength: f32,
}

impl NoiseField {
    pub fn new(seed: i32, kind: NoiseKind, frequency: f32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(kind.noise_type()));
        noise.set_frequency(Some(frequency));
        Self {
            noise,
            seed,
            scale: 1.0,
            offset: (0.0, 0.0),
            strength: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = f64::from(scale);
        self
    }

    pub fn with_offset(mut self, ox: f32, oy: f32) -> Self {
        self.offset = (f64::from(ox), f64::from(oy));
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// Turns on fBm layering. `octaves <= 1` leaves the field single-layered.
    pub fn with_octaves(mut self, octaves: i32) -> Self {
        if octaves > 1 {
            self.noise.set_fractal_type(Some(FractalType::FBm));
            self.noise.set_fractal_octaves(Some(octaves));
        }
        self
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }
}

impl NoiseSource for NoiseField {
    #[inline]
    fn value(&self, x: f64, y: f64) -> f32 {
        let sx = x * self.scale + self.offset.0;
        let sy = y * self.scale + self.offset.1;
        self.noise.get_noise_2d(sx, sy) * self.strength
    }
}
