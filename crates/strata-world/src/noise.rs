//! Seeded coherent-noise fields.
//!
//! Every generator samples through [`NoiseField`], a thin wrapper around
//! FastNoiseLite's OpenSimplex2. A field is fully described by its
//! [`NoiseSettings`]; identical settings give identical values for the same
//! coordinate on every run and platform, which biome continuity relies on.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use serde::{Deserialize, Serialize};

use crate::WorldGenError;

pub const MIN_OCTAVES: i32 = 1;
pub const MAX_OCTAVES: i32 = 10;

/// How octaves are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalMode {
    /// Single octave.
    None,
    /// Layered sum of octaves (fractional Brownian motion).
    #[default]
    Fbm,
    /// Folded octaves producing sharp crests near 1.0.
    Ridged,
}

impl FractalMode {
    fn to_fnl(self) -> FractalType {
        match self {
            FractalMode::None => FractalType::None,
            FractalMode::Fbm => FractalType::FBm,
            FractalMode::Ridged => FractalType::Ridged,
        }
    }
}

/// User-facing description of one field. The world seed is mixed with `salt`
/// so every field gets an independent sequence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    #[serde(default = "d_freq")]
    pub frequency: f32,
    #[serde(default)]
    pub fractal: FractalMode,
    #[serde(default = "d_oct")]
    pub octaves: i32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
    #[serde(default = "d_gain")]
    pub gain: f32,
    #[serde(default)]
    pub weighted_strength: f32,
    #[serde(default)]
    pub salt: i32,
}

fn d_freq() -> f32 {
    0.01
}
fn d_oct() -> i32 {
    3
}
fn d_lac() -> f32 {
    2.0
}
fn d_gain() -> f32 {
    0.5
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            frequency: d_freq(),
            fractal: FractalMode::Fbm,
            octaves: d_oct(),
            lacunarity: d_lac(),
            gain: d_gain(),
            weighted_strength: 0.0,
            salt: 0,
        }
    }
}

impl NoiseConfig {
    pub const fn new(frequency: f32, fractal: FractalMode, octaves: i32, salt: i32) -> Self {
        Self {
            frequency,
            fractal,
            octaves,
            lacunarity: 2.0,
            gain: 0.5,
            weighted_strength: 0.0,
            salt,
        }
    }

    /// Binds this config to a world seed and validates it.
    pub fn resolve(&self, field: &'static str, world_seed: i32) -> Result<NoiseSettings, WorldGenError> {
        NoiseSettings {
            seed: world_seed ^ self.salt,
            frequency: self.frequency,
            fractal: self.fractal,
            octaves: self.octaves,
            lacunarity: self.lacunarity,
            gain: self.gain,
            weighted_strength: self.weighted_strength,
        }
        .validate(field)
    }
}

/// Validated, seeded settings of a single noise field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSettings {
    pub seed: i32,
    pub frequency: f32,
    pub fractal: FractalMode,
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
    pub weighted_strength: f32,
}

impl NoiseSettings {
    /// Clamps octaves and weighting into range; rejects unusable frequencies.
    pub fn validate(mut self, field: &'static str) -> Result<Self, WorldGenError> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(WorldGenError::InvalidFrequency {
                field,
                value: self.frequency,
            });
        }
        for (what, value) in [
            ("lacunarity", self.lacunarity),
            ("gain", self.gain),
            ("weighted_strength", self.weighted_strength),
        ] {
            if !value.is_finite() {
                return Err(WorldGenError::NonFinite { field, what, value });
            }
        }
        self.octaves = self.octaves.clamp(MIN_OCTAVES, MAX_OCTAVES);
        if self.fractal == FractalMode::None {
            self.octaves = 1;
        }
        self.weighted_strength = self.weighted_strength.clamp(0.0, 1.0);
        Ok(self)
    }
}

/// A ready-to-sample noise field. Sampling is `&self` and side-effect free.
pub struct NoiseField {
    settings: NoiseSettings,
    fnl: FastNoiseLite,
}

impl NoiseField {
    pub fn new(settings: NoiseSettings) -> Self {
        let mut fnl = FastNoiseLite::with_seed(settings.seed);
        fnl.set_noise_type(Some(NoiseType::OpenSimplex2));
        fnl.set_frequency(Some(settings.frequency));
        fnl.set_fractal_type(Some(settings.fractal.to_fnl()));
        fnl.set_fractal_octaves(Some(settings.octaves));
        fnl.set_fractal_lacunarity(Some(settings.lacunarity));
        fnl.set_fractal_gain(Some(settings.gain));
        fnl.set_fractal_weighted_strength(Some(settings.weighted_strength));
        Self { settings, fnl }
    }

    #[inline]
    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Value in approximately `[-1, 1]`.
    #[inline]
    pub fn sample_2d(&self, x: f32, z: f32) -> f32 {
        self.fnl.get_noise_2d(x, z)
    }

    #[inline]
    pub fn sample_3d(&self, x: f32, y: f32, z: f32) -> f32 {
        self.fnl.get_noise_3d(x, y, z)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(fractal: FractalMode) -> NoiseSettings {
        NoiseConfig::new(0.02, fractal, 4, 7)
            .resolve("test", 13308)
            .unwrap()
    }

    #[test]
    fn zero_or_nan_frequency_is_rejected() {
        let mut cfg = NoiseConfig::default();
        cfg.frequency = 0.0;
        assert!(matches!(
            cfg.resolve("f", 1),
            Err(WorldGenError::InvalidFrequency { field: "f", .. })
        ));
        cfg.frequency = f32::NAN;
        assert!(cfg.resolve("f", 1).is_err());
    }

    #[test]
    fn octaves_clamp_at_configuration_time() {
        let mut cfg = NoiseConfig::default();
        cfg.octaves = 0;
        assert_eq!(cfg.resolve("f", 1).unwrap().octaves, MIN_OCTAVES);
        cfg.octaves = 99;
        assert_eq!(cfg.resolve("f", 1).unwrap().octaves, MAX_OCTAVES);
        cfg.fractal = FractalMode::None;
        assert_eq!(cfg.resolve("f", 1).unwrap().octaves, 1);
    }

    #[test]
    fn salt_separates_fields() {
        let a = NoiseConfig::new(0.02, FractalMode::Fbm, 3, 1).resolve("a", 5).unwrap();
        let b = NoiseConfig::new(0.02, FractalMode::Fbm, 3, 2).resolve("b", 5).unwrap();
        assert_ne!(a.seed, b.seed);
        let fa = NoiseField::new(a);
        let fb = NoiseField::new(b);
        let differs = (0..64).any(|i| {
            let x = i as f32 * 13.7;
            fa.sample_2d(x, -x) != fb.sample_2d(x, -x)
        });
        assert!(differs);
    }

    #[test]
    fn fractal_modes_stay_roughly_in_unit_range() {
        for mode in [FractalMode::None, FractalMode::Fbm, FractalMode::Ridged] {
            let f = NoiseField::new(settings(mode));
            for i in -200..200 {
                let v = f.sample_2d(i as f32 * 3.1, i as f32 * -1.7);
                assert!(v.is_finite());
                assert!((-1.5..=1.5).contains(&v), "{mode:?} produced {v}");
                let v3 = f.sample_3d(i as f32, 12.0, i as f32 * 0.5);
                assert!((-1.5..=1.5).contains(&v3));
            }
        }
    }
}
