use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::noise::{FractalMode, NoiseConfig, NoiseSettings};
use crate::{CHUNK_HEIGHT, WorldGenError};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    /// Land height above sea level before biome contributions.
    #[serde(default = "default_base_height")]
    pub base_height: f32,
    #[serde(default)]
    pub noise: NoiseFields,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub terrain: BiomeTerrain,
}

pub const DEFAULT_SEED: i32 = 13308;

fn default_seed() -> i32 {
    DEFAULT_SEED
}
fn default_sea_level() -> i32 {
    64
}
fn default_base_height() -> f32 {
    4.0
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            sea_level: default_sea_level(),
            base_height: default_base_height(),
            noise: NoiseFields::default(),
            thresholds: Thresholds::default(),
            terrain: BiomeTerrain::default(),
        }
    }
}

/// Frequencies, fractal modes and octave counts of every field the classifier samples.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NoiseFields {
    #[serde(default = "d_continental")]
    pub continental: NoiseConfig,
    #[serde(default = "d_erosion")]
    pub erosion: NoiseConfig,
    #[serde(default = "d_temperature")]
    pub temperature: NoiseConfig,
    #[serde(default = "d_humidity")]
    pub humidity: NoiseConfig,
    #[serde(default = "d_ridge")]
    pub ridge: NoiseConfig,
    #[serde(default = "d_plains_hills")]
    pub plains_hills: NoiseConfig,
    #[serde(default = "d_forest_mounds")]
    pub forest_mounds: NoiseConfig,
    #[serde(default = "d_forest_gully")]
    pub forest_gully: NoiseConfig,
    #[serde(default = "d_forest_surface")]
    pub forest_surface: NoiseConfig,
}

fn d_continental() -> NoiseConfig {
    NoiseConfig::new(0.0015, FractalMode::Fbm, 4, 0x0C07_1A11)
}
fn d_erosion() -> NoiseConfig {
    NoiseConfig::new(0.003, FractalMode::Fbm, 3, 0x0E40_51F3)
}
fn d_temperature() -> NoiseConfig {
    NoiseConfig::new(0.0012, FractalMode::Fbm, 3, 0x1203_5F31)
}
fn d_humidity() -> NoiseConfig {
    NoiseConfig::new(0.0012, FractalMode::Fbm, 3, 0x12E3_A1B2)
}
fn d_ridge() -> NoiseConfig {
    NoiseConfig::new(0.004, FractalMode::Ridged, 4, 99_173)
}
fn d_plains_hills() -> NoiseConfig {
    NoiseConfig::new(0.01, FractalMode::Fbm, 3, 41_337)
}
fn d_forest_mounds() -> NoiseConfig {
    NoiseConfig::new(0.02, FractalMode::Fbm, 2, 0x00F0_2E57)
}
fn d_forest_gully() -> NoiseConfig {
    NoiseConfig::new(0.008, FractalMode::Ridged, 2, 0x0061_7713)
}
fn d_forest_surface() -> NoiseConfig {
    NoiseConfig::new(0.15, FractalMode::None, 1, 0x005F_ACE5)
}

impl Default for NoiseFields {
    fn default() -> Self {
        Self {
            continental: d_continental(),
            erosion: d_erosion(),
            temperature: d_temperature(),
            humidity: d_humidity(),
            ridge: d_ridge(),
            plains_hills: d_plains_hills(),
            forest_mounds: d_forest_mounds(),
            forest_gully: d_forest_gully(),
            forest_surface: d_forest_surface(),
        }
    }
}

/// Classification thresholds, applied in rule order (see `BiomeClassifier::classify_climate`).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Thresholds {
    /// Continental values below this are ocean.
    #[serde(default = "d_sea")]
    pub sea: f32,
    /// Ridge activation threshold at temperature 0.
    #[serde(default = "d_mountain_base")]
    pub mountain_base: f32,
    /// Change of the ridge threshold per unit of temperature.
    #[serde(default = "d_mountain_temp_slope")]
    pub mountain_temp_slope: f32,
    #[serde(default = "d_tundra_temp")]
    pub tundra_temperature: f32,
    #[serde(default = "d_desert_temp")]
    pub desert_temperature: f32,
    #[serde(default = "d_desert_humidity")]
    pub desert_humidity: f32,
    #[serde(default = "d_river_humidity")]
    pub river_humidity: f32,
    #[serde(default = "d_forest_humidity")]
    pub forest_humidity: f32,
    /// Forest gully noise above this is a gully (narrow ridge crest).
    #[serde(default = "d_gully")]
    pub gully: f32,
    /// Displacement in blocks applied by the erosion warp.
    #[serde(default = "d_warp")]
    pub warp_strength: f32,
}

fn d_sea() -> f32 {
    -0.25
}
fn d_mountain_base() -> f32 {
    0.55
}
fn d_mountain_temp_slope() -> f32 {
    0.15
}
fn d_tundra_temp() -> f32 {
    -0.4
}
fn d_desert_temp() -> f32 {
    0.3
}
fn d_desert_humidity() -> f32 {
    -0.15
}
fn d_river_humidity() -> f32 {
    0.55
}
fn d_forest_humidity() -> f32 {
    0.0
}
fn d_gully() -> f32 {
    0.85
}
fn d_warp() -> f32 {
    48.0
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sea: d_sea(),
            mountain_base: d_mountain_base(),
            mountain_temp_slope: d_mountain_temp_slope(),
            tundra_temperature: d_tundra_temp(),
            desert_temperature: d_desert_temp(),
            desert_humidity: d_desert_humidity(),
            river_humidity: d_river_humidity(),
            forest_humidity: d_forest_humidity(),
            gully: d_gully(),
            warp_strength: d_warp(),
        }
    }
}

/// Per-biome height contributions, in blocks relative to `sea_level + base_height`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BiomeTerrain {
    #[serde(default = "d_ocean")]
    pub ocean_offset: f32,
    #[serde(default = "d_river")]
    pub river_offset: f32,
    #[serde(default = "d_mountains")]
    pub mountains_offset: f32,
    #[serde(default = "d_tundra")]
    pub tundra_offset: f32,
    #[serde(default = "d_desert")]
    pub desert_offset: f32,
    #[serde(default = "d_plains_base")]
    pub plains_base: f32,
    #[serde(default = "d_plains_amp")]
    pub plains_amplitude: f32,
    #[serde(default = "d_forest_base")]
    pub forest_base: f32,
    #[serde(default = "d_forest_amp")]
    pub forest_amplitude: f32,
    #[serde(default = "d_gully_carve")]
    pub gully_carve: f32,
    /// Filler layers between the surface block and stone.
    #[serde(default = "d_filler_depth")]
    pub filler_depth: i32,
}

fn d_ocean() -> f32 {
    -18.0
}
fn d_river() -> f32 {
    -7.0
}
fn d_mountains() -> f32 {
    34.0
}
fn d_tundra() -> f32 {
    3.0
}
fn d_desert() -> f32 {
    2.0
}
fn d_plains_base() -> f32 {
    2.0
}
fn d_plains_amp() -> f32 {
    6.0
}
fn d_forest_base() -> f32 {
    3.0
}
fn d_forest_amp() -> f32 {
    4.0
}
fn d_gully_carve() -> f32 {
    12.0
}
fn d_filler_depth() -> i32 {
    3
}

impl Default for BiomeTerrain {
    fn default() -> Self {
        Self {
            ocean_offset: d_ocean(),
            river_offset: d_river(),
            mountains_offset: d_mountains(),
            tundra_offset: d_tundra(),
            desert_offset: d_desert(),
            plains_base: d_plains_base(),
            plains_amplitude: d_plains_amp(),
            forest_base: d_forest_base(),
            forest_amplitude: d_forest_amp(),
            gully_carve: d_gully_carve(),
            filler_depth: d_filler_depth(),
        }
    }
}

/// Seeded noise settings of every field, resolved once per world.
#[derive(Clone, Copy, Debug)]
pub struct FieldSettings {
    pub continental: NoiseSettings,
    pub erosion: NoiseSettings,
    pub temperature: NoiseSettings,
    pub humidity: NoiseSettings,
    pub ridge: NoiseSettings,
    pub plains_hills: NoiseSettings,
    pub forest_mounds: NoiseSettings,
    pub forest_gully: NoiseSettings,
    pub forest_surface: NoiseSettings,
}

// Flattened, validated snapshot of the config used by the classifier.
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub seed: i32,
    pub sea_level: i32,
    pub base_height: f32,
    pub fields: FieldSettings,
    pub thresholds: Thresholds,
    pub terrain: BiomeTerrain,
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Result<Self, WorldGenError> {
        if cfg.sea_level < 1 || cfg.sea_level >= CHUNK_HEIGHT as i32 {
            return Err(WorldGenError::SeaLevelOutOfRange(cfg.sea_level));
        }
        let seed = cfg.seed;
        let n = &cfg.noise;
        let fields = FieldSettings {
            continental: n.continental.resolve("continental", seed)?,
            erosion: n.erosion.resolve("erosion", seed)?,
            temperature: n.temperature.resolve("temperature", seed)?,
            humidity: n.humidity.resolve("humidity", seed)?,
            ridge: n.ridge.resolve("ridge", seed)?,
            plains_hills: n.plains_hills.resolve("plains_hills", seed)?,
            forest_mounds: n.forest_mounds.resolve("forest_mounds", seed)?,
            forest_gully: n.forest_gully.resolve("forest_gully", seed)?,
            forest_surface: n.forest_surface.resolve("forest_surface", seed)?,
        };
        Ok(Self {
            seed,
            sea_level: cfg.sea_level,
            base_height: cfg.base_height,
            fields,
            thresholds: cfg.thresholds.clone(),
            terrain: cfg.terrain.clone(),
        })
    }

    /// Default parameters for `seed`.
    pub fn with_seed(seed: i32) -> Self {
        let cfg = WorldGenConfig {
            seed,
            ..WorldGenConfig::default()
        };
        Self::from_config(&cfg).expect("default worldgen config is valid")
    }
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, WorldGenError> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    WorldGenParams::from_config(&cfg)
}
