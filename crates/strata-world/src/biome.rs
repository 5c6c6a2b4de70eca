//! Biome classification and per-biome column shaping.
//!
//! A biome is a pure function of `(seed, x, z)`. Five independently seeded
//! fields are sampled per column: continental, erosion, temperature,
//! humidity and ridge. Temperature and humidity are sampled at coordinates
//! displaced by the erosion field so biome borders do not follow the axes.

use serde::{Deserialize, Serialize};
use strata_blocks::BlockType;

use crate::noise::NoiseField;
use crate::worldgen::WorldGenParams;
use crate::CHUNK_HEIGHT;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Ocean,
    River,
    Mountains,
    Tundra,
    Desert,
    Plains,
    Forest,
}

impl Biome {
    pub const ALL: [Biome; 7] = [
        Biome::Ocean,
        Biome::River,
        Biome::Mountains,
        Biome::Tundra,
        Biome::Desert,
        Biome::Plains,
        Biome::Forest,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::River => "river",
            Biome::Mountains => "mountains",
            Biome::Tundra => "tundra",
            Biome::Desert => "desert",
            Biome::Plains => "plains",
            Biome::Forest => "forest",
        }
    }

    /// Legend color for rasterized biome maps.
    pub const fn map_color(self) -> [u8; 3] {
        match self {
            Biome::Ocean => [24, 58, 142],
            Biome::River => [64, 128, 220],
            Biome::Mountains => [128, 120, 112],
            Biome::Tundra => [226, 236, 240],
            Biome::Desert => [222, 200, 120],
            Biome::Plains => [130, 186, 84],
            Biome::Forest => [38, 110, 44],
        }
    }
}

/// Raw field values at one column, after domain warping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateSample {
    pub continental: f32,
    pub erosion: f32,
    pub temperature: f32,
    pub humidity: f32,
    pub ridge: f32,
}

/// Everything chunk fill needs for one column, classified once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSample {
    pub biome: Biome,
    pub height: f32,
    /// Number of solid blocks in the column; the top solid block sits at `solid_height - 1`.
    pub solid_height: i32,
    pub surface: BlockType,
    pub filler: BlockType,
    pub water: bool,
}

struct Fields {
    continental: NoiseField,
    erosion: NoiseField,
    temperature: NoiseField,
    humidity: NoiseField,
    ridge: NoiseField,
    plains_hills: NoiseField,
    forest_mounds: NoiseField,
    forest_gully: NoiseField,
    forest_surface: NoiseField,
}

// Second erosion tap, far enough away to be uncorrelated with the first.
const WARP_TAP_OFFSET: (f32, f32) = (531.7, -173.3);

/// Immutable classifier built once per world and shared across threads.
pub struct BiomeClassifier {
    params: WorldGenParams,
    fields: Fields,
}

impl BiomeClassifier {
    pub fn new(params: WorldGenParams) -> Self {
        let f = &params.fields;
        let fields = Fields {
            continental: NoiseField::new(f.continental),
            erosion: NoiseField::new(f.erosion),
            temperature: NoiseField::new(f.temperature),
            humidity: NoiseField::new(f.humidity),
            ridge: NoiseField::new(f.ridge),
            plains_hills: NoiseField::new(f.plains_hills),
            forest_mounds: NoiseField::new(f.forest_mounds),
            forest_gully: NoiseField::new(f.forest_gully),
            forest_surface: NoiseField::new(f.forest_surface),
        };
        Self { params, fields }
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.params.seed
    }

    #[inline]
    pub fn sea_level(&self) -> i32 {
        self.params.sea_level
    }

    pub fn climate(&self, wx: i32, wz: i32) -> ClimateSample {
        let x = wx as f32;
        let z = wz as f32;
        let f = &self.fields;
        let erosion = f.erosion.sample_2d(x, z);
        let erosion_b = f
            .erosion
            .sample_2d(x + WARP_TAP_OFFSET.0, z + WARP_TAP_OFFSET.1);
        let warp = self.params.thresholds.warp_strength;
        let xw = x + erosion * warp;
        let zw = z + erosion_b * warp;
        ClimateSample {
            continental: f.continental.sample_2d(x, z),
            erosion,
            temperature: f.temperature.sample_2d(xw, zw),
            humidity: f.humidity.sample_2d(xw, zw),
            ridge: f.ridge.sample_2d(x, z),
        }
    }

    pub fn classify(&self, wx: i32, wz: i32) -> Biome {
        self.classify_climate(&self.climate(wx, wz))
    }

    /// Ordered threshold rules. Thresholds overlap, so the first match wins.
    pub fn classify_climate(&self, c: &ClimateSample) -> Biome {
        let t = &self.params.thresholds;
        if c.continental < t.sea {
            return Biome::Ocean;
        }
        let mountain_threshold = t.mountain_base + t.mountain_temp_slope * c.temperature;
        if c.ridge > mountain_threshold {
            return Biome::Mountains;
        }
        if c.temperature < t.tundra_temperature {
            return Biome::Tundra;
        }
        if c.temperature > t.desert_temperature && c.humidity < t.desert_humidity {
            return Biome::Desert;
        }
        if c.humidity > t.river_humidity {
            return Biome::River;
        }
        if c.humidity > t.forest_humidity {
            return Biome::Forest;
        }
        Biome::Plains
    }

    pub fn height_at(&self, wx: i32, wz: i32) -> f32 {
        self.height_for(self.classify(wx, wz), wx, wz)
    }

    /// Terrain height for a column whose biome is already known.
    pub fn height_for(&self, biome: Biome, wx: i32, wz: i32) -> f32 {
        let base = self.params.sea_level as f32 + self.params.base_height;
        let tr = &self.params.terrain;
        let (x, z) = (wx as f32, wz as f32);
        let contribution = match biome {
            Biome::Plains => {
                // Squashed toward zero so plains read as gentle swells.
                let n = self.fields.plains_hills.sample_2d(x, z);
                tr.plains_base + n * n.abs() * tr.plains_amplitude
            }
            Biome::Forest => {
                let mound = self.fields.forest_mounds.sample_2d(x, z);
                let mut h = tr.forest_base + mound * tr.forest_amplitude;
                if self.in_gully(wx, wz) {
                    h -= tr.gully_carve;
                }
                h
            }
            Biome::Ocean => tr.ocean_offset,
            Biome::River => tr.river_offset,
            Biome::Mountains => tr.mountains_offset,
            Biome::Tundra => tr.tundra_offset,
            Biome::Desert => tr.desert_offset,
        };
        base + contribution
    }

    pub fn surface_block(&self, biome: Biome, wx: i32, wz: i32) -> BlockType {
        match biome {
            Biome::Ocean => BlockType::Sand,
            Biome::River => BlockType::Gravel,
            Biome::Mountains => BlockType::Stone,
            Biome::Tundra => BlockType::Snow,
            Biome::Desert => BlockType::Sand,
            Biome::Plains => BlockType::Grass,
            Biome::Forest => {
                if self.fields.forest_surface.sample_2d(wx as f32, wz as f32) > 0.0 {
                    BlockType::Grass
                } else {
                    BlockType::Podzol
                }
            }
        }
    }

    pub fn filler_block(&self, biome: Biome) -> BlockType {
        match biome {
            Biome::Ocean | Biome::Desert => BlockType::Sand,
            Biome::River => BlockType::Gravel,
            Biome::Mountains => BlockType::Stone,
            Biome::Tundra | Biome::Plains | Biome::Forest => BlockType::Dirt,
        }
    }

    pub fn is_local_water(&self, biome: Biome, wx: i32, wz: i32) -> bool {
        match biome {
            Biome::Ocean | Biome::River => true,
            Biome::Forest => self.in_gully(wx, wz),
            _ => false,
        }
    }

    #[inline]
    fn in_gully(&self, wx: i32, wz: i32) -> bool {
        self.fields.forest_gully.sample_2d(wx as f32, wz as f32) > self.params.thresholds.gully
    }

    pub fn sample_column(&self, wx: i32, wz: i32) -> ColumnSample {
        let biome = self.classify(wx, wz);
        let height = self.height_for(biome, wx, wz);
        let solid_height = (height.floor() as i32).clamp(1, CHUNK_HEIGHT as i32 - 1);
        ColumnSample {
            biome,
            height,
            solid_height,
            surface: self.surface_block(biome, wx, wz),
            filler: self.filler_block(biome),
            water: self.is_local_water(biome, wx, wz),
        }
    }
}
