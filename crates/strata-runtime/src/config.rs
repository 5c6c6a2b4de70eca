use std::time::Duration;

use serde::{Deserialize, Serialize};
use strata_world::{CHUNK_HEIGHT, CHUNK_SIZE};

use crate::StreamError;
use crate::upload::UploadBudget;

/// Streamer tunables.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StreamConfig {
    /// Chebyshev radius, in chunks, kept loaded around the observer.
    #[serde(default = "default_view_distance")]
    pub view_distance: i32,
    /// Successful loads between observer re-checks.
    #[serde(default = "default_loads_per_yield")]
    pub loads_per_yield: usize,
    #[serde(default = "default_yield_pause_ms")]
    pub yield_pause_ms: u64,
    #[serde(default = "default_cycle_pause_ms")]
    pub cycle_pause_ms: u64,
}

fn default_view_distance() -> i32 {
    31
}
fn default_loads_per_yield() -> usize {
    10
}
fn default_yield_pause_ms() -> u64 {
    1
}
fn default_cycle_pause_ms() -> u64 {
    50
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            view_distance: default_view_distance(),
            loads_per_yield: default_loads_per_yield(),
            yield_pause_ms: default_yield_pause_ms(),
            cycle_pause_ms: default_cycle_pause_ms(),
        }
    }
}

impl StreamConfig {
    pub fn with_view_distance(view_distance: i32) -> Self {
        Self {
            view_distance,
            ..Self::default()
        }
    }

    pub fn yield_pause(&self) -> Duration {
        Duration::from_millis(self.yield_pause_ms)
    }

    pub fn cycle_pause(&self) -> Duration {
        Duration::from_millis(self.cycle_pause_ms)
    }
}

/// Presentation-side upload pacing.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UploadConfig {
    #[serde(default)]
    pub budget: UploadBudget,
    /// Frames between dirty sweeps; 0 sweeps every frame.
    #[serde(default = "default_dirty_sweep_frames")]
    pub dirty_sweep_frames: u32,
}

fn default_dirty_sweep_frames() -> u32 {
    10
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            budget: UploadBudget::default(),
            dirty_sweep_frames: default_dirty_sweep_frames(),
        }
    }
}

/// Dimensions of the volumetric ring region mirrored on the GPU.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct VolumeConfig {
    #[serde(default = "default_volume_side")]
    pub width: usize,
    #[serde(default = "default_volume_height")]
    pub height: usize,
    #[serde(default = "default_volume_side")]
    pub depth: usize,
}

fn default_volume_side() -> usize {
    1024
}
fn default_volume_height() -> usize {
    CHUNK_HEIGHT
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            width: default_volume_side(),
            height: default_volume_height(),
            depth: default_volume_side(),
        }
    }
}

impl VolumeConfig {
    /// Smallest square region that keeps every chunk in view on its own slot.
    pub fn fitting(view_distance: i32) -> Self {
        let side = (2 * view_distance.max(0) as usize + 1) * CHUNK_SIZE;
        Self {
            width: side,
            height: CHUNK_HEIGHT,
            depth: side,
        }
    }

    pub fn validate(&self, view_distance: i32) -> Result<(), StreamError> {
        if view_distance < 0 {
            return Err(StreamError::InvalidViewDistance(view_distance));
        }
        if self.width == 0 || self.depth == 0 || self.width % CHUNK_SIZE != 0 || self.depth % CHUNK_SIZE != 0 {
            return Err(StreamError::VolumeMisaligned {
                width: self.width,
                depth: self.depth,
            });
        }
        let needed = (2 * view_distance as usize + 1) * CHUNK_SIZE;
        if self.width < needed || self.depth < needed {
            return Err(StreamError::VolumeTooSmall {
                width: self.width,
                depth: self.depth,
                view_distance,
                needed,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MeshConfig {
    /// Mesh worker threads; 0 picks from available parallelism.
    #[serde(default)]
    pub workers: usize,
    #[serde(default)]
    pub debug_colors: bool,
}

impl MeshConfig {
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(4)
            .max(1)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub volume: VolumeConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), StreamError> {
        self.volume.validate(self.stream.view_distance)
    }
}
