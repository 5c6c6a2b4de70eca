use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_runtime::{MeshConfig, RuntimeConfig, StreamConfig, StreamError, UploadConfig, VolumeConfig};
use strata_world::{WorldGenConfig, WorldGenError, WorldGenParams};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("world settings: {0}")]
    World(#[from] WorldGenError),
    #[error("runtime settings: {0}")]
    Runtime(#[from] StreamError),
}

/// Top-level `strata.toml`. Every section and field is optional.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub world: WorldGenConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub volume: VolumeConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn world_params(&self) -> Result<WorldGenParams, ConfigError> {
        Ok(WorldGenParams::from_config(&self.world)?)
    }

    pub fn runtime_config(&self) -> Result<RuntimeConfig, ConfigError> {
        let cfg = RuntimeConfig {
            stream: self.stream.clone(),
            upload: self.upload.clone(),
            volume: self.volume,
            mesh: self.mesh.clone(),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = AppConfig::from_toml_str("").expect("parse");
        assert_eq!(cfg.world.seed, strata_world::worldgen::DEFAULT_SEED);
        assert_eq!(cfg.stream.view_distance, 31);
        assert_eq!(cfg.volume, VolumeConfig::default());
        assert!(cfg.runtime_config().is_ok());
        assert!(cfg.world_params().is_ok());
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [world]
            seed = 42
            sea_level = 70

            [stream]
            view_distance = 4

            [upload.budget]
            high_rate = 16

            [volume]
            width = 144
            depth = 144

            [mesh]
            workers = 3
            debug_colors = true
            "#,
        )
        .expect("parse");
        let params = cfg.world_params().expect("params");
        assert_eq!((params.seed, params.sea_level), (42, 70));
        let rt = cfg.runtime_config().expect("runtime");
        assert_eq!(rt.stream.view_distance, 4);
        assert_eq!(rt.stream.loads_per_yield, 10);
        assert_eq!(rt.upload.budget.high_rate, 16);
        assert_eq!(rt.upload.budget.low_rate, 1);
        assert_eq!(rt.mesh.workers, 3);
        assert!(rt.mesh.debug_colors);
    }

    #[test]
    fn undersized_volume_is_rejected() {
        let cfg = AppConfig::from_toml_str("[stream]\nview_distance = 40\n").expect("parse");
        assert!(matches!(
            cfg.runtime_config(),
            Err(ConfigError::Runtime(StreamError::VolumeTooSmall { .. }))
        ));
    }

    #[test]
    fn bad_world_values_surface_at_load() {
        let cfg = AppConfig::from_toml_str("[world]\nsea_level = 900\n").expect("parse");
        assert!(matches!(cfg.world_params(), Err(ConfigError::World(_))));
        assert!(matches!(
            AppConfig::from_toml_str("[stream]\nview_distance = \"far\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_disk() {
        let mut f = tempfile::NamedTempFile::new().expect("tmp");
        writeln!(f, "[world]\nseed = 7").expect("write");
        let cfg = AppConfig::load(f.path()).expect("load");
        assert_eq!(cfg.world.seed, 7);
        assert!(matches!(
            AppConfig::load(Path::new("/nonexistent/strata.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
