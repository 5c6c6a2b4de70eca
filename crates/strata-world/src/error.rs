use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldGenError {
    #[error("noise field `{field}`: frequency must be finite and positive, got {value}")]
    InvalidFrequency { field: &'static str, value: f32 },
    #[error("noise field `{field}`: {what} must be finite, got {value}")]
    NonFinite {
        field: &'static str,
        what: &'static str,
        value: f32,
    },
    #[error("sea level {0} lies outside the world height")]
    SeaLevelOutOfRange(i32),
    #[error("failed to read worldgen config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse worldgen config: {0}")]
    Parse(#[from] toml::de::Error),
}
