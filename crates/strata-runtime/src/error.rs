use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("observer position ({x}, {z}) is not finite")]
    InvalidObserver { x: f32, z: f32 },
    #[error("streaming cycle panicked: {0}")]
    Panicked(String),
    #[error("volume region {width}x{depth} must be a multiple of the chunk size")]
    VolumeMisaligned { width: usize, depth: usize },
    #[error("volume region {width}x{depth} cannot hold a view distance of {view_distance} (needs {needed} blocks per side)")]
    VolumeTooSmall {
        width: usize,
        depth: usize,
        view_distance: i32,
        needed: usize,
    },
    #[error("view distance {0} must be non-negative")]
    InvalidViewDistance(i32),
    #[error("mesh worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("spawning streamer thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl StreamError {
    /// Text of a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        StreamError::Panicked(msg)
    }
}
