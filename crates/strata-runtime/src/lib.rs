//! Streaming runtime: chunk load/unload thread, mesh workers and the
//! presentation-side upload pipeline (engine-only).
#![forbid(unsafe_code)]

mod config;
mod error;
mod observer;
mod render;
mod runtime;
mod scheduler;
mod spiral;
mod streamer;
mod unload;
mod upload;
mod volume;

pub use config::{MeshConfig, RuntimeConfig, StreamConfig, UploadConfig, VolumeConfig};
pub use error::StreamError;
pub use observer::{ObserverSource, SharedObserver};
pub use render::{Presenter, RenderKey, RenderSet};
pub use runtime::{FrameReport, Runtime};
pub use scheduler::{MeshScheduler, MeshSink, PendingMesh, UploadQueue};
pub use spiral::Spiral;
pub use streamer::{CycleReport, Streamer, StreamerHandle};
pub use unload::UnloadSet;
pub use upload::{UploadBudget, UploadStats};
pub use volume::VolumeRegion;
