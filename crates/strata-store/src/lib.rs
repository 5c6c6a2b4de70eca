//! Concurrent world store: the single owner of loaded chunk columns.
#![forbid(unsafe_code)]

mod neighbors;
mod store;

pub use neighbors::Neighbors;
pub use store::{VoxelObserver, WorldStore};
