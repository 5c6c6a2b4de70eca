use std::collections::VecDeque;

use hashbrown::HashSet;
use parking_lot::Mutex;
use strata_world::ChunkCoord;

#[derive(Default)]
struct Inner {
    queue: VecDeque<ChunkCoord>,
    members: HashSet<ChunkCoord>,
}

/// Coordinates removed from the store and not yet retired by presentation.
///
/// FIFO with a membership sidecar so the streamer's race guard is O(1).
/// While a coordinate is here it must not be reloaded.
#[derive(Default)]
pub struct UnloadSet {
    inner: Mutex<Inner>,
}

impl UnloadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the coordinate was already queued.
    pub fn push(&self, coord: ChunkCoord) -> bool {
        let mut inner = self.inner.lock();
        if !inner.members.insert(coord) {
            return false;
        }
        inner.queue.push_back(coord);
        true
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.inner.lock().members.contains(&coord)
    }

    /// Takes everything queued so far, oldest first. Empty is not an error.
    pub fn drain(&self) -> Vec<ChunkCoord> {
        let mut inner = self.inner.lock();
        inner.members.clear();
        inner.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().queue.is_empty()
    }

    pub fn snapshot(&self) -> Vec<ChunkCoord> {
        self.inner.lock().queue.iter().copied().collect()
    }
}
