use parking_lot::Mutex;
use strata_world::ChunkCoord;

/// Supplies the observer's world position. Polled once per streaming cycle
/// and again at every yield point.
pub trait ObserverSource: Send + Sync {
    fn position(&self) -> [f32; 3];

    fn chunk(&self) -> ChunkCoord {
        let [x, _, z] = self.position();
        ChunkCoord::from_world_pos(x, z)
    }
}

impl<F> ObserverSource for F
where
    F: Fn() -> [f32; 3] + Send + Sync,
{
    fn position(&self) -> [f32; 3] {
        self()
    }
}

/// Observer position written by the presentation thread.
#[derive(Debug, Default)]
pub struct SharedObserver {
    pos: Mutex<[f32; 3]>,
}

impl SharedObserver {
    pub fn new(pos: [f32; 3]) -> Self {
        Self {
            pos: Mutex::new(pos),
        }
    }

    pub fn set(&self, pos: [f32; 3]) {
        *self.pos.lock() = pos;
    }
}

impl ObserverSource for SharedObserver {
    fn position(&self) -> [f32; 3] {
        *self.pos.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_floors_negative_positions() {
        let obs = SharedObserver::new([-0.5, 80.0, 16.0]);
        assert_eq!(obs.chunk(), ChunkCoord::new(-1, 1));
        let f = || [40.0f32, 0.0, -40.0];
        assert_eq!(f.chunk(), ChunkCoord::new(2, -3));
    }
}
