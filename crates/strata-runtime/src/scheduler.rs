use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{error, trace};
use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_chunk::Chunk;
use strata_mesh_cpu::{ChunkMeshCPU, MeshOptions, build_chunk_mesh};

use crate::StreamError;

/// Receives chunks that became eligible for (re)meshing.
pub trait MeshSink: Send + Sync {
    fn request_mesh(&self, chunk: Arc<Chunk>);
}

/// One finished mesh on its way to the presentation thread: the source chunk
/// plus its opaque and translucent buffers and volume snapshot.
pub struct PendingMesh {
    pub chunk: Arc<Chunk>,
    /// Value returned by `Chunk::begin_mesh` for the job that built this mesh.
    pub generation: u64,
    pub mesh: ChunkMeshCPU,
}

/// Consumer end of the mesh hand-off. Producers are the mesh workers.
pub struct UploadQueue {
    rx: Receiver<PendingMesh>,
}

impl UploadQueue {
    #[inline]
    pub fn backlog(&self) -> usize {
        self.rx.len()
    }

    /// Non-blocking; `None` when nothing is ready.
    #[inline]
    pub fn try_pop(&self) -> Option<PendingMesh> {
        self.rx.try_recv().ok()
    }
}

/// Builds meshes off the presentation thread.
///
/// Requests for a chunk that already has one queued are coalesced. Without a
/// pool, meshes are built on the calling thread.
pub struct MeshScheduler {
    pool: Option<Arc<ThreadPool>>,
    tx: Sender<PendingMesh>,
    opts: MeshOptions,
    queued: Arc<AtomicUsize>,
    built: Arc<AtomicU64>,
    coalesced: AtomicU64,
}

impl MeshScheduler {
    pub fn new(workers: usize, opts: MeshOptions) -> Result<(Self, UploadQueue), StreamError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("strata-mesh-{i}"))
            .panic_handler(|payload| {
                error!(target: "mesh", "mesh job panicked: {}", StreamError::from_panic(payload));
            })
            .build()?;
        Ok(Self::with_pool(Some(Arc::new(pool)), opts))
    }

    /// Scheduler that meshes synchronously inside `request_mesh`.
    pub fn inline(opts: MeshOptions) -> (Self, UploadQueue) {
        Self::with_pool(None, opts)
    }

    fn with_pool(pool: Option<Arc<ThreadPool>>, opts: MeshOptions) -> (Self, UploadQueue) {
        let (tx, rx) = unbounded::<PendingMesh>();
        let scheduler = Self {
            pool,
            tx,
            opts,
            queued: Arc::new(AtomicUsize::new(0)),
            built: Arc::new(AtomicU64::new(0)),
            coalesced: AtomicU64::new(0),
        };
        (scheduler, UploadQueue { rx })
    }

    /// Jobs accepted but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    pub fn built(&self) -> u64 {
        self.built.load(Ordering::Relaxed)
    }

    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }

    fn run_job(chunk: Arc<Chunk>, opts: MeshOptions, tx: &Sender<PendingMesh>) {
        let generation = chunk.begin_mesh();
        let mesh = build_chunk_mesh(&chunk, opts);
        // The receiver only goes away at shutdown.
        let _ = tx.send(PendingMesh {
            chunk,
            generation,
            mesh,
        });
    }
}

impl MeshSink for MeshScheduler {
    fn request_mesh(&self, chunk: Arc<Chunk>) {
        if !chunk.try_mark_mesh_pending() {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
            trace!(target: "mesh", "coalesced request for {:?}", chunk.coord());
            return;
        }
        self.queued.fetch_add(1, Ordering::Relaxed);
        match &self.pool {
            Some(pool) => {
                let tx = self.tx.clone();
                let opts = self.opts;
                let queued = Arc::clone(&self.queued);
                let built = Arc::clone(&self.built);
                pool.spawn(move || {
                    Self::run_job(chunk, opts, &tx);
                    built.fetch_add(1, Ordering::Relaxed);
                    queued.fetch_sub(1, Ordering::Relaxed);
                });
            }
            None => {
                Self::run_job(chunk, self.opts, &self.tx);
                self.built.fetch_add(1, Ordering::Relaxed);
                self.queued.fetch_sub(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};
    use strata_world::ChunkCoord;

    fn chunk() -> Arc<Chunk> {
        Arc::new(Chunk::detached(ChunkCoord::new(0, 0), Vec::new()))
    }

    #[test]
    fn inline_scheduler_delivers_immediately() {
        let (sched, queue) = MeshScheduler::inline(MeshOptions::default());
        let c = chunk();
        c.mark_dirty();
        sched.request_mesh(Arc::clone(&c));
        assert_eq!(queue.backlog(), 1);
        let item = queue.try_pop().expect("mesh");
        assert!(Arc::ptr_eq(&item.chunk, &c));
        assert!(!c.is_dirty());
        assert!(queue.try_pop().is_none());
    }

    #[test]
    fn pending_requests_coalesce() {
        let (sched, queue) = MeshScheduler::inline(MeshOptions::default());
        let c = chunk();
        assert!(c.try_mark_mesh_pending());
        sched.request_mesh(Arc::clone(&c));
        assert_eq!(sched.coalesced(), 1);
        assert_eq!(queue.backlog(), 0);
    }

    #[test]
    fn pooled_scheduler_meshes_off_thread() {
        let (sched, queue) = MeshScheduler::new(2, MeshOptions::default()).expect("pool");
        let c = chunk();
        sched.request_mesh(Arc::clone(&c));
        let deadline = Instant::now() + Duration::from_secs(10);
        let item = loop {
            if let Some(item) = queue.try_pop() {
                break item;
            }
            assert!(Instant::now() < deadline, "mesh job never finished");
            thread::sleep(Duration::from_millis(1));
        };
        assert_eq!(item.chunk.coord(), ChunkCoord::new(0, 0));
        assert!(item.mesh.is_empty());
    }
}
