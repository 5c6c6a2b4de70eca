use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use strata_store::WorldStore;
use strata_world::{BiomeClassifier, ChunkCoord};

use crate::StreamError;
use crate::config::StreamConfig;
use crate::observer::ObserverSource;
use crate::scheduler::MeshSink;
use crate::spiral::Spiral;
use crate::unload::UnloadSet;

/// Outcome of one unload scan plus spiral load pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub center: ChunkCoord,
    pub loaded: usize,
    pub unloaded: usize,
    /// Cells skipped because their coordinate was still awaiting retirement.
    pub deferred: usize,
    /// The spiral stopped early because the observer changed chunk.
    pub abandoned: bool,
}

/// Sole structural mutator of the world store.
pub struct Streamer {
    store: Arc<WorldStore>,
    classifier: Arc<BiomeClassifier>,
    unload: Arc<UnloadSet>,
    observer: Arc<dyn ObserverSource>,
    mesh: Arc<dyn MeshSink>,
    cfg: StreamConfig,
    stop: Arc<AtomicBool>,
}

impl Streamer {
    pub fn new(
        store: Arc<WorldStore>,
        classifier: Arc<BiomeClassifier>,
        unload: Arc<UnloadSet>,
        observer: Arc<dyn ObserverSource>,
        mesh: Arc<dyn MeshSink>,
        cfg: StreamConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            unload,
            observer,
            mesh,
            cfg,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.cfg
    }

    fn observer_chunk(&self) -> Result<ChunkCoord, StreamError> {
        let [x, _, z] = self.observer.position();
        if !x.is_finite() || !z.is_finite() {
            return Err(StreamError::InvalidObserver { x, z });
        }
        Ok(ChunkCoord::from_world_pos(x, z))
    }

    fn stopping(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Sleeps in short slices so a stop request is noticed promptly.
    fn pause(&self, total: Duration) {
        let deadline = Instant::now() + total;
        while !self.stopping() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(Duration::from_millis(10)));
        }
    }

    /// Removes every chunk beyond the view distance and queues it for retirement.
    fn unload_scan(&self, center: ChunkCoord) -> usize {
        let mut unloaded = 0;
        for coord in self.store.coords() {
            if coord.chebyshev_distance(center) <= self.cfg.view_distance {
                continue;
            }
            if self.store.remove(coord).is_some() {
                self.unload.push(coord);
                unloaded += 1;
            }
        }
        unloaded
    }

    /// Generates and publishes one chunk. Returns false if it was already present.
    fn load(&self, coord: ChunkCoord) -> bool {
        let chunk = self.store.generate_chunk(coord, &self.classifier);
        let Some(chunk) = self.store.insert_if_absent(chunk) else {
            return false;
        };
        let neighbors = self.store.neighbors(coord);
        for n in neighbors.present() {
            self.mesh.request_mesh(Arc::clone(n));
        }
        if neighbors.all_present() {
            self.mesh.request_mesh(chunk);
        }
        true
    }

    /// One full streaming cycle: unload scan, then the spiral load scan.
    pub fn run_cycle(&self) -> Result<CycleReport, StreamError> {
        let center = self.observer_chunk()?;
        let mut report = CycleReport {
            center,
            unloaded: self.unload_scan(center),
            ..CycleReport::default()
        };

        let per_yield = self.cfg.loads_per_yield.max(1);
        let mut since_yield = 0;
        for coord in Spiral::new(center, self.cfg.view_distance) {
            if self.stopping() {
                break;
            }
            if self.store.contains(coord) {
                continue;
            }
            if self.unload.contains(coord) {
                report.deferred += 1;
                continue;
            }
            if !self.load(coord) {
                continue;
            }
            report.loaded += 1;
            since_yield += 1;
            if since_yield == per_yield {
                since_yield = 0;
                if self.observer_chunk()? != center {
                    report.abandoned = true;
                    break;
                }
                self.pause(self.cfg.yield_pause());
            }
        }
        Ok(report)
    }

    /// Runs cycles until nothing is loaded or unloaded, up to `max_cycles`.
    /// Returns the number of cycles run.
    pub fn run_until_stable(&self, max_cycles: usize) -> Result<usize, StreamError> {
        for n in 1..=max_cycles {
            let report = self.run_cycle()?;
            if report.loaded == 0 && report.unloaded == 0 && report.deferred == 0 && !report.abandoned {
                return Ok(n);
            }
        }
        Ok(max_cycles)
    }

    /// Starts the streaming loop on its own thread.
    pub fn spawn(self) -> Result<StreamerHandle, StreamError> {
        let stop = Arc::clone(&self.stop);
        let join = thread::Builder::new()
            .name("strata-streamer".into())
            .spawn(move || self.run_loop())?;
        Ok(StreamerHandle {
            stop,
            join: Some(join),
        })
    }

    fn run_loop(self) {
        info!(target: "stream", "streamer started (view distance {})", self.cfg.view_distance);
        let mut cycles: u64 = 0;
        while !self.stopping() {
            let outcome = catch_unwind(AssertUnwindSafe(|| self.run_cycle()))
                .unwrap_or_else(|payload| Err(StreamError::from_panic(payload)));
            match outcome {
                Ok(report) => {
                    if report.loaded > 0 || report.unloaded > 0 || report.abandoned {
                        debug!(
                            target: "stream",
                            "cycle {} at {:?}: +{} -{} deferred={} abandoned={}",
                            cycles,
                            report.center,
                            report.loaded,
                            report.unloaded,
                            report.deferred,
                            report.abandoned
                        );
                    }
                }
                Err(e) => error!(target: "stream", "cycle {} failed: {}", cycles, e),
            }
            cycles += 1;
            self.pause(self.cfg.cycle_pause());
        }
        info!(target: "stream", "streamer stopped after {} cycles", cycles);
    }
}

/// Owns the streamer thread. Dropping it stops and joins the thread.
pub struct StreamerHandle {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl StreamerHandle {
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                error!(target: "stream", "streamer thread panicked outside a cycle");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }
}

impl Drop for StreamerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
