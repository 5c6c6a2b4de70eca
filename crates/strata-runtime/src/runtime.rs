use std::sync::Arc;

use log::{debug, info};
use strata_blocks::BlockType;
use strata_mesh_cpu::MeshOptions;
use strata_store::WorldStore;
use strata_world::{BiomeClassifier, WorldGenParams};

use crate::StreamError;
use crate::config::RuntimeConfig;
use crate::observer::SharedObserver;
use crate::render::{Presenter, RenderSet};
use crate::scheduler::{MeshScheduler, MeshSink, UploadQueue};
use crate::streamer::{Streamer, StreamerHandle};
use crate::unload::UnloadSet;
use crate::upload::UploadStats;
use crate::volume::VolumeRegion;

/// Work done by one presentation-thread frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub unloads: usize,
    pub uploads: usize,
    pub discarded: usize,
    /// Dirty chunks handed to the mesh scheduler this frame.
    pub swept: usize,
    /// Items still waiting after this frame's budget.
    pub backlog: usize,
}

/// Wires the world store, streamer, mesh workers and presentation side.
///
/// Owned by the presentation thread; `frame` is its once-per-frame entry point.
pub struct Runtime<P: Presenter> {
    store: Arc<WorldStore>,
    classifier: Arc<BiomeClassifier>,
    unload: Arc<UnloadSet>,
    scheduler: Arc<MeshScheduler>,
    uploads: UploadQueue,
    render: RenderSet<P>,
    volume: Arc<VolumeRegion>,
    observer: Arc<SharedObserver>,
    cfg: RuntimeConfig,
    streamer: Option<StreamerHandle>,
    frame: u64,
}

impl<P: Presenter> Runtime<P> {
    /// Runtime with a pooled mesh scheduler.
    pub fn new(params: WorldGenParams, cfg: RuntimeConfig, presenter: P) -> Result<Self, StreamError> {
        cfg.validate()?;
        let opts = MeshOptions {
            debug_colors: cfg.mesh.debug_colors,
        };
        let scheduler = MeshScheduler::new(cfg.mesh.worker_count(), opts)?;
        Self::assemble(params, cfg, presenter, scheduler)
    }

    /// Runtime that meshes on the requesting thread; streaming cycles and
    /// frames are then fully deterministic.
    pub fn new_inline(params: WorldGenParams, cfg: RuntimeConfig, presenter: P) -> Result<Self, StreamError> {
        cfg.validate()?;
        let opts = MeshOptions {
            debug_colors: cfg.mesh.debug_colors,
        };
        Self::assemble(params, cfg, presenter, MeshScheduler::inline(opts))
    }

    fn assemble(
        params: WorldGenParams,
        cfg: RuntimeConfig,
        presenter: P,
        (scheduler, uploads): (MeshScheduler, UploadQueue),
    ) -> Result<Self, StreamError> {
        let store = WorldStore::new();
        let volume = Arc::new(VolumeRegion::new(cfg.volume)?);
        store.add_observer(volume.clone());
        info!(
            target: "stream",
            "runtime ready: seed {} view distance {} volume {:?}",
            params.seed,
            cfg.stream.view_distance,
            volume.dims()
        );
        Ok(Self {
            store,
            classifier: Arc::new(BiomeClassifier::new(params)),
            unload: Arc::new(UnloadSet::new()),
            scheduler: Arc::new(scheduler),
            uploads,
            render: RenderSet::new(presenter),
            volume,
            observer: Arc::new(SharedObserver::default()),
            cfg,
            streamer: None,
            frame: 0,
        })
    }

    /// A streamer over this runtime's shared state. Run it synchronously with
    /// `run_cycle`, or use `start_streaming` for the background thread.
    pub fn streamer(&self) -> Streamer {
        Streamer::new(
            Arc::clone(&self.store),
            Arc::clone(&self.classifier),
            Arc::clone(&self.unload),
            self.observer.clone(),
            self.scheduler.clone(),
            self.cfg.stream.clone(),
        )
    }

    pub fn start_streaming(&mut self) -> Result<(), StreamError> {
        if self.streamer.as_ref().is_some_and(|h| h.is_running()) {
            return Ok(());
        }
        self.streamer = Some(self.streamer().spawn()?);
        Ok(())
    }

    pub fn stop_streaming(&mut self) {
        if let Some(mut handle) = self.streamer.take() {
            handle.stop();
        }
    }

    pub fn set_observer(&self, pos: [f32; 3]) {
        self.observer.set(pos);
    }

    /// One presentation step: retire unloaded chunks, sweep dirty chunks into
    /// the mesh scheduler, then apply a backlog-scaled number of uploads.
    pub fn frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        for coord in self.unload.drain() {
            self.render.apply_unload(coord, &self.volume);
            report.unloads += 1;
        }

        let every = u64::from(self.cfg.upload.dirty_sweep_frames.max(1));
        if self.frame % every == 0 {
            for chunk in self.store.dirty_chunks() {
                if !chunk.is_mesh_pending() {
                    report.swept += 1;
                }
                self.scheduler.request_mesh(chunk);
            }
        }

        let budget = self.cfg.upload.budget.per_frame(self.uploads.backlog());
        for _ in 0..budget {
            let Some(item) = self.uploads.try_pop() else {
                break;
            };
            if self.render.apply_upload(&item, &self.store, &self.volume) {
                report.uploads += 1;
            } else {
                report.discarded += 1;
            }
        }
        report.backlog = self.uploads.backlog();

        if report.unloads > 0 || report.swept > 0 {
            debug!(
                target: "upload",
                "frame {}: unloads={} swept={} uploads={} backlog={}",
                self.frame,
                report.unloads,
                report.swept,
                report.uploads,
                report.backlog
            );
        }
        self.frame += 1;
        report
    }

    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    pub fn store(&self) -> &Arc<WorldStore> {
        &self.store
    }

    pub fn classifier(&self) -> &Arc<BiomeClassifier> {
        &self.classifier
    }

    pub fn unload_set(&self) -> &Arc<UnloadSet> {
        &self.unload
    }

    pub fn scheduler(&self) -> &Arc<MeshScheduler> {
        &self.scheduler
    }

    pub fn render(&self) -> &RenderSet<P> {
        &self.render
    }

    pub fn volume(&self) -> &Arc<VolumeRegion> {
        &self.volume
    }

    pub fn stats(&self) -> UploadStats {
        self.render.stats()
    }

    pub fn upload_backlog(&self) -> usize {
        self.uploads.backlog()
    }

    pub fn get_block(&self, wx: i32, wy: i32, wz: i32) -> BlockType {
        self.store.get_block(wx, wy, wz)
    }

    pub fn set_block(&self, wx: i32, wy: i32, wz: i32, block: BlockType) -> bool {
        self.store.set_block(wx, wy, wz, block)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.cfg
    }
}
