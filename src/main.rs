mod biome_map;
mod config;
mod headless;

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use strata_blocks::BlockType;
use strata_runtime::{Runtime, StreamError, VolumeConfig};
use strata_world::{Biome, BiomeClassifier};
use thiserror::Error;

use crate::biome_map::export_biome_map;
use crate::config::{AppConfig, ConfigError};
use crate::headless::HeadlessPresenter;

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Streaming voxel terrain core")]
struct Cli {
    /// TOML config with [world], [stream], [upload], [volume] and [mesh] sections.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream terrain around a scripted observer without a window.
    Stream(StreamArgs),
    /// Rasterize biome classification into a PNG.
    BiomeMap(BiomeMapArgs),
}

#[derive(Args, Debug)]
struct StreamArgs {
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,
    #[arg(long)]
    seed: Option<i32>,
    #[arg(long)]
    view_distance: Option<i32>,
    /// Observer speed along +x, in blocks per second.
    #[arg(long, default_value_t = 8.0)]
    speed: f32,
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Place a marker block above the observer every N seconds; 0 disables.
    #[arg(long, default_value_t = 2.0)]
    edit_every: f32,
    #[arg(long)]
    debug_colors: bool,
}

#[derive(Args, Debug)]
struct BiomeMapArgs {
    #[arg(short, long, default_value = "biome_map.png")]
    out: PathBuf,
    #[arg(long, default_value_t = 512)]
    size: u32,
    /// Blocks per pixel.
    #[arg(long, default_value_t = 8)]
    scale: u32,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    x: i32,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    z: i32,
    #[arg(long)]
    seed: Option<i32>,
    /// Shade by column height.
    #[arg(long)]
    shade: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("writing biome map: {0}")]
    Image(#[from] image::ImageError),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let result = AppConfig::load_or_default(cli.config.as_deref())
        .map_err(CliError::from)
        .and_then(|cfg| match cli.cmd {
            Command::Stream(args) => run_stream(cfg, args),
            Command::BiomeMap(args) => run_biome_map(cfg, args),
        });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_stream(mut cfg: AppConfig, args: StreamArgs) -> Result<(), CliError> {
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    if let Some(vd) = args.view_distance {
        cfg.stream.view_distance = vd;
        let fit = VolumeConfig::fitting(vd);
        cfg.volume.width = cfg.volume.width.max(fit.width);
        cfg.volume.depth = cfg.volume.depth.max(fit.depth);
    }
    cfg.mesh.debug_colors |= args.debug_colors;
    let params = cfg.world_params()?;
    let rcfg = cfg.runtime_config()?;

    let mut rt = Runtime::new(params, rcfg, HeadlessPresenter::default())?;
    let y = rt.classifier().sea_level() as f32 + 16.0;
    rt.set_observer([8.0, y, 8.0]);
    rt.start_streaming()?;

    let frame_time = Duration::from_secs_f32(1.0 / args.fps.max(1) as f32);
    let total = Duration::from_secs_f32(args.seconds.max(0.0));
    let start = Instant::now();
    let mut last_report = start;
    let mut last_edit = start;
    let mut edits = 0usize;
    while start.elapsed() < total {
        let t0 = Instant::now();
        let t = start.elapsed().as_secs_f32();
        let ox = 8.0 + args.speed * t;
        rt.set_observer([ox, y, 8.0]);

        if args.edit_every > 0.0 && last_edit.elapsed().as_secs_f32() >= args.edit_every {
            last_edit = Instant::now();
            let (wx, wz) = (ox.floor() as i32, 8);
            let col = rt.classifier().sample_column(wx, wz);
            if rt.set_block(wx, col.solid_height + 2, wz, BlockType::Stone) {
                edits += 1;
            }
        }

        let frame = rt.frame();
        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();
            let stats = rt.stats();
            let summary = rt.render().with_presenter(|p| p.summary());
            log::info!(
                "t={:.1}s observer x={:.0} loaded={} unloading={} live={} quads={} backlog={} applied={} discarded={} ghosts={}",
                t,
                ox,
                rt.store().len(),
                rt.unload_set().len(),
                summary.live,
                summary.opaque_quads + summary.translucent_quads,
                frame.backlog,
                stats.applied,
                stats.discarded,
                stats.ghosts
            );
        }
        if let Some(rest) = frame_time.checked_sub(t0.elapsed()) {
            thread::sleep(rest);
        }
    }
    rt.stop_streaming();

    let stats = rt.stats();
    let summary = rt.render().with_presenter(|p| p.summary());
    log::info!(
        "done: {} chunks loaded, {} live representations ({:.1} MiB vertex data), {} edits",
        rt.store().len(),
        summary.live,
        summary.bytes as f64 / (1024.0 * 1024.0),
        edits
    );
    log::info!(
        "uploads: created={} updated={} discarded={} destroyed={} ghosts={}",
        stats.created,
        stats.updated,
        stats.discarded,
        stats.destroyed,
        stats.ghosts
    );
    Ok(())
}

fn run_biome_map(mut cfg: AppConfig, args: BiomeMapArgs) -> Result<(), CliError> {
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    let classifier = BiomeClassifier::new(cfg.world_params()?);
    let t0 = Instant::now();
    let hist = export_biome_map(
        &classifier,
        (args.x, args.z),
        args.size,
        args.scale,
        args.shade,
        &args.out,
    )?;
    log::info!(
        "wrote {} ({}x{}, {} blocks/px) in {:.0?}",
        args.out.display(),
        args.size,
        args.size,
        args.scale,
        t0.elapsed()
    );
    let total = hist.total().max(1) as f64;
    for biome in Biome::ALL {
        let n = hist.count(biome);
        log::info!("  {:<10} {:>6.2}%", biome.name(), 100.0 * n as f64 / total);
    }
    Ok(())
}
