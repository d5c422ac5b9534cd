use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use stickerloop::{
    Background, BitratePreset, ContainerFormat, FfmpegSink, FfmpegSinkOpts, FrameSink,
    GifFrameSource, GifSink, Speed, StickerConfig, StickerSession, ffmpeg_supports, select_format,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stickerloop", version, about = "Looping animated chat stickers")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the export plan (bitrate, duration, capture frames) as JSON.
    Plan(PlanArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render one playback window and encode it (video formats require `ffmpeg` on PATH).
    Export(ExportArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SpeedChoice {
    Normal,
    Fast,
    Smooth,
}

impl From<SpeedChoice> for Speed {
    fn from(s: SpeedChoice) -> Self {
        match s {
            SpeedChoice::Normal => Speed::Normal,
            SpeedChoice::Fast => Speed::Fast,
            SpeedChoice::Smooth => Speed::Smooth,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetChoice {
    Auto,
    PlatformOptimized,
}

/// Config file plus per-field overrides.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Sticker config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    speed: Option<SpeedChoice>,

    /// Requested loop count (clamped to the 3 s window).
    #[arg(long)]
    loops: Option<u32>,

    /// Container format name or MIME type (e.g. `webm-vp9`, `video/mp4`).
    #[arg(long, conflicts_with = "detect_format")]
    format: Option<ContainerFormat>,

    /// Pick the best video format the local ffmpeg can encode.
    #[arg(long)]
    detect_format: bool,

    #[arg(long, value_enum, conflicts_with = "bitrate")]
    preset: Option<PresetChoice>,

    /// Literal bitrate in bps (still clamped to the budget bounds).
    #[arg(long)]
    bitrate: Option<u64>,

    #[arg(long)]
    platform: Option<String>,

    #[arg(long)]
    weak_encoder: bool,

    /// Background zoom pulse strength, 0..=100.
    #[arg(long)]
    zoom_intensity: Option<f64>,

    #[arg(long)]
    no_particles: bool,

    #[arg(long)]
    seed: Option<u64>,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<StickerConfig> {
        let mut cfg = match &self.config {
            Some(path) => StickerConfig::from_path(path)?,
            None => StickerConfig::default(),
        };

        if let Some(speed) = self.speed {
            cfg.animation.speed = speed.into();
        }
        if let Some(loops) = self.loops {
            cfg.animation.loop_count = loops;
        }
        if let Some(format) = self.format {
            cfg.export.format = format;
        }
        if self.detect_format {
            cfg.export.format = select_format(ffmpeg_supports).unwrap_or(ContainerFormat::Gif);
            tracing::info!(format = %cfg.export.format, "detected export format");
        }
        if let Some(preset) = self.preset {
            cfg.export.preset = match preset {
                PresetChoice::Auto => BitratePreset::Auto,
                PresetChoice::PlatformOptimized => BitratePreset::PlatformOptimized,
            };
        }
        if let Some(bps) = self.bitrate {
            cfg.export.preset = BitratePreset::Custom(bps);
        }
        if let Some(platform) = &self.platform {
            cfg.export.platform = platform.clone();
        }
        if self.weak_encoder {
            cfg.export.weak_encoder = true;
        }
        if let Some(z) = self.zoom_intensity {
            cfg.zoom_intensity = z;
        }
        if self.no_particles {
            cfg.particles.enabled = false;
        }
        if let Some(seed) = self.seed {
            cfg.particles.seed = seed;
        }

        cfg.validate().context("invalid sticker configuration")?;
        Ok(cfg)
    }
}

/// Input images for a session.
#[derive(Args, Debug)]
struct LayerArgs {
    /// Animated GIF with the character cycle.
    #[arg(long)]
    character: PathBuf,

    /// Background image, or an animated GIF used like a looping video.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Logo drawn in the bottom-right corner.
    #[arg(long)]
    logo: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    layers: LayerArgs,

    /// Milliseconds since playback start.
    #[arg(long, default_value_t = 0.0)]
    at_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    layers: LayerArgs,

    /// Output path. Defaults to `sticker_<platform>.<ext>` in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = args.config.load()?;
    let plan = cfg.plan()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize export plan")?
    );
    Ok(())
}

fn open_session(cfg: StickerConfig, layers: &LayerArgs) -> anyhow::Result<StickerSession> {
    let character = GifFrameSource::from_path(&layers.character, cfg.animation.frames_per_cycle)
        .with_context(|| format!("load character '{}'", layers.character.display()))?;
    let background = layers
        .background
        .as_deref()
        .map(|p| {
            Background::from_path(p, cfg.background_start_offset_ms)
                .with_context(|| format!("load background '{}'", p.display()))
        })
        .transpose()?;
    let logo = layers.logo.as_deref().map(read_rgba).transpose()?;

    Ok(StickerSession::new(cfg, Box::new(character), background, logo)?)
}

fn read_rgba(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    Ok(img.into_rgba8())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = args.config.load()?;
    let mut session = open_session(cfg, &args.layers)?;

    // Latch the timeline at zero so `at_ms` is relative to the playback start.
    session.render_frame(0.0)?;
    let frame = session.render_frame(args.at_ms.max(0.0))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let cfg = args.config.load()?;
    let out = args.out.unwrap_or_else(|| PathBuf::from(cfg.file_name()));
    let format = cfg.export.format;
    let mut session = open_session(cfg, &args.layers)?;

    let mut sink: Box<dyn FrameSink> = if format.is_video() {
        Box::new(FfmpegSink::new(FfmpegSinkOpts::new(&out, format))?)
    } else {
        Box::new(GifSink::new(&out))
    };
    let report = session.export(sink.as_mut())?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize export report")?
    );
    if report.exceeds_limit() {
        eprintln!(
            "warning: {} is {:.1} KiB, over the {} KiB limit",
            out.display(),
            report.kib(),
            report.max_size_bytes / 1024
        );
    } else {
        eprintln!("wrote {} ({:.1} KiB)", out.display(), report.kib());
    }
    Ok(())
}
