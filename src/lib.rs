//! stickerloop turns a short character animation into a looping chat sticker.
//!
//! The crate is organised around one shared playback timeline:
//!
//! - [`animation`] maps wall-clock time to the visible character frame, bounded by the platform's
//!   3 second ceiling, and drives the phase-based effects (zoom pulse, particles)
//! - [`compose`] draws the background, effects, character and logo into an RGBA frame
//! - [`export`] plans the encoder bitrate that lands a clip under the upload size limit
//! - [`encode`] streams captured frames into ffmpeg or a GIF
//! - [`session`] ties it together for preview and export
#![forbid(unsafe_code)]

mod foundation;

/// Timing: speed presets, scheduler, playback controller and phase-driven effects.
pub mod animation;
/// Layer composition.
pub mod compose;
/// JSON configuration.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Format selection and bitrate planning.
pub mod export;
/// Preview/export session.
pub mod session;

pub use crate::foundation::core::{Canvas, FrameIndex};
pub use crate::foundation::error::{StickerError, StickerResult};

pub use crate::animation::clock::{PhaseClock, PlaybackClock};
pub use crate::animation::playback::Playback;
pub use crate::animation::profile::{AnimationProfile, Speed, max_loops_for_duration};
pub use crate::animation::scheduler::{Tick, current_frame, secondary_phase};
pub use crate::compose::background::{AnimatedBackground, Background, BackgroundTransform};
pub use crate::compose::source::{FrameSource, GifFrameSource};
pub use crate::config::StickerConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ffmpeg_supports, is_ffmpeg_on_path};
pub use crate::encode::gif::GifSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, SinkOutput};
pub use crate::export::bitrate::{BitratePreset, QualityTier, plan_bitrate, select_bitrate};
pub use crate::export::budget::ExportBudget;
pub use crate::export::format::{ContainerFormat, FormatFamily, FormatHint, select_format};
pub use crate::export::plan::{CaptureSettings, ExportPlan, ExportReport, SizeVerdict};
pub use crate::session::StickerSession;
