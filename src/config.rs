//! JSON configuration of a sticker session.
//!
//! Every section is optional; missing fields take the defaults of the bundled sticker.

use std::path::Path;

use anyhow::Context as _;

use crate::{
    animation::{
        particles::EmitterParams,
        playback::Playback,
        profile::{AnimationProfile, DEFAULT_FRAMES_PER_CYCLE, DEFAULT_MAX_WINDOW_MS, Speed},
    },
    compose::{background::BackgroundTransform, compositor::OverlayStyle},
    export::{
        bitrate::BitratePreset,
        budget::ExportBudget,
        format::{ContainerFormat, default_file_name},
        plan::{CaptureSettings, ExportPlan},
    },
    foundation::{
        core::Canvas,
        error::{StickerError, StickerResult},
    },
};

const DEFAULT_PARTICLE_SEED: u64 = 0x5EED;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub speed: Speed,
    /// Requested loops; clamped to what fits `max_window_ms`.
    pub loop_count: u32,
    pub frames_per_cycle: u32,
    pub max_window_ms: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: Speed::Normal,
            loop_count: 1,
            frames_per_cycle: DEFAULT_FRAMES_PER_CYCLE,
            max_window_ms: DEFAULT_MAX_WINDOW_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub preset: BitratePreset,
    pub format: ContainerFormat,
    pub capture_fps: u32,
    pub grace_ms: f64,
    /// Target platform, used in the output file name.
    pub platform: String,
    /// Cap MP4 output harder for encoders known to do poorly at sticker sizes.
    pub weak_encoder: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let capture = CaptureSettings::default();
        Self {
            preset: BitratePreset::Auto,
            format: ContainerFormat::WebmVp9,
            capture_fps: capture.fps,
            grace_ms: capture.grace_ms,
            platform: "telegram".to_owned(),
            weak_encoder: false,
        }
    }
}

impl ExportConfig {
    pub fn capture(&self) -> CaptureSettings {
        CaptureSettings {
            fps: self.capture_fps,
            grace_ms: self.grace_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub enabled: bool,
    pub seed: u64,
    pub emitter: EmitterParams,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: DEFAULT_PARTICLE_SEED,
            emitter: EmitterParams::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StickerConfig {
    pub canvas: Canvas,
    pub animation: AnimationConfig,
    pub budget: ExportBudget,
    pub export: ExportConfig,
    pub transform: BackgroundTransform,
    /// Background zoom pulse strength, `0..=100`.
    pub zoom_intensity: f64,
    pub particles: ParticleConfig,
    pub overlay: OverlayStyle,
    /// Where an animated background starts (and restarts) playing.
    pub background_start_offset_ms: f64,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::STICKER,
            animation: AnimationConfig::default(),
            budget: ExportBudget::sticker(),
            export: ExportConfig::default(),
            transform: BackgroundTransform::default(),
            zoom_intensity: 0.0,
            particles: ParticleConfig::default(),
            overlay: OverlayStyle::default(),
            background_start_offset_ms: 0.0,
        }
    }
}

impl StickerConfig {
    pub fn from_path(path: &Path) -> StickerResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let cfg = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> StickerResult<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> StickerResult<()> {
        self.canvas.validate()?;
        self.playback()?;
        self.budget.validate()?;
        self.transform.validate()?;

        if !(0.0..=100.0).contains(&self.zoom_intensity) {
            return Err(StickerError::validation(format!(
                "zoom_intensity must be within 0..=100, got {}",
                self.zoom_intensity
            )));
        }
        if self.export.capture_fps == 0 {
            return Err(StickerError::validation("export.capture_fps must be > 0"));
        }
        if !self.export.grace_ms.is_finite() || self.export.grace_ms < 0.0 {
            return Err(StickerError::validation("export.grace_ms must be finite and >= 0"));
        }
        if !self.background_start_offset_ms.is_finite() || self.background_start_offset_ms < 0.0 {
            return Err(StickerError::validation(
                "background_start_offset_ms must be finite and >= 0",
            ));
        }
        let platform = &self.export.platform;
        if platform.is_empty()
            || !platform
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StickerError::validation(format!(
                "export.platform '{platform}' must be a non-empty [A-Za-z0-9_-] name"
            )));
        }
        self.particles.emitter.validate()?;
        Ok(())
    }

    /// Requested profile, before loop clamping.
    pub fn requested_profile(&self) -> StickerResult<AnimationProfile> {
        let a = &self.animation;
        AnimationProfile::with_speed(a.frames_per_cycle, a.speed, a.loop_count.max(1))
    }

    /// Playback with the loop count clamped to the window limit.
    pub fn playback(&self) -> StickerResult<Playback> {
        Playback::new(self.requested_profile()?, self.animation.max_window_ms)
    }

    pub fn plan(&self) -> StickerResult<ExportPlan> {
        let playback = self.playback()?;
        ExportPlan::new(
            playback.profile(),
            &self.budget,
            self.export.preset,
            self.export.format,
            self.export.weak_encoder,
            self.export.capture(),
        )
    }

    pub fn file_name(&self) -> String {
        default_file_name(&self.export.platform, self.export.format)
    }
}
