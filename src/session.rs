//! Live preview and export driver.
//!
//! A [`StickerSession`] owns the shared playback timeline and every layer of the sticker. Preview
//! and export render through the same [`StickerSession::render_frame`]; export only swaps the
//! wall clock for a simulated capture clock starting at zero.

use image::RgbaImage;

use crate::{
    animation::{particles::ParticleEmitter, playback::Playback, profile::Speed, zoom::ZoomPulse},
    compose::{
        background::{Background, BackgroundTransform},
        compositor::{Compositor, Layers},
        source::FrameSource,
    },
    config::StickerConfig,
    encode::sink::{FrameSink, SinkConfig},
    export::plan::{ExportPlan, ExportReport},
    foundation::error::{StickerError, StickerResult},
};

pub struct StickerSession {
    config: StickerConfig,
    playback: Playback,
    compositor: Compositor,
    character: Box<dyn FrameSource>,
    background: Option<Background>,
    logo: Option<RgbaImage>,
    zoom: ZoomPulse,
    emitter: ParticleEmitter,
}

impl StickerSession {
    pub fn new(
        config: StickerConfig,
        character: Box<dyn FrameSource>,
        background: Option<Background>,
        logo: Option<RgbaImage>,
    ) -> StickerResult<Self> {
        config.validate()?;
        let playback = config.playback()?;
        let needed = playback.profile().frames_per_cycle() as usize;
        if character.frame_count() < needed {
            return Err(StickerError::validation(format!(
                "character source has {} frames, the cycle needs {needed}",
                character.frame_count()
            )));
        }

        Ok(Self {
            compositor: Compositor::new(config.canvas)?.with_style(config.overlay),
            zoom: ZoomPulse::new(config.zoom_intensity),
            emitter: new_emitter(&config),
            playback,
            character,
            background,
            logo,
            config,
        })
    }

    pub fn config(&self) -> &StickerConfig {
        &self.config
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn set_speed(&mut self, speed: Speed) -> StickerResult<()> {
        self.playback.set_speed(speed)?;
        self.config.animation.speed = speed;
        self.config.animation.loop_count = self.playback.profile().loop_count();
        Ok(())
    }

    /// Returns the loop count actually applied.
    pub fn set_loop_count(&mut self, loop_count: u32) -> StickerResult<u32> {
        let applied = self.playback.set_loop_count(loop_count)?;
        self.config.animation.loop_count = applied;
        Ok(applied)
    }

    pub fn set_background(&mut self, background: Option<Background>) {
        self.background = background;
        self.playback.background_changed();
    }

    pub fn set_transform(&mut self, transform: BackgroundTransform) -> StickerResult<()> {
        transform.validate()?;
        self.config.transform = transform;
        Ok(())
    }

    pub fn set_zoom_intensity(&mut self, intensity: f64) {
        self.zoom = ZoomPulse::new(intensity);
        self.config.zoom_intensity = self.zoom.intensity;
        self.playback.effect_toggled();
    }

    pub fn set_particles_enabled(&mut self, enabled: bool) {
        self.config.particles.enabled = enabled;
        if !enabled {
            self.emitter.stop();
        }
        self.playback.effect_toggled();
    }

    pub fn set_logo(&mut self, logo: Option<RgbaImage>) {
        self.logo = logo;
    }

    /// Export plan for the current playback settings.
    pub fn plan(&self) -> StickerResult<ExportPlan> {
        let export = &self.config.export;
        ExportPlan::new(
            self.playback.profile(),
            &self.config.budget,
            export.preset,
            export.format,
            export.weak_encoder,
            export.capture(),
        )
    }

    /// Render the sticker as it looks at `now_ms` on the caller's clock.
    pub fn render_frame(&mut self, now_ms: f64) -> StickerResult<RgbaImage> {
        let tick = self.playback.tick(now_ms);
        let progress = self.playback.phase(now_ms)?;

        if self.config.particles.enabled {
            if !self.emitter.is_active() {
                self.emitter.start(now_ms);
            }
            self.emitter.advance_to(now_ms);
        }

        let transform = self
            .config
            .transform
            .with_zoom(self.zoom.zoom_at(self.config.transform.zoom, progress));
        let layers = Layers {
            background: self
                .background
                .as_ref()
                .map(|bg| (bg.image_at(tick.elapsed_ms), transform)),
            particles: if self.config.particles.enabled {
                self.emitter.particles()
            } else {
                &[]
            },
            character: self.character.frame(tick.frame)?,
            logo: self.logo.as_ref(),
        };
        Ok(self.compositor.compose(&layers))
    }

    /// Render one full playback window at the capture cadence and feed it to `sink`.
    #[tracing::instrument(skip(self, sink), fields(format = %self.config.export.format))]
    pub fn export(&mut self, sink: &mut dyn FrameSink) -> StickerResult<ExportReport> {
        let plan = self.plan()?;
        let canvas = self.compositor.canvas();

        self.playback.restart_at(0.0);
        self.emitter = new_emitter(&self.config);

        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: plan.capture_fps,
            bitrate_bps: plan.bitrate_bps,
        })?;
        for i in 0..plan.capture_frames {
            let frame = self.render_frame(plan.capture_time_ms(i))?;
            sink.push_frame(i, &frame)?;
        }
        let output = sink.end()?;

        self.playback.reset();
        self.emitter = new_emitter(&self.config);

        let report = ExportReport::new(&plan, output.bytes, plan.capture_frames);
        tracing::info!(
            bytes = report.bytes,
            frames = report.frames,
            verdict = ?report.verdict,
            "export finished"
        );
        Ok(report)
    }
}

fn new_emitter(config: &StickerConfig) -> ParticleEmitter {
    ParticleEmitter::new(config.canvas, config.particles.emitter, config.particles.seed)
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
