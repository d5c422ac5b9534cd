use crate::animation::clock::{PhaseClock, PlaybackClock};
use crate::animation::profile::{AnimationProfile, DEFAULT_MAX_WINDOW_MS, Speed, max_loops_for_duration};
use crate::animation::scheduler::{Tick, current_frame, secondary_phase};
use crate::foundation::core::ensure_positive_ms;
use crate::foundation::error::{StickerError, StickerResult};

/// Owner of the shared playback timeline.
///
/// Host inputs (speed, loop count, background, effect toggles) go through this type so every
/// change that invalidates the window start also resets the clocks.
#[derive(Clone, Debug)]
pub struct Playback {
    profile: AnimationProfile,
    clock: PlaybackClock,
    phase: PhaseClock,
    max_window_ms: f64,
}

impl Playback {
    /// Create a playback for `profile`, clamping its loop count under `max_window_ms`.
    pub fn new(profile: AnimationProfile, max_window_ms: f64) -> StickerResult<Self> {
        ensure_positive_ms("max_window_ms", max_window_ms)?;
        if profile.cycle_ms() > max_window_ms {
            return Err(StickerError::validation(format!(
                "one cycle ({} ms) is longer than the {max_window_ms} ms window limit",
                profile.cycle_ms()
            )));
        }
        let mut out = Self {
            profile,
            clock: PlaybackClock::new(),
            phase: PhaseClock::new(),
            max_window_ms,
        };
        out.set_loop_count(profile.loop_count())?;
        Ok(out)
    }

    /// Playback with the default 3 second ceiling.
    pub fn with_default_limit(profile: AnimationProfile) -> StickerResult<Self> {
        Self::new(profile, DEFAULT_MAX_WINDOW_MS)
    }

    pub fn profile(&self) -> &AnimationProfile {
        &self.profile
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn max_window_ms(&self) -> f64 {
        self.max_window_ms
    }

    /// Loop-count ceiling for the current frame duration (at least 1).
    pub fn max_loops(&self) -> u32 {
        max_loops_for_duration(
            self.profile.frame_duration_ms(),
            self.profile.frames_per_cycle(),
            self.max_window_ms,
        )
        .max(1)
    }

    /// Switch speed preset. Faster speeds allow more loops; the current loop count is kept when it
    /// still fits and clamped otherwise.
    pub fn set_speed(&mut self, speed: Speed) -> StickerResult<()> {
        self.set_frame_duration_ms(speed.frame_duration_ms())
    }

    pub fn set_frame_duration_ms(&mut self, frame_duration_ms: f64) -> StickerResult<()> {
        let next = self.profile.with_frame_duration(frame_duration_ms)?;
        if next.cycle_ms() > self.max_window_ms {
            return Err(StickerError::validation(format!(
                "one cycle ({} ms) is longer than the {} ms window limit",
                next.cycle_ms(),
                self.max_window_ms
            )));
        }
        self.profile = next;
        let loops = self.profile.loop_count().min(self.max_loops());
        self.profile = self.profile.with_loop_count(loops)?;
        tracing::debug!(
            frame_duration_ms,
            loops,
            window_ms = self.profile.window_ms(),
            "speed changed"
        );
        self.reset();
        Ok(())
    }

    /// Set the loop count, clamped to `[1, max_loops]`. Returns the applied value.
    pub fn set_loop_count(&mut self, loop_count: u32) -> StickerResult<u32> {
        let applied = loop_count.clamp(1, self.max_loops());
        if applied != loop_count {
            tracing::debug!(
                requested = loop_count,
                applied,
                "loop count clamped to window limit"
            );
        }
        self.profile = self.profile.with_loop_count(applied)?;
        self.reset();
        Ok(applied)
    }

    /// A new background invalidates the shared timeline.
    pub fn background_changed(&mut self) {
        self.reset();
    }

    /// Toggling a phase-driven effect restarts only the secondary phase.
    pub fn effect_toggled(&mut self) {
        self.phase.reset();
    }

    /// Pin both clocks to `now_ms` (used when a capture session starts).
    pub fn restart_at(&mut self, now_ms: f64) {
        self.clock = PlaybackClock::started_at(now_ms);
        self.phase = PhaseClock {
            start_ms: Some(now_ms),
        };
    }

    /// Zero the main and secondary clocks.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.phase.reset();
    }

    /// Advance the shared timeline to `now_ms`.
    pub fn tick(&mut self, now_ms: f64) -> Tick {
        current_frame(now_ms, &mut self.clock, &self.profile)
    }

    /// Secondary phase in `[0, 1)` over the playback window.
    pub fn phase(&mut self, now_ms: f64) -> StickerResult<f64> {
        let start = self.phase.start_or_latch(now_ms);
        secondary_phase(now_ms, start, self.profile.window_ms())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/playback.rs"]
mod tests;
