use crate::animation::clock::PlaybackClock;
use crate::animation::profile::AnimationProfile;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StickerError, StickerResult};

/// Timing snapshot for one render tick.
///
/// Every layer drawn during a tick reads the same `Tick`, which keeps the character frame, the
/// background seek position and any phase-driven effect in step.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Tick {
    /// Visible character frame, always in `[0, frames_per_cycle)`.
    pub frame: FrameIndex,
    /// `true` when this tick started a new playback window.
    pub did_restart: bool,
    /// Milliseconds since the window start, in `[0, window_ms)`.
    pub elapsed_ms: f64,
    /// Length of the playback window.
    pub window_ms: f64,
}

impl Tick {
    /// Position inside the playback window in `[0, 1)`.
    pub fn window_progress(&self) -> f64 {
        self.elapsed_ms / self.window_ms
    }

    /// Zero-based cycle number inside the window.
    pub fn cycle(&self, profile: &AnimationProfile) -> u32 {
        (self.elapsed_ms / profile.cycle_ms()).floor() as u32
    }
}

/// Map a monotonic timestamp to the visible frame, restarting the window when it has elapsed.
///
/// Time based rather than tick-count based, so irregular callers never drift from wall-clock
/// duration. An unset clock latches `now_ms`; a clock ahead of `now_ms` (stale after a parameter
/// change that skipped [`PlaybackClock::reset`]) restarts the window instead of producing a
/// negative elapsed time.
pub fn current_frame(now_ms: f64, clock: &mut PlaybackClock, profile: &AnimationProfile) -> Tick {
    let start = *clock.cycle_start_ms.get_or_insert(now_ms);
    let window_ms = profile.window_ms();

    let mut elapsed_ms = now_ms - start;
    let mut did_restart = false;
    if elapsed_ms >= window_ms || elapsed_ms < 0.0 || !elapsed_ms.is_finite() {
        clock.cycle_start_ms = Some(now_ms);
        elapsed_ms = 0.0;
        did_restart = true;
        tracing::trace!(now_ms, window_ms, "playback window restarted");
    }

    let step = (elapsed_ms / profile.frame_duration_ms()).floor() as u64;
    let frame = (step % u64::from(profile.frames_per_cycle())) as u32;

    Tick {
        frame: FrameIndex(frame),
        did_restart,
        elapsed_ms,
        window_ms,
    }
}

/// Progress in `[0, 1)` of a secondary, independently started phase over `window_ms`.
pub fn secondary_phase(now_ms: f64, start_ms: f64, window_ms: f64) -> StickerResult<f64> {
    if !window_ms.is_finite() || window_ms <= 0.0 {
        return Err(StickerError::precondition(format!(
            "secondary phase window must be a finite value > 0 (got {window_ms})"
        )));
    }
    let elapsed = (now_ms - start_ms).rem_euclid(window_ms);
    let p = elapsed / window_ms;
    // rem_euclid may round up to exactly `window_ms` for tiny negative inputs.
    Ok(if p >= 1.0 { 0.0 } else { p })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
