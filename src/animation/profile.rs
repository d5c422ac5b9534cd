use crate::foundation::core::ensure_positive_ms;
use crate::foundation::error::{StickerError, StickerResult};

/// Frames in one cycle of the bundled character animation.
pub const DEFAULT_FRAMES_PER_CYCLE: u32 = 11;

/// Longest playback window a sticker may have (platform limit is 3 seconds).
pub const DEFAULT_MAX_WINDOW_MS: f64 = 3000.0;

/// Named per-frame display durations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    /// 18 ms per frame, ~200 ms per 11-frame cycle.
    #[default]
    Normal,
    /// 11 ms per frame, ~120 ms per 11-frame cycle.
    Fast,
    /// 30 ms per frame, ~330 ms per 11-frame cycle.
    Smooth,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Normal, Speed::Fast, Speed::Smooth];

    pub fn frame_duration_ms(self) -> f64 {
        match self {
            Self::Normal => 18.0,
            Self::Fast => 11.0,
            Self::Smooth => 30.0,
        }
    }

    /// Largest loop count that fits `max_window_ms` at this speed.
    pub fn max_loops(self, frames_per_cycle: u32, max_window_ms: f64) -> u32 {
        max_loops_for_duration(self.frame_duration_ms(), frames_per_cycle, max_window_ms)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Smooth => "smooth",
        }
    }
}

/// Largest loop count whose total play time does not exceed `max_total_ms`.
///
/// Always floors: overshooting the ceiling is not allowed, undershooting is. Returns 0 when a
/// single cycle is already longer than the ceiling, or when any input is not positive.
pub fn max_loops_for_duration(frame_duration_ms: f64, frames_per_cycle: u32, max_total_ms: f64) -> u32 {
    let cycle_ms = frame_duration_ms * f64::from(frames_per_cycle);
    if !cycle_ms.is_finite() || cycle_ms <= 0.0 || !max_total_ms.is_finite() || max_total_ms <= 0.0 {
        return 0;
    }
    let loops = (max_total_ms / cycle_ms).floor();
    if loops >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        loops as u32
    }
}

/// Immutable timing configuration of one sticker.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct AnimationProfile {
    frames_per_cycle: u32,
    frame_duration_ms: f64,
    loop_count: u32,
}

impl AnimationProfile {
    pub fn new(frames_per_cycle: u32, frame_duration_ms: f64, loop_count: u32) -> StickerResult<Self> {
        if frames_per_cycle == 0 {
            return Err(StickerError::validation("frames_per_cycle must be > 0"));
        }
        ensure_positive_ms("frame_duration_ms", frame_duration_ms)?;
        if loop_count == 0 {
            return Err(StickerError::validation("loop_count must be > 0"));
        }
        Ok(Self {
            frames_per_cycle,
            frame_duration_ms,
            loop_count,
        })
    }

    /// Profile for a named speed preset.
    pub fn with_speed(frames_per_cycle: u32, speed: Speed, loop_count: u32) -> StickerResult<Self> {
        Self::new(frames_per_cycle, speed.frame_duration_ms(), loop_count)
    }

    pub fn frames_per_cycle(&self) -> u32 {
        self.frames_per_cycle
    }

    pub fn frame_duration_ms(&self) -> f64 {
        self.frame_duration_ms
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Duration of one cycle in milliseconds.
    pub fn cycle_ms(&self) -> f64 {
        self.frame_duration_ms * f64::from(self.frames_per_cycle)
    }

    /// Length of the playback window (`frame_duration * frames_per_cycle * loop_count`).
    pub fn window_ms(&self) -> f64 {
        self.cycle_ms() * f64::from(self.loop_count)
    }

    pub fn duration_secs(&self) -> f64 {
        self.window_ms() / 1000.0
    }

    /// Total frames shown in one playback window.
    pub fn total_frames(&self) -> u64 {
        u64::from(self.frames_per_cycle) * u64::from(self.loop_count)
    }

    pub(crate) fn with_frame_duration(self, frame_duration_ms: f64) -> StickerResult<Self> {
        Self::new(self.frames_per_cycle, frame_duration_ms, self.loop_count)
    }

    pub(crate) fn with_loop_count(self, loop_count: u32) -> StickerResult<Self> {
        Self::new(self.frames_per_cycle, self.frame_duration_ms, loop_count)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/profile.rs"]
mod tests;
