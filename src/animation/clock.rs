/// Start stamp of the current playback window.
///
/// One clock drives every visual layer (character, background seek position, zoom pulse); it is
/// owned by a single render loop and must be [`reset`](Self::reset) whenever speed, loop count
/// or background change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackClock {
    /// Monotonic timestamp (ms) of the current window start. `None` until the first tick.
    pub cycle_start_ms: Option<f64>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock whose window starts at `now_ms`.
    pub fn started_at(now_ms: f64) -> Self {
        Self {
            cycle_start_ms: Some(now_ms),
        }
    }

    /// Forget the window start; the next tick starts a fresh window.
    pub fn reset(&mut self) {
        self.cycle_start_ms = None;
    }

    pub fn is_started(&self) -> bool {
        self.cycle_start_ms.is_some()
    }
}

/// Independently resettable start stamp for secondary effects (zoom pulse).
///
/// Kept apart from [`PlaybackClock`] so toggling an effect restarts its phase without jumping the
/// character animation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseClock {
    pub start_ms: Option<f64>,
}

impl PhaseClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.start_ms = None;
    }

    /// Start stamp, latching `now_ms` if the clock is unset.
    pub fn start_or_latch(&mut self, now_ms: f64) -> f64 {
        *self.start_ms.get_or_insert(now_ms)
    }
}
