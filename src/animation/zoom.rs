use std::f64::consts::TAU;

/// Peak zoom variation at full intensity (±15 %).
const MAX_VARIATION: f64 = 0.15;

/// Sinusoidal zoom "bounce" applied to the background, one period per playback window.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZoomPulse {
    /// 0 disables the pulse, 100 is the strongest bounce.
    pub intensity: f64,
}

impl ZoomPulse {
    pub fn new(intensity: f64) -> Self {
        Self {
            intensity: intensity.clamp(0.0, 100.0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.intensity > 0.0
    }

    /// Zoom at `progress` (secondary phase in `[0, 1)`) around `base_zoom`.
    pub fn zoom_at(&self, base_zoom: f64, progress: f64) -> f64 {
        if !self.is_active() {
            return base_zoom;
        }
        let bounce = (progress * TAU).sin();
        let variation = MAX_VARIATION * (self.intensity.min(100.0) / 100.0);
        base_zoom * (1.0 + bounce * variation)
    }
}
