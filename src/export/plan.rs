use crate::animation::profile::AnimationProfile;
use crate::export::bitrate::{BitratePreset, QualityTier, estimated_bytes, select_bitrate};
use crate::export::budget::ExportBudget;
use crate::export::format::ContainerFormat;
use crate::foundation::error::{StickerError, StickerResult};

/// Capture cadence of an export session.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Frames captured per second of playback.
    pub fps: u32,
    /// Extra time a live recorder keeps running after the playback window.
    pub grace_ms: f64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            grace_ms: 100.0,
        }
    }
}

/// Everything an encoder session needs to know before it starts.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExportPlan {
    pub format: ContainerFormat,
    pub duration_secs: f64,
    pub window_ms: f64,
    /// `None` for formats that are not bitrate driven (GIF).
    pub bitrate_bps: Option<u64>,
    pub estimated_bytes: Option<u64>,
    pub max_size_bytes: u64,
    pub capture_fps: u32,
    /// Frames an offline capture renders to cover one playback window.
    pub capture_frames: u64,
    /// When a live recorder must be stopped.
    pub stop_deadline_ms: f64,
    pub quality: QualityTier,
}

impl ExportPlan {
    pub fn new(
        profile: &AnimationProfile,
        budget: &ExportBudget,
        preset: BitratePreset,
        format: ContainerFormat,
        weak_encoder: bool,
        capture: CaptureSettings,
    ) -> StickerResult<Self> {
        budget.validate()?;
        if capture.fps == 0 {
            return Err(StickerError::validation("capture fps must be > 0"));
        }
        if !capture.grace_ms.is_finite() || capture.grace_ms < 0.0 {
            return Err(StickerError::validation(
                "capture grace_ms must be a finite value >= 0",
            ));
        }

        let window_ms = profile.window_ms();
        let duration_secs = profile.duration_secs();

        let (bitrate_bps, estimated) = match format.hint(weak_encoder) {
            Some(hint) => {
                let bps = select_bitrate(preset, duration_secs, budget, Some(hint))?;
                let est = estimated_bytes(bps, duration_secs, budget).round() as u64;
                (Some(bps), Some(est))
            }
            None => (None, None),
        };

        let capture_frames = (window_ms * f64::from(capture.fps) / 1000.0).ceil().max(1.0) as u64;

        let plan = Self {
            format,
            duration_secs,
            window_ms,
            bitrate_bps,
            estimated_bytes: estimated,
            max_size_bytes: budget.max_size_bytes,
            capture_fps: capture.fps,
            capture_frames,
            stop_deadline_ms: window_ms + capture.grace_ms,
            quality: QualityTier::for_duration(duration_secs),
        };
        tracing::info!(
            format = %plan.format,
            duration_secs,
            bitrate_bps = ?plan.bitrate_bps,
            estimated_bytes = ?plan.estimated_bytes,
            frames = plan.capture_frames,
            "export planned"
        );
        Ok(plan)
    }

    /// Capture timestamp (ms since window start) of frame `i`.
    pub fn capture_time_ms(&self, i: u64) -> f64 {
        (i as f64) * 1000.0 / f64::from(self.capture_fps)
    }
}

/// Whether the encoded output fits the upload limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeVerdict {
    WithinLimit,
    ExceedsLimit,
}

/// Post-encode size check.
///
/// Exceeding the limit is reported, not treated as an error: the bitrate plan is an open-loop
/// estimate and the caller decides what to do (re-export smaller, pick a lower preset).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ExportReport {
    pub format: ContainerFormat,
    pub bytes: u64,
    pub max_size_bytes: u64,
    pub bitrate_bps: Option<u64>,
    pub frames: u64,
    pub verdict: SizeVerdict,
}

impl ExportReport {
    pub fn new(plan: &ExportPlan, bytes: u64, frames: u64) -> Self {
        let verdict = if bytes > plan.max_size_bytes {
            tracing::warn!(
                kib = bytes as f64 / 1024.0,
                limit_kib = plan.max_size_bytes as f64 / 1024.0,
                "exported sticker exceeds the upload limit"
            );
            SizeVerdict::ExceedsLimit
        } else {
            SizeVerdict::WithinLimit
        };
        Self {
            format: plan.format,
            bytes,
            max_size_bytes: plan.max_size_bytes,
            bitrate_bps: plan.bitrate_bps,
            frames,
            verdict,
        }
    }

    pub fn exceeds_limit(&self) -> bool {
        self.verdict == SizeVerdict::ExceedsLimit
    }

    pub fn kib(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/plan.rs"]
mod tests;
