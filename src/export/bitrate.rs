use crate::export::budget::ExportBudget;
use crate::export::format::{FormatFamily, FormatHint};
use crate::foundation::error::{StickerError, StickerResult};

/// How the export bitrate is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitratePreset {
    /// Straight from [`plan_bitrate`].
    #[default]
    Auto,
    /// [`plan_bitrate`] pulled into the budget's platform band.
    PlatformOptimized,
    /// A literal bitrate (bps), still clamped to the budget bounds.
    Custom(u64),
}

/// Open-loop bitrate estimate that lands a `duration_secs` clip near the budget's target size.
///
/// The result is always inside `[min_bitrate_bps, max_bitrate_bps]`; it is not a guarantee on
/// the encoded size.
pub fn plan_bitrate(
    duration_secs: f64,
    budget: &ExportBudget,
    hint: Option<FormatHint>,
) -> StickerResult<u64> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(StickerError::precondition(format!(
            "bitrate planning needs a finite duration > 0 (got {duration_secs})"
        )));
    }
    budget.validate()?;

    let max = budget.max_bitrate_bps as f64;
    let min = budget.min_bitrate_bps as f64;

    let mut bps = ((budget.target_size_bytes as f64) * 8.0 / duration_secs).floor();

    if let Some(h) = hint
        && h.family == FormatFamily::Secondary
    {
        bps = bps.min(budget.secondary_family_cap_bps as f64);
        if h.weak_encoder {
            bps = bps.min(budget.weak_encoder_cap_bps as f64);
        }
    }

    let boost = budget.boost.factor_for(duration_secs);
    if boost > 1.0 {
        bps = (bps * boost).min(max);
    }

    let out = bps.clamp(min, max).floor() as u64;
    tracing::debug!(
        family = ?hint.map(|h| h.family),
        duration_secs,
        boost,
        kbps = out / 1000,
        "planned export bitrate"
    );
    Ok(out)
}

/// Resolve a preset to the bitrate handed to the encoder.
pub fn select_bitrate(
    preset: BitratePreset,
    duration_secs: f64,
    budget: &ExportBudget,
    hint: Option<FormatHint>,
) -> StickerResult<u64> {
    budget.validate()?;
    match preset {
        BitratePreset::Auto => plan_bitrate(duration_secs, budget, hint),
        BitratePreset::PlatformOptimized => {
            let planned = plan_bitrate(duration_secs, budget, hint)?;
            let band = &budget.platform_band;
            let banded = planned
                .min(band.ceiling_for(duration_secs))
                .max(band.floor_bps);
            Ok(budget.clamp_bitrate(banded))
        }
        BitratePreset::Custom(bps) => Ok(budget.clamp_bitrate(bps)),
    }
}

/// Expected output size in bytes, corrected by the budget's compression compensation.
///
/// For UI feedback only.
pub fn estimated_bytes(bitrate_bps: u64, duration_secs: f64, budget: &ExportBudget) -> f64 {
    (bitrate_bps as f64) * duration_secs / 8.0 / budget.compression_compensation
}

/// Coarse quality label derived from the clip length; shorter clips get more bits per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Ultra,
    High,
    Good,
    Standard,
}

impl QualityTier {
    pub fn for_duration(duration_secs: f64) -> Self {
        if duration_secs <= 0.5 {
            Self::Ultra
        } else if duration_secs <= 1.0 {
            Self::High
        } else if duration_secs <= 2.0 {
            Self::Good
        } else {
            Self::Standard
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ultra => "Ultra Quality",
            Self::High => "High Quality",
            Self::Good => "Good Quality",
            Self::Standard => "Standard Quality",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/bitrate.rs"]
mod tests;
