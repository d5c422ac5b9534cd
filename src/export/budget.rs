use crate::foundation::error::{StickerError, StickerResult};

/// Duration threshold and multiplier for the short-clip bitrate boost.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoostTier {
    /// The tier applies to clips no longer than this.
    pub max_duration_secs: f64,
    pub factor: f64,
}

/// Bitrate multipliers for short clips, where container overhead is amortized worst.
///
/// Tiers are checked in order; the first whose `max_duration_secs` covers the clip wins, and
/// clips longer than every tier get no boost.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BoostSchedule {
    pub tiers: Vec<BoostTier>,
}

impl BoostSchedule {
    pub fn none() -> Self {
        Self { tiers: Vec::new() }
    }

    pub fn factor_for(&self, duration_secs: f64) -> f64 {
        self.tiers
            .iter()
            .find(|t| duration_secs <= t.max_duration_secs)
            .map_or(1.0, |t| t.factor)
    }

    pub fn validate(&self) -> StickerResult<()> {
        for t in &self.tiers {
            if !(t.max_duration_secs.is_finite() && t.max_duration_secs > 0.0) {
                return Err(StickerError::validation(
                    "boost tier max_duration_secs must be a finite value > 0",
                ));
            }
            if !(t.factor.is_finite() && t.factor >= 1.0) {
                return Err(StickerError::validation("boost tier factor must be >= 1"));
            }
        }
        for w in self.tiers.windows(2) {
            if w[0].max_duration_secs >= w[1].max_duration_secs {
                return Err(StickerError::validation(
                    "boost tiers must be sorted by ascending max_duration_secs",
                ));
            }
            if w[0].factor < w[1].factor {
                return Err(StickerError::validation(
                    "boost tier factors must not grow with duration",
                ));
            }
        }
        Ok(())
    }
}

impl Default for BoostSchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                BoostTier {
                    max_duration_secs: 0.5,
                    factor: 2.0,
                },
                BoostTier {
                    max_duration_secs: 1.0,
                    factor: 1.7,
                },
                BoostTier {
                    max_duration_secs: 2.0,
                    factor: 1.4,
                },
            ],
        }
    }
}

/// Narrow bitrate band used by the platform-optimized preset, tuned against the platform's own
/// transcoding.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlatformBand {
    pub floor_bps: u64,
    /// Ceiling for clips up to `short_max_duration_secs`.
    pub short_ceiling_bps: u64,
    pub long_ceiling_bps: u64,
    pub short_max_duration_secs: f64,
}

impl Default for PlatformBand {
    fn default() -> Self {
        Self {
            floor_bps: 2_500_000,
            short_ceiling_bps: 4_000_000,
            long_ceiling_bps: 3_000_000,
            short_max_duration_secs: 1.5,
        }
    }
}

impl PlatformBand {
    pub fn ceiling_for(&self, duration_secs: f64) -> u64 {
        if duration_secs <= self.short_max_duration_secs {
            self.short_ceiling_bps
        } else {
            self.long_ceiling_bps
        }
    }
}

/// Size limits of the target platform plus the tunable constants of the bitrate heuristic.
///
/// The compensation factor and the boost tiers are empirical; they are configuration, not
/// derived values.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportBudget {
    /// Hard upload ceiling.
    pub max_size_bytes: u64,
    /// Size the planner aims for, a little under the ceiling.
    pub target_size_bytes: u64,
    pub min_bitrate_bps: u64,
    pub max_bitrate_bps: u64,
    /// Real encoders land this many times under the naive `bitrate * duration` estimate.
    pub compression_compensation: f64,
    pub boost: BoostSchedule,
    /// Cap for the less efficient MP4/H.264 family.
    pub secondary_family_cap_bps: u64,
    /// Stricter MP4 cap for runtimes with a weak encoder.
    pub weak_encoder_cap_bps: u64,
    pub platform_band: PlatformBand,
}

impl ExportBudget {
    /// 256 KiB sticker limit, aiming at 252 KiB.
    pub fn sticker() -> Self {
        Self {
            max_size_bytes: 256 * 1024,
            target_size_bytes: 252 * 1024,
            min_bitrate_bps: 500_000,
            max_bitrate_bps: 6_000_000,
            compression_compensation: 2.2,
            boost: BoostSchedule::default(),
            secondary_family_cap_bps: 4_000_000,
            weak_encoder_cap_bps: 3_000_000,
            platform_band: PlatformBand::default(),
        }
    }

    pub fn validate(&self) -> StickerResult<()> {
        if self.max_size_bytes == 0 || self.target_size_bytes == 0 {
            return Err(StickerError::validation("budget sizes must be > 0"));
        }
        if self.target_size_bytes > self.max_size_bytes {
            return Err(StickerError::validation(
                "target_size_bytes must not exceed max_size_bytes",
            ));
        }
        if self.min_bitrate_bps == 0 || self.min_bitrate_bps > self.max_bitrate_bps {
            return Err(StickerError::validation(
                "bitrate bounds must satisfy 0 < min_bitrate_bps <= max_bitrate_bps",
            ));
        }
        if !(self.compression_compensation.is_finite() && self.compression_compensation > 0.0) {
            return Err(StickerError::validation(
                "compression_compensation must be a finite value > 0",
            ));
        }
        let band = &self.platform_band;
        if band.floor_bps > band.short_ceiling_bps || band.floor_bps > band.long_ceiling_bps {
            return Err(StickerError::validation(
                "platform band floor must not exceed its ceilings",
            ));
        }
        self.boost.validate()
    }

    /// Clamp a bitrate into `[min_bitrate_bps, max_bitrate_bps]`.
    ///
    /// On an unvalidated budget with inverted bounds the ceiling wins.
    pub fn clamp_bitrate(&self, bps: u64) -> u64 {
        bps.max(self.min_bitrate_bps).min(self.max_bitrate_bps)
    }
}

impl Default for ExportBudget {
    fn default() -> Self {
        Self::sticker()
    }
}
