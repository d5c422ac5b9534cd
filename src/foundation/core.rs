use crate::foundation::error::{StickerError, StickerResult};

/// Index of a frame inside one character animation cycle.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// Index as `usize` for slice access.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Sticker canvas used by the messaging platforms we target.
    pub const STICKER: Self = Self {
        width: 512,
        height: 512,
    };

    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> StickerResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    pub fn validate(&self) -> StickerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StickerError::validation("canvas width/height must be > 0"));
        }
        Ok(())
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::STICKER
    }
}

/// Check that a millisecond quantity is finite and strictly positive.
pub(crate) fn ensure_positive_ms(name: &str, v: f64) -> StickerResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(StickerError::validation(format!(
            "{name} must be a finite value > 0 (got {v})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
