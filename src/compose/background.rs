use std::{
    fs::File,
    io::{BufRead, BufReader, Seek},
    path::Path,
};

use anyhow::Context as _;
use image::{AnimationDecoder as _, RgbaImage, codecs::gif::GifDecoder};
use kurbo::{Affine, Vec2};

use crate::foundation::{
    core::Canvas,
    error::{StickerError, StickerResult},
};

/// Delay used for GIF frames that declare none, as browsers do.
const DEFAULT_FRAME_DELAY_MS: f64 = 100.0;

/// Placement of the background image on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BackgroundTransform {
    /// Multiplier on top of the cover scale; `1.0` exactly covers the canvas.
    pub zoom: f64,
    /// Horizontal offset in percent of half the canvas, `-50..=50`.
    pub offset_x: f64,
    pub offset_y: f64,
    pub mirror_x: bool,
    pub mirror_y: bool,
}

impl Default for BackgroundTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            mirror_x: false,
            mirror_y: false,
        }
    }
}

impl BackgroundTransform {
    pub fn validate(&self) -> StickerResult<()> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(StickerError::validation("background zoom must be finite and > 0"));
        }
        for (name, v) in [("offset_x", self.offset_x), ("offset_y", self.offset_y)] {
            if !v.is_finite() || !(-50.0..=50.0).contains(&v) {
                return Err(StickerError::validation(format!(
                    "background {name} must be within -50..=50, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Same placement with a different zoom (used by the zoom pulse).
    pub fn with_zoom(self, zoom: f64) -> Self {
        Self { zoom, ..self }
    }

    /// Map from image pixel space into canvas space for an image of `image_size`.
    pub fn to_affine(&self, canvas: Canvas, image_size: (u32, u32)) -> Affine {
        let (cw, ch) = (canvas.width_f64(), canvas.height_f64());
        let (iw, ih) = (f64::from(image_size.0), f64::from(image_size.1));
        let cover = (cw / iw).max(ch / ih) * self.zoom;
        let sx = if self.mirror_x { -cover } else { cover };
        let sy = if self.mirror_y { -cover } else { cover };
        let center = Vec2::new(
            cw / 2.0 + self.offset_x / 50.0 * cw,
            ch / 2.0 + self.offset_y / 50.0 * ch,
        );

        Affine::translate(center)
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(Vec2::new(-iw / 2.0, -ih / 2.0))
    }
}

/// Looping frame sequence standing in for a background video.
#[derive(Clone, Debug)]
pub struct AnimatedBackground {
    frames: Vec<RgbaImage>,
    /// Cumulative end time of each frame, in ms.
    ends_ms: Vec<f64>,
    start_offset_ms: f64,
}

impl AnimatedBackground {
    pub fn new(frames: Vec<(RgbaImage, f64)>, start_offset_ms: f64) -> StickerResult<Self> {
        if frames.is_empty() {
            return Err(StickerError::validation("animated background has no frames"));
        }
        if !start_offset_ms.is_finite() || start_offset_ms < 0.0 {
            return Err(StickerError::validation(
                "background start offset must be finite and >= 0",
            ));
        }

        let mut ends_ms = Vec::with_capacity(frames.len());
        let mut images = Vec::with_capacity(frames.len());
        let mut t = 0.0;
        for (img, delay_ms) in frames {
            let delay = if delay_ms.is_finite() && delay_ms > 0.0 {
                delay_ms
            } else {
                DEFAULT_FRAME_DELAY_MS
            };
            t += delay;
            ends_ms.push(t);
            images.push(img);
        }
        Ok(Self {
            frames: images,
            ends_ms,
            start_offset_ms,
        })
    }

    pub fn from_path(path: &Path, start_offset_ms: f64) -> StickerResult<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open background gif '{}'", path.display()))?;
        Self::from_reader(BufReader::new(file), start_offset_ms)
    }

    pub fn from_reader<R: BufRead + Seek>(reader: R, start_offset_ms: f64) -> StickerResult<Self> {
        let frames = GifDecoder::new(reader)?.into_frames().collect_frames()?;
        let frames = frames
            .into_iter()
            .map(|f| {
                let (n, d) = f.delay().numer_denom_ms();
                let delay = if d == 0 { 0.0 } else { f64::from(n) / f64::from(d) };
                (f.into_buffer(), delay)
            })
            .collect();
        Self::new(frames, start_offset_ms)
    }

    pub fn duration_ms(&self) -> f64 {
        self.ends_ms.last().copied().unwrap_or(0.0)
    }

    pub fn start_offset_ms(&self) -> f64 {
        self.start_offset_ms
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame shown `elapsed_ms` after the last window restart.
    pub fn frame_at(&self, elapsed_ms: f64) -> &RgbaImage {
        let total = self.duration_ms();
        let t = (self.start_offset_ms + elapsed_ms.max(0.0)).rem_euclid(total);
        let idx = self.ends_ms.partition_point(|&end| end <= t);
        &self.frames[idx.min(self.frames.len() - 1)]
    }
}

/// Sticker background layer.
#[derive(Clone, Debug)]
pub enum Background {
    Still(RgbaImage),
    Animated(AnimatedBackground),
}

impl Background {
    /// Loads a PNG/JPEG as a still, or a GIF as an animated background.
    pub fn from_path(path: &Path, start_offset_ms: f64) -> StickerResult<Self> {
        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
        if is_gif {
            return Ok(Self::Animated(AnimatedBackground::from_path(path, start_offset_ms)?));
        }
        let img = image::open(path)
            .with_context(|| format!("failed to open background image '{}'", path.display()))?;
        Ok(Self::Still(img.into_rgba8()))
    }

    pub fn image_at(&self, elapsed_ms: f64) -> &RgbaImage {
        match self {
            Self::Still(img) => img,
            Self::Animated(anim) => anim.frame_at(elapsed_ms),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/background.rs"]
mod tests;
