use std::{
    fs::File,
    io::{BufRead, BufReader, Seek},
    path::Path,
};

use anyhow::Context as _;
use image::{AnimationDecoder as _, RgbaImage, codecs::gif::GifDecoder};

use crate::foundation::{
    core::FrameIndex,
    error::{StickerError, StickerResult},
};

/// Indexed access to the frames of one character animation cycle.
pub trait FrameSource: Send {
    fn frame_count(&self) -> usize;
    fn frame(&self, idx: FrameIndex) -> StickerResult<&RgbaImage>;
}

/// Character frames decoded up front from an animated GIF.
#[derive(Clone, Debug)]
pub struct GifFrameSource {
    frames: Vec<RgbaImage>,
}

impl GifFrameSource {
    pub fn from_path(path: &Path, frames_per_cycle: u32) -> StickerResult<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open character gif '{}'", path.display()))?;
        Self::from_reader(BufReader::new(file), frames_per_cycle)
    }

    /// Decode the first `frames_per_cycle` frames; the rest of the GIF is ignored.
    pub fn from_reader<R: BufRead + Seek>(reader: R, frames_per_cycle: u32) -> StickerResult<Self> {
        let decoder = GifDecoder::new(reader)?;
        let mut frames = Vec::with_capacity(frames_per_cycle as usize);
        for frame in decoder.into_frames().take(frames_per_cycle as usize) {
            frames.push(frame?.into_buffer());
        }
        Self::from_frames(frames, frames_per_cycle)
    }

    pub fn from_frames(mut frames: Vec<RgbaImage>, frames_per_cycle: u32) -> StickerResult<Self> {
        if frames_per_cycle == 0 {
            return Err(StickerError::validation("frames_per_cycle must be > 0"));
        }
        if frames.len() < frames_per_cycle as usize {
            return Err(StickerError::validation(format!(
                "character animation has {} frames, expected at least {frames_per_cycle}",
                frames.len()
            )));
        }
        frames.truncate(frames_per_cycle as usize);

        let (w, h) = frames[0].dimensions();
        if w == 0 || h == 0 {
            return Err(StickerError::validation("character frames must be non-empty"));
        }
        if let Some(bad) = frames.iter().position(|f| f.dimensions() != (w, h)) {
            return Err(StickerError::validation(format!(
                "character frame {bad} is {}x{}, expected {w}x{h}",
                frames[bad].width(),
                frames[bad].height()
            )));
        }
        tracing::debug!(frames = frames.len(), width = w, height = h, "character frames loaded");
        Ok(Self { frames })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }
}

impl FrameSource for GifFrameSource {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, idx: FrameIndex) -> StickerResult<&RgbaImage> {
        self.frames.get(idx.as_usize()).ok_or_else(|| {
            StickerError::precondition(format!(
                "frame index {} out of range (cycle has {} frames)",
                idx.0,
                self.frames.len()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/source.rs"]
mod tests;
