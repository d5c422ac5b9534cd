use image::RgbaImage;

use crate::foundation::error::{StickerError, StickerResult};

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Target video bitrate; `None` for sinks that are not bitrate driven.
    pub bitrate_bps: Option<u64>,
}

impl SinkConfig {
    pub fn validate(&self) -> StickerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StickerError::validation("sink width/height must be non-zero"));
        }
        if self.fps == 0 {
            return Err(StickerError::validation("sink fps must be non-zero"));
        }
        Ok(())
    }
}

/// What a sink produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkOutput {
    /// Encoded size in bytes.
    pub bytes: u64,
}

/// Consumer of captured frames (the capture/encode collaborator).
///
/// Ordering contract: `push_frame` is called with strictly increasing capture indices, between one
/// `begin` and one `end`.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> StickerResult<()>;
    fn push_frame(&mut self, idx: u64, frame: &RgbaImage) -> StickerResult<()>;
    fn end(&mut self) -> StickerResult<SinkOutput>;
}

/// Checks shared by every sink: frame size and capture order.
#[derive(Debug, Default)]
pub(crate) struct FrameGuard {
    size: Option<(u32, u32)>,
    last_idx: Option<u64>,
}

impl FrameGuard {
    pub(crate) fn begin(&mut self, cfg: &SinkConfig) {
        self.size = Some((cfg.width, cfg.height));
        self.last_idx = None;
    }

    pub(crate) fn check(&mut self, idx: u64, frame: &RgbaImage) -> StickerResult<()> {
        let Some((w, h)) = self.size else {
            return Err(StickerError::encode("push_frame called before begin"));
        };
        if frame.width() != w || frame.height() != h {
            return Err(StickerError::validation(format!(
                "frame size mismatch: got {}x{}, expected {w}x{h}",
                frame.width(),
                frame.height()
            )));
        }
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(StickerError::validation(format!(
                "frames must be pushed in increasing order (got {idx} after {:?})",
                self.last_idx
            )));
        }
        self.last_idx = Some(idx);
        Ok(())
    }
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    guard: FrameGuard,
    frames: Vec<(u64, RgbaImage)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(u64, RgbaImage)] {
        &self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StickerResult<()> {
        cfg.validate()?;
        self.guard.begin(&cfg);
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbaImage) -> StickerResult<()> {
        self.guard.check(idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StickerResult<SinkOutput> {
        self.ended = true;
        let bytes = self.frames.iter().map(|(_, f)| f.as_raw().len() as u64).sum();
        Ok(SinkOutput { bytes })
    }
}
