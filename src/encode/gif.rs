use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::Context as _;
use image::{
    Delay, Frame, RgbaImage,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    encode::{
        ensure_parent_dir, file_len,
        sink::{FrameGuard, FrameSink, SinkConfig, SinkOutput},
    },
    foundation::error::{StickerError, StickerResult},
};

/// Palette quantisation speed handed to the GIF encoder (1 = best, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// Infinitely repeating animated GIF, encoded in-process.
pub struct GifSink {
    out_path: PathBuf,
    overwrite: bool,
    guard: FrameGuard,
    delay: Option<Delay>,
    encoder: Option<GifEncoder<BufWriter<File>>>,
}

impl GifSink {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            guard: FrameGuard::default(),
            delay: None,
            encoder: None,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl GifSink {
    fn encode(&mut self, idx: u64, frame: &RgbaImage) -> StickerResult<()> {
        self.guard.check(idx, frame)?;
        let (Some(encoder), Some(delay)) = (self.encoder.as_mut(), self.delay) else {
            return Err(StickerError::encode("gif sink is not running"));
        };
        encoder
            .encode_frame(Frame::from_parts(frame.clone(), 0, 0, delay))
            .map_err(|e| StickerError::encode(format!("gif: failed to encode frame {idx}: {e}")))
    }
}

impl FrameSink for GifSink {
    #[tracing::instrument(skip(self), fields(out = %self.out_path.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> StickerResult<()> {
        cfg.validate()?;
        if self.encoder.is_some() {
            return Err(StickerError::encode("gif sink already started"));
        }
        ensure_parent_dir(&self.out_path)?;
        if !self.overwrite && self.out_path.exists() {
            return Err(StickerError::validation(format!(
                "output file '{}' already exists",
                self.out_path.display()
            )));
        }

        let file = File::create(&self.out_path)
            .with_context(|| format!("failed to create '{}'", self.out_path.display()))?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| StickerError::encode(format!("gif: {e}")))?;

        self.delay = Some(Delay::from_numer_denom_ms(1000, cfg.fps));
        self.guard.begin(&cfg);
        self.encoder = Some(encoder);
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbaImage) -> StickerResult<()> {
        let pushed = self.encode(idx, frame);
        if pushed.is_err() {
            // A failed export leaves a truncated file; the next begin starts over.
            self.encoder = None;
            self.delay = None;
        }
        pushed
    }

    fn end(&mut self) -> StickerResult<SinkOutput> {
        let Some(encoder) = self.encoder.take() else {
            return Err(StickerError::encode("gif sink was never started"));
        };
        // Dropping the encoder writes the trailer and flushes the file.
        drop(encoder);
        let bytes = file_len(&self.out_path)?;
        Ok(SinkOutput { bytes })
    }
}
