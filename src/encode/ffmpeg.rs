use std::{
    io::Write as _,
    path::PathBuf,
    process::{Child, ChildStdin, Command, Stdio},
    thread::JoinHandle,
};

use image::RgbaImage;

use crate::{
    encode::{
        ensure_parent_dir, file_len,
        sink::{FrameGuard, FrameSink, SinkConfig, SinkOutput},
    },
    export::format::ContainerFormat,
    foundation::{
        error::{StickerError, StickerResult},
        math::mul_div255_u16,
    },
};

/// Output options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    pub format: ContainerFormat,
    pub overwrite: bool,
    /// Colour the frame is flattened onto for formats without an alpha channel.
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>, format: ContainerFormat) -> Self {
        Self {
            out_path: out_path.into(),
            format,
            overwrite: true,
            bg_rgba: [255, 255, 255, 255],
        }
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Name of the ffmpeg encoder used for `format`, or `None` for formats ffmpeg does not encode here.
pub fn encoder_name(format: ContainerFormat) -> Option<&'static str> {
    match format {
        ContainerFormat::WebmVp9 => Some("libvpx-vp9"),
        ContainerFormat::WebmVp8 => Some("libvpx"),
        ContainerFormat::Mp4H264Baseline | ContainerFormat::Mp4H264 | ContainerFormat::Mp4 => {
            Some("libx264")
        }
        ContainerFormat::Gif => None,
    }
}

/// Capability probe for format selection: `true` when the local ffmpeg lists the encoder.
///
/// GIF is always supported since it is encoded in-process.
pub fn ffmpeg_supports(format: ContainerFormat) -> bool {
    let Some(encoder) = encoder_name(format) else {
        return true;
    };
    let Ok(output) = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    else {
        return false;
    };
    if !output.status.success() {
        return false;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .any(|line| line.split_whitespace().nth(1) == Some(encoder))
}

fn keeps_alpha(format: ContainerFormat) -> bool {
    matches!(format, ContainerFormat::WebmVp9 | ContainerFormat::WebmVp8)
}

/// Codec-specific ffmpeg output arguments for `format` at `bitrate_bps`.
pub(crate) fn codec_args(format: ContainerFormat, bitrate_bps: u64) -> StickerResult<Vec<String>> {
    let bitrate = bitrate_bps.to_string();
    let args: Vec<&str> = match format {
        ContainerFormat::WebmVp9 => vec![
            "-c:v",
            "libvpx-vp9",
            "-pix_fmt",
            "yuva420p",
            "-auto-alt-ref",
            "0",
            "-b:v",
            bitrate.as_str(),
            "-f",
            "webm",
        ],
        ContainerFormat::WebmVp8 => vec![
            "-c:v",
            "libvpx",
            "-pix_fmt",
            "yuva420p",
            "-auto-alt-ref",
            "0",
            "-b:v",
            bitrate.as_str(),
            "-f",
            "webm",
        ],
        ContainerFormat::Mp4H264Baseline => vec![
            "-c:v",
            "libx264",
            "-profile:v",
            "baseline",
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            bitrate.as_str(),
            "-maxrate",
            bitrate.as_str(),
            "-movflags",
            "+faststart",
            "-f",
            "mp4",
        ],
        ContainerFormat::Mp4H264 | ContainerFormat::Mp4 => vec![
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            bitrate.as_str(),
            "-maxrate",
            bitrate.as_str(),
            "-movflags",
            "+faststart",
            "-f",
            "mp4",
        ],
        ContainerFormat::Gif => {
            return Err(StickerError::validation(
                "gif is not encoded through ffmpeg; use GifSink",
            ));
        }
    };
    Ok(args.into_iter().map(str::to_owned).collect())
}

/// Video sink piping raw RGBA frames into the system `ffmpeg`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    guard: FrameGuard,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> StickerResult<Self> {
        if !opts.format.is_video() {
            return Err(StickerError::validation(format!(
                "ffmpeg sink cannot encode '{}'",
                opts.format
            )));
        }
        Ok(Self {
            opts,
            guard: FrameGuard::default(),
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
        })
    }

    pub fn opts(&self) -> &FfmpegSinkOpts {
        &self.opts
    }
}

impl FrameSink for FfmpegSink {
    #[tracing::instrument(skip(self), fields(format = %self.opts.format, out = %self.opts.out_path.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> StickerResult<()> {
        cfg.validate()?;
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(StickerError::validation(
                "encode width/height must be even (required for 4:2:0 output)",
            ));
        }
        let Some(bitrate_bps) = cfg.bitrate_bps else {
            return Err(StickerError::validation("video sinks require a target bitrate"));
        };
        if self.child.is_some() {
            return Err(StickerError::encode("ffmpeg sink already started"));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(StickerError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(StickerError::encode(
                "ffmpeg is required for video export, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
        ])
        .args(codec_args(self.opts.format, bitrate_bps)?)
        .arg(&self.opts.out_path);

        tracing::debug!(bitrate_bps, fps = cfg.fps, "spawning ffmpeg");
        let mut child = cmd.spawn().map_err(|e| {
            StickerError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StickerError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| StickerError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        // ffmpeg blocks once the stderr pipe is full, so it is drained while frames stream in.
        let stderr_drain = std::thread::spawn(move || drain(stderr));

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.guard.begin(&cfg);
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbaImage) -> StickerResult<()> {
        self.guard.check(idx, frame)?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StickerError::encode("ffmpeg sink is not running"));
        };

        let bytes: &[u8] = if keeps_alpha(self.opts.format) {
            frame.as_raw()
        } else {
            flatten_to_opaque_rgba8(&mut self.scratch, frame.as_raw(), self.opts.bg_rgba)?;
            &self.scratch
        };
        stdin.write_all(bytes).map_err(|e| {
            StickerError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> StickerResult<SinkOutput> {
        drop(self.stdin.take());
        let Some(mut child) = self.child.take() else {
            return Err(StickerError::encode("ffmpeg sink was never started"));
        };

        let status = child.wait().map_err(|e| {
            StickerError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = join_drain(self.stderr_drain.take())?;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StickerError::encode(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }

        let bytes = file_len(&self.opts.out_path)?;
        tracing::debug!(bytes, "ffmpeg finished");
        Ok(SinkOutput { bytes })
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        let _ = join_drain(self.stderr_drain.take());
    }
}

fn drain(mut reader: impl std::io::Read) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn join_drain(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> StickerResult<Vec<u8>> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    handle
        .join()
        .map_err(|_| StickerError::encode("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| StickerError::encode(format!("ffmpeg stderr read failed: {e}")))
}

/// Composites straight-alpha RGBA over `bg_rgba`, producing opaque pixels.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    bg_rgba: [u8; 4],
) -> StickerResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StickerError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let v = mul_div255_u16(u16::from(s[c]), a) + mul_div255_u16(bg[c], inv);
            d[c] = v.min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
