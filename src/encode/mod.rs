//! Encoding sinks.
//!
//! Sinks consume captured frames in capture order and report how many bytes they produced, which
//! feeds the post-export size check.

/// `ffmpeg`-based video sinks (WebM/MP4 via the system `ffmpeg`).
pub mod ffmpeg;
/// Animated GIF sink.
pub mod gif;
/// Sink trait and the in-memory sink.
pub mod sink;

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::StickerResult;

pub(crate) fn ensure_parent_dir(path: &Path) -> StickerResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub(crate) fn file_len(path: &Path) -> StickerResult<u64> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to stat encoded output '{}'", path.display()))?;
    Ok(meta.len())
}
