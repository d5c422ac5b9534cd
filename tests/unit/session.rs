use image::Rgba;

use super::*;
use crate::{
    compose::source::GifFrameSource, encode::sink::InMemorySink, export::plan::SizeVerdict,
    foundation::core::Canvas,
};

/// 64×64 canvas, smooth speed (30 ms frames, 330 ms window), no particles.
fn small_config() -> StickerConfig {
    let mut cfg = StickerConfig::default();
    cfg.canvas = Canvas::new(64, 64).unwrap();
    cfg.animation.speed = Speed::Smooth;
    cfg.particles.enabled = false;
    cfg
}

/// Frames sized to the character rect of a 64×64 canvas, so no resampling happens.
fn character(frames: u32) -> Box<dyn FrameSource> {
    let frames = (0..frames)
        .map(|i| RgbaImage::from_pixel(61, 61, Rgba([(i * 20) as u8, 0, 0, 255])))
        .collect();
    Box::new(GifFrameSource::from_frames(frames, 11).unwrap())
}

#[test]
fn too_few_character_frames_is_rejected() {
    let frames = vec![RgbaImage::new(4, 4); 5];
    let src = Box::new(GifFrameSource::from_frames(frames, 5).unwrap());
    let err = StickerSession::new(small_config(), src, None, None)
        .err()
        .unwrap();
    assert!(matches!(err, StickerError::Validation(_)));
}

#[test]
fn render_frame_follows_the_shared_clock() {
    let mut s = StickerSession::new(small_config(), character(11), None, None).unwrap();
    let first = s.render_frame(1000.0).unwrap();
    assert_eq!(first.get_pixel(32, 32)[0], 0);
    let later = s.render_frame(1095.0).unwrap();
    assert_eq!(later.get_pixel(32, 32)[0], 60);
    // Past the 330 ms window the timeline restarts on frame 0.
    let restarted = s.render_frame(1400.0).unwrap();
    assert_eq!(restarted.get_pixel(32, 32)[0], 0);
}

#[test]
fn export_pushes_one_window_at_capture_cadence() {
    let mut s = StickerSession::new(small_config(), character(11), None, None).unwrap();
    s.render_frame(5000.0).unwrap();

    let mut sink = InMemorySink::new();
    let report = s.export(&mut sink).unwrap();

    // ceil(330 ms * 30 fps / 1000) = 10 frames.
    assert_eq!(report.frames, 10);
    assert_eq!(sink.frames().len(), 10);
    assert!(sink.frames().iter().enumerate().all(|(i, (idx, _))| *idx == i as u64));
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps), (64, 64, 30));
    assert!(cfg.bitrate_bps.is_some());
    assert!(sink.is_ended());

    assert_eq!(report.bytes, 10 * 64 * 64 * 4);
    assert_eq!(report.verdict, SizeVerdict::WithinLimit);

    // Capture frame 1 is at 33.3 ms, frame 1 of the cycle (30 ms frames).
    assert_eq!(sink.frames()[1].1.get_pixel(32, 32)[0], 20);
    // The preview timeline is unset again afterwards.
    assert!(!s.playback().clock().is_started());
}

#[test]
fn loop_count_is_clamped_to_the_window() {
    let mut s = StickerSession::new(small_config(), character(11), None, None).unwrap();
    assert_eq!(s.set_loop_count(50).unwrap(), 9);
    assert_eq!(s.config().animation.loop_count, 9);
    assert_eq!(s.plan().unwrap().window_ms, 2970.0);
}

#[test]
fn particles_render_when_enabled() {
    let mut cfg = small_config();
    cfg.particles.enabled = true;
    let frames = (0..11).map(|_| RgbaImage::new(61, 61)).collect();
    let src = Box::new(GifFrameSource::from_frames(frames, 11).unwrap());
    let mut s = StickerSession::new(cfg, src, None, None).unwrap();
    let out = s.render_frame(0.0).unwrap();
    assert!(out.pixels().any(|p| p[3] > 0));

    s.set_particles_enabled(false);
    let out = s.render_frame(10.0).unwrap();
    assert!(out.pixels().all(|p| p[3] == 0));
}
