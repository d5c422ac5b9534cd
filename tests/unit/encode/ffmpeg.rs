use super::*;

#[test]
fn flatten_straight_over_black_produces_expected_rgb() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128u8, 0, 0, 255]);
}

#[test]
fn flatten_transparent_over_white_is_white() {
    let src = vec![10u8, 20, 30, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, vec![255u8, 255, 255, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn codec_args_carry_bitrate_and_codec() {
    let vp9 = codec_args(ContainerFormat::WebmVp9, 695_078).unwrap();
    assert!(vp9.windows(2).any(|w| w[0] == "-c:v" && w[1] == "libvpx-vp9"));
    assert!(vp9.windows(2).any(|w| w[0] == "-b:v" && w[1] == "695078"));
    assert!(vp9.iter().any(|a| a == "yuva420p"));

    let mp4 = codec_args(ContainerFormat::Mp4H264Baseline, 2_000_000).unwrap();
    assert!(mp4.windows(2).any(|w| w[0] == "-profile:v" && w[1] == "baseline"));
    assert!(mp4.iter().any(|a| a == "yuv420p"));

    assert!(codec_args(ContainerFormat::Gif, 1).is_err());
}

#[test]
fn encoder_names_cover_video_formats() {
    for f in ContainerFormat::VIDEO {
        assert!(encoder_name(f).is_some(), "{f}");
    }
    assert_eq!(encoder_name(ContainerFormat::Gif), None);
    assert!(ffmpeg_supports(ContainerFormat::Gif));
}

#[test]
fn sink_rejects_gif_and_odd_sizes() {
    assert!(FfmpegSink::new(FfmpegSinkOpts::new("target/x.gif", ContainerFormat::Gif)).is_err());

    let mut sink =
        FfmpegSink::new(FfmpegSinkOpts::new("target/odd.webm", ContainerFormat::WebmVp9)).unwrap();
    let err = sink
        .begin(SinkConfig {
            width: 11,
            height: 10,
            fps: 30,
            bitrate_bps: Some(1_000_000),
        })
        .unwrap_err();
    assert!(matches!(err, StickerError::Validation(_)));

    let err = sink
        .begin(SinkConfig {
            width: 10,
            height: 10,
            fps: 30,
            bitrate_bps: None,
        })
        .unwrap_err();
    assert!(matches!(err, StickerError::Validation(_)));
}

#[test]
fn stderr_drain_collects_more_than_a_pipe_buffer() {
    let noisy = vec![b'w'; 1 << 20];
    let handle = std::thread::spawn(move || drain(std::io::Cursor::new(noisy)));
    assert_eq!(join_drain(Some(handle)).unwrap().len(), 1 << 20);
    assert!(join_drain(None).unwrap().is_empty());
}
