use std::io::Cursor;

use image::{
    Delay, Frame, Rgba,
    codecs::gif::{GifEncoder, Repeat},
};

use super::*;

fn gif_bytes(n: u8) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut enc = GifEncoder::new(&mut out);
        enc.set_repeat(Repeat::Infinite).unwrap();
        for i in 0..n {
            let img = RgbaImage::from_pixel(6, 4, Rgba([i * 20, 0, 0, 255]));
            enc.encode_frame(Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(50, 1)))
                .unwrap();
        }
    }
    out
}

#[test]
fn decodes_exactly_frames_per_cycle() {
    let src = GifFrameSource::from_reader(Cursor::new(gif_bytes(12)), 11).unwrap();
    assert_eq!(src.frame_count(), 11);
    assert_eq!(src.dimensions(), (6, 4));
    assert!(src.frame(FrameIndex(10)).is_ok());
}

#[test]
fn too_few_frames_is_a_validation_error() {
    let err = GifFrameSource::from_reader(Cursor::new(gif_bytes(3)), 11).unwrap_err();
    assert!(matches!(err, StickerError::Validation(_)));
}

#[test]
fn out_of_range_index_is_a_precondition_error() {
    let frames = vec![RgbaImage::new(2, 2); 4];
    let src = GifFrameSource::from_frames(frames, 4).unwrap();
    let err = src.frame(FrameIndex(4)).unwrap_err();
    assert!(matches!(err, StickerError::Precondition(_)));
}

#[test]
fn mixed_frame_sizes_are_rejected() {
    let frames = vec![RgbaImage::new(2, 2), RgbaImage::new(3, 2)];
    assert!(GifFrameSource::from_frames(frames, 2).is_err());
}
