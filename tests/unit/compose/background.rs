use image::Rgba;
use kurbo::Point;

use super::*;

fn solid(v: u8) -> RgbaImage {
    RgbaImage::from_pixel(2, 2, Rgba([v, v, v, 255]))
}

#[test]
fn cover_transform_centres_and_scales() {
    let canvas = Canvas::new(512, 512).unwrap();
    let a = BackgroundTransform::default().to_affine(canvas, (256, 128));
    // Cover scale is max(2, 4) = 4; the image centre lands on the canvas centre.
    let c = a * Point::new(128.0, 64.0);
    assert!((c.x - 256.0).abs() < 1e-9 && (c.y - 256.0).abs() < 1e-9);
    let corner = a * Point::new(0.0, 0.0);
    assert!((corner.x - (256.0 - 512.0)).abs() < 1e-9);
    assert!((corner.y - 0.0).abs() < 1e-9);
}

#[test]
fn mirror_and_offset() {
    let canvas = Canvas::new(100, 100).unwrap();
    let t = BackgroundTransform {
        mirror_x: true,
        offset_x: 25.0,
        ..BackgroundTransform::default()
    };
    let a = t.to_affine(canvas, (100, 100));
    let left = a * Point::new(0.0, 50.0);
    // Centre sits at x = 100; mirrored, the image's left edge lands half an image right of it.
    assert!((left.x - 150.0).abs() < 1e-9);
}

#[test]
fn transform_validation() {
    assert!(BackgroundTransform::default().validate().is_ok());
    assert!(
        BackgroundTransform {
            zoom: 0.0,
            ..Default::default()
        }
        .validate()
        .is_err()
    );
    assert!(
        BackgroundTransform {
            offset_y: 51.0,
            ..Default::default()
        }
        .validate()
        .is_err()
    );
}

#[test]
fn animated_background_seeks_from_start_offset_and_loops() {
    let anim = AnimatedBackground::new(
        vec![(solid(0), 100.0), (solid(1), 100.0), (solid(2), 100.0)],
        150.0,
    )
    .unwrap();
    assert_eq!(anim.duration_ms(), 300.0);
    assert_eq!(anim.frame_at(0.0).get_pixel(0, 0)[0], 1);
    assert_eq!(anim.frame_at(60.0).get_pixel(0, 0)[0], 2);
    assert_eq!(anim.frame_at(160.0).get_pixel(0, 0)[0], 0);
}

#[test]
fn zero_delays_fall_back_to_default() {
    let anim = AnimatedBackground::new(vec![(solid(0), 0.0), (solid(1), 0.0)], 0.0).unwrap();
    assert_eq!(anim.duration_ms(), 200.0);
    assert!(AnimatedBackground::new(Vec::new(), 0.0).is_err());
}

#[test]
fn still_background_ignores_time() {
    let bg = Background::Still(solid(7));
    assert_eq!(bg.image_at(12345.0).get_pixel(0, 0)[0], 7);
}
