use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 128), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}

#[test]
fn opaque_source_replaces_destination() {
    let mut dst = [10, 20, 30, 255];
    blend_over(&mut dst, [200, 100, 50, 255], 1.0);
    assert_eq!(dst, [200, 100, 50, 255]);
}

#[test]
fn transparent_source_is_noop() {
    let mut dst = [10, 20, 30, 255];
    blend_over(&mut dst, [200, 100, 50, 0], 1.0);
    assert_eq!(dst, [10, 20, 30, 255]);
    blend_over(&mut dst, [200, 100, 50, 255], 0.0);
    assert_eq!(dst, [10, 20, 30, 255]);
}

#[test]
fn half_opacity_over_opaque_black() {
    let mut dst = [0, 0, 0, 255];
    blend_over(&mut dst, [255, 0, 0, 255], 0.5);
    assert_eq!(dst[3], 255);
    assert!((127..=128).contains(&dst[0]));
}

#[test]
fn over_transparent_keeps_source_color() {
    let mut dst = [0, 0, 0, 0];
    blend_over(&mut dst, [40, 80, 120, 128], 1.0);
    assert_eq!(&dst[..3], &[40, 80, 120]);
    assert_eq!(dst[3], 128);
}
