use super::*;

#[test]
fn canvas_rejects_zero_dims() {
    assert!(Canvas::new(0, 512).is_err());
    assert!(Canvas::new(512, 0).is_err());
    assert_eq!(Canvas::new(512, 512).unwrap(), Canvas::STICKER);
}

#[test]
fn default_canvas_is_sticker_sized() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (512, 512));
}

#[test]
fn positive_ms_guard() {
    assert!(ensure_positive_ms("x", 18.0).is_ok());
    assert!(ensure_positive_ms("x", 0.0).is_err());
    assert!(ensure_positive_ms("x", -1.0).is_err());
    assert!(ensure_positive_ms("x", f64::NAN).is_err());
    assert!(ensure_positive_ms("x", f64::INFINITY).is_err());
}
