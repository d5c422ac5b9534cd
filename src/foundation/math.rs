pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Straight-alpha source-over of `src` onto `dst`, with `src` alpha further scaled by `opacity`.
pub(crate) fn blend_over(dst: &mut [u8; 4], src: [u8; 4], opacity: f32) {
    let sa = (f32::from(src[3]) / 255.0) * opacity.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = [0, 0, 0, 0];
        return;
    }

    for c in 0..3 {
        let sc = f32::from(src[c]);
        let dc = f32::from(dst[c]);
        let v = (sc * sa + dc * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
