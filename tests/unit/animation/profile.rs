use super::*;

#[test]
fn loop_caps_floor_against_three_seconds() {
    assert_eq!(max_loops_for_duration(18.0, 11, 3000.0), 15);
    assert_eq!(max_loops_for_duration(11.0, 11, 3000.0), 24);
    assert_eq!(max_loops_for_duration(30.0, 11, 3000.0), 9);
}

#[test]
fn loop_cap_never_overshoots() {
    for speed in Speed::ALL {
        for frames in [5, 11] {
            let loops = speed.max_loops(frames, DEFAULT_MAX_WINDOW_MS);
            let total = speed.frame_duration_ms() * f64::from(frames) * f64::from(loops);
            assert!(total <= DEFAULT_MAX_WINDOW_MS, "{speed:?} x {frames}");
            let one_more = speed.frame_duration_ms() * f64::from(frames) * f64::from(loops + 1);
            assert!(one_more > DEFAULT_MAX_WINDOW_MS);
        }
    }
}

#[test]
fn loop_cap_handles_degenerate_inputs() {
    assert_eq!(max_loops_for_duration(18.0, 11, 100.0), 0);
    assert_eq!(max_loops_for_duration(0.0, 11, 3000.0), 0);
    assert_eq!(max_loops_for_duration(18.0, 0, 3000.0), 0);
    assert_eq!(max_loops_for_duration(18.0, 11, -5.0), 0);
}

#[test]
fn profile_rejects_invalid_fields() {
    assert!(AnimationProfile::new(0, 18.0, 1).is_err());
    assert!(AnimationProfile::new(11, 0.0, 1).is_err());
    assert!(AnimationProfile::new(11, f64::NAN, 1).is_err());
    assert!(AnimationProfile::new(11, 18.0, 0).is_err());
}

#[test]
fn window_is_product_of_fields() {
    let p = AnimationProfile::with_speed(11, Speed::Normal, 15).unwrap();
    assert_eq!(p.cycle_ms(), 198.0);
    assert_eq!(p.window_ms(), 2970.0);
    assert_eq!(p.total_frames(), 165);
    assert!((p.duration_secs() - 2.97).abs() < 1e-12);
}

#[test]
fn speed_serializes_snake_case() {
    let s = serde_json::to_string(&Speed::Smooth).unwrap();
    assert_eq!(s, "\"smooth\"");
    let back: Speed = serde_json::from_str("\"fast\"").unwrap();
    assert_eq!(back, Speed::Fast);
}
