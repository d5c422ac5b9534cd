use super::*;
use crate::animation::profile::DEFAULT_FRAMES_PER_CYCLE;

fn normal(loops: u32) -> Playback {
    let p = AnimationProfile::with_speed(DEFAULT_FRAMES_PER_CYCLE, Speed::Normal, loops).unwrap();
    Playback::with_default_limit(p).unwrap()
}

#[test]
fn construction_clamps_loop_count() {
    let pb = normal(40);
    assert_eq!(pb.profile().loop_count(), 15);
    assert!(pb.profile().window_ms() <= 3000.0);
}

#[test]
fn loop_count_is_clamped_to_one_and_max() {
    let mut pb = normal(5);
    assert_eq!(pb.set_loop_count(0).unwrap(), 1);
    assert_eq!(pb.set_loop_count(99).unwrap(), 15);
    assert_eq!(pb.set_loop_count(7).unwrap(), 7);
}

#[test]
fn speed_change_clamps_loops_and_resets_clocks() {
    let mut pb = normal(15);
    pb.tick(100.0);
    pb.phase(100.0).unwrap();
    assert!(pb.clock().is_started());

    pb.set_speed(Speed::Smooth).unwrap();
    assert_eq!(pb.profile().loop_count(), 9);
    assert_eq!(pb.profile().frame_duration_ms(), 30.0);
    assert!(!pb.clock().is_started());

    // Faster speed raises the ceiling but keeps the user's loop count.
    pb.set_speed(Speed::Fast).unwrap();
    assert_eq!(pb.max_loops(), 24);
    assert_eq!(pb.profile().loop_count(), 9);
}

#[test]
fn effect_toggle_keeps_main_cycle_running() {
    let mut pb = normal(15);
    pb.tick(0.0);
    pb.phase(0.0).unwrap();
    let before = pb.tick(500.0);

    pb.effect_toggled();
    // Phase restarts from the toggle instant.
    assert_eq!(pb.phase(700.0).unwrap(), 0.0);

    let after = pb.tick(518.0);
    assert!(!after.did_restart);
    assert_eq!(after.frame.0, (before.frame.0 + 1) % DEFAULT_FRAMES_PER_CYCLE);
}

#[test]
fn background_change_restarts_window() {
    let mut pb = normal(15);
    pb.tick(0.0);
    pb.tick(1000.0);
    pb.background_changed();
    let t = pb.tick(1234.0);
    assert_eq!(t.elapsed_ms, 0.0);
    assert_eq!(t.frame.0, 0);
}

#[test]
fn restart_at_aligns_both_clocks() {
    let mut pb = normal(15);
    pb.restart_at(40.0);
    let t = pb.tick(40.0 + 1485.0);
    let phase = pb.phase(40.0 + 1485.0).unwrap();
    assert!((t.window_progress() - phase).abs() < 1e-12);
}

#[test]
fn cycle_longer_than_window_is_rejected() {
    let p = AnimationProfile::new(11, 400.0, 1).unwrap();
    assert!(Playback::with_default_limit(p).is_err());
    let mut pb = normal(3);
    assert!(pb.set_frame_duration_ms(400.0).is_err());
    assert_eq!(pb.profile().frame_duration_ms(), 18.0);
}
