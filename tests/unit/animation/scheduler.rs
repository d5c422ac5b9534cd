use super::*;
use crate::animation::profile::Speed;

fn profile(frames: u32, frame_ms: f64, loops: u32) -> AnimationProfile {
    AnimationProfile::new(frames, frame_ms, loops).unwrap()
}

#[test]
fn first_tick_latches_clock_and_shows_frame_zero() {
    let p = profile(11, 18.0, 15);
    let mut clock = PlaybackClock::new();
    let t = current_frame(1234.5, &mut clock, &p);
    assert_eq!(clock.cycle_start_ms, Some(1234.5));
    assert_eq!(t.frame, FrameIndex(0));
    assert!(!t.did_restart);
    assert_eq!(t.elapsed_ms, 0.0);
    assert_eq!(t.window_ms, 2970.0);
}

#[test]
fn frame_advances_with_elapsed_time() {
    let p = profile(11, 18.0, 15);
    let mut clock = PlaybackClock::started_at(0.0);
    assert_eq!(current_frame(17.9, &mut clock, &p).frame, FrameIndex(0));
    assert_eq!(current_frame(18.0, &mut clock, &p).frame, FrameIndex(1));
    assert_eq!(current_frame(180.0, &mut clock, &p).frame, FrameIndex(10));
    // 198 ms completes the first cycle; the second cycle starts at frame 0.
    assert_eq!(current_frame(198.0, &mut clock, &p).frame, FrameIndex(0));
    assert_eq!(clock.cycle_start_ms, Some(0.0));
}

#[test]
fn window_elapsed_restarts_at_frame_zero() {
    let p = profile(11, 18.0, 15);
    let mut clock = PlaybackClock::started_at(1000.0);
    // elapsed 2975 >= 2970: restart rather than floor(2975/18) % 11 == 1.
    let t = current_frame(3975.0, &mut clock, &p);
    assert!(t.did_restart);
    assert_eq!(t.frame, FrameIndex(0));
    assert_eq!(t.elapsed_ms, 0.0);
    assert_eq!(clock.cycle_start_ms, Some(3975.0));

    let next = current_frame(3980.0, &mut clock, &p);
    assert!(!next.did_restart);
    assert_eq!(next.frame, FrameIndex(0));
}

#[test]
fn restart_happens_exactly_at_window_boundary() {
    let p = profile(5, 10.0, 2);
    let mut clock = PlaybackClock::started_at(0.0);
    let before = current_frame(99.99, &mut clock, &p);
    assert!(!before.did_restart);
    assert_eq!(before.frame, FrameIndex(4));
    let at = current_frame(100.0, &mut clock, &p);
    assert!(at.did_restart);
    assert_eq!(at.frame, FrameIndex(0));
}

#[test]
fn stale_clock_in_the_future_restarts() {
    let p = profile(11, 18.0, 15);
    let mut clock = PlaybackClock::started_at(5000.0);
    let t = current_frame(10.0, &mut clock, &p);
    assert!(t.did_restart);
    assert_eq!(t.frame, FrameIndex(0));
    assert_eq!(clock.cycle_start_ms, Some(10.0));
}

#[test]
fn frame_index_stays_in_range_for_irregular_ticks() {
    for speed in Speed::ALL {
        for frames in [5u32, 11] {
            let loops = speed.max_loops(frames, 3000.0).max(1);
            let p = AnimationProfile::with_speed(frames, speed, loops).unwrap();
            let mut clock = PlaybackClock::new();
            let mut now = 3.0;
            for i in 0..2000u32 {
                let t = current_frame(now, &mut clock, &p);
                assert!(t.frame.0 < frames);
                assert!(t.elapsed_ms >= 0.0 && t.elapsed_ms < t.window_ms);
                now += 1.0 + f64::from(i % 37) * 0.73;
            }
        }
    }
}

#[test]
fn frames_do_not_decrease_within_a_cycle() {
    let p = profile(11, 30.0, 1);
    let mut clock = PlaybackClock::started_at(0.0);
    let mut last = 0;
    let mut now = 0.0;
    while now < p.window_ms() {
        let t = current_frame(now, &mut clock, &p);
        assert!(!t.did_restart);
        assert!(t.frame.0 >= last);
        last = t.frame.0;
        now += 7.0;
    }
}

#[test]
fn tick_reports_cycle_and_progress() {
    let p = profile(11, 18.0, 15);
    let mut clock = PlaybackClock::started_at(0.0);
    let t = current_frame(1485.0, &mut clock, &p);
    assert_eq!(t.cycle(&p), 7);
    assert!((t.window_progress() - 0.5).abs() < 1e-12);
}

#[test]
fn secondary_phase_wraps_into_unit_interval() {
    assert_eq!(secondary_phase(100.0, 100.0, 2970.0).unwrap(), 0.0);
    let p = secondary_phase(100.0 + 1485.0, 100.0, 2970.0).unwrap();
    assert!((p - 0.5).abs() < 1e-12);
    let wrapped = secondary_phase(100.0 + 2970.0 + 297.0, 100.0, 2970.0).unwrap();
    assert!((wrapped - 0.1).abs() < 1e-9);
    let before_start = secondary_phase(0.0, 297.0, 2970.0).unwrap();
    assert!((before_start - 0.9).abs() < 1e-9);
}

#[test]
fn secondary_phase_rejects_bad_window() {
    assert!(secondary_phase(0.0, 0.0, 0.0).is_err());
    assert!(secondary_phase(0.0, 0.0, -1.0).is_err());
    assert!(secondary_phase(0.0, 0.0, f64::NAN).is_err());
}
