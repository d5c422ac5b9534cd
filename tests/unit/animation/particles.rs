use super::*;

fn emitter(seed: u64) -> ParticleEmitter {
    ParticleEmitter::new(Canvas::STICKER, EmitterParams::default(), seed)
}

#[test]
fn inactive_emitter_does_nothing() {
    let mut e = emitter(1);
    e.advance_to(1000.0);
    assert!(e.particles().is_empty());
    assert!(!e.is_active());
}

#[test]
fn start_emits_a_burst_near_the_origin() {
    let mut e = emitter(7);
    e.start(0.0);
    let n = e.particles().len();
    assert!((8..13).contains(&n), "burst size {n}");
    for p in e.particles() {
        assert!((p.position.x - 512.0 * 0.32).abs() <= 512.0 * 0.01 + 1e-9);
        assert!((p.position.y - 512.0 * 0.90).abs() <= 512.0 * 0.01 + 1e-9);
        assert_eq!(p.alpha, 1.0);
        // Sprayed to the right, away from the character.
        assert!(p.velocity.x > 0.0);
    }
}

#[test]
fn live_particles_stay_capped_and_on_canvas() {
    let mut e = emitter(3);
    e.start(0.0);
    let mut now = 0.0;
    while now < 5000.0 {
        now += 16.7;
        e.advance_to(now);
        assert!(e.particles().len() <= 50);
        for p in e.particles() {
            assert!(p.alpha > 0.0 && p.alpha <= 1.0);
            assert!(p.position.x >= 0.0 && p.position.x <= 512.0);
            assert!(p.position.y <= 512.0);
        }
    }
}

#[test]
fn stepping_is_independent_of_call_cadence() {
    let mut coarse = emitter(11);
    let mut fine = emitter(11);
    coarse.start(0.0);
    fine.start(0.0);

    coarse.advance_to(900.0);
    let mut now = 0.0;
    while now < 900.0 {
        now = (now + 3.3_f64).min(900.0);
        fine.advance_to(now);
    }
    assert_eq!(coarse.particles(), fine.particles());
}

#[test]
fn stop_clears_particles() {
    let mut e = emitter(5);
    e.start(10.0);
    e.advance_to(400.0);
    e.stop();
    assert!(e.particles().is_empty());
    e.advance_to(800.0);
    assert!(e.particles().is_empty());
}

#[test]
fn same_seed_is_deterministic() {
    let mut a = emitter(42);
    let mut b = emitter(42);
    a.start(0.0);
    b.start(0.0);
    a.advance_to(1234.0);
    b.advance_to(1234.0);
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn emitter_params_reject_degenerate_values() {
    assert!(EmitterParams::default().validate().is_ok());
    for params in [
        EmitterParams {
            edge_fade_px: 0.0,
            ..EmitterParams::default()
        },
        EmitterParams {
            burst_interval_ms: -5.0,
            ..EmitterParams::default()
        },
        EmitterParams {
            burst_interval_ms: 0.0,
            ..EmitterParams::default()
        },
        EmitterParams {
            max_particles: 0,
            ..EmitterParams::default()
        },
    ] {
        assert!(params.validate().is_err(), "{params:?}");
    }
}
