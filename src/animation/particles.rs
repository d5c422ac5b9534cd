//! Spray particle burst drawn between the background and the character.
//!
//! Each particle is integrated with a fixed 60 Hz Euler step. The emitter is driven by wall-clock
//! time through [`ParticleEmitter::advance_to`], which runs however many whole steps fit, so the
//! effect looks the same for a 144 Hz preview and a 30 fps capture.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use kurbo::{Point, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::core::{Canvas, ensure_positive_ms};
use crate::foundation::error::{StickerError, StickerResult};

const TICK_MS: f64 = 1000.0 / 60.0;
/// Longest stretch of simulated time replayed in one `advance_to` call.
const MAX_CATCH_UP_MS: f64 = 2000.0;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EmitterParams {
    pub max_particles: usize,
    pub particles_per_burst: usize,
    /// Extra particles per burst, drawn from `0..burst_jitter`.
    pub burst_jitter: usize,
    pub burst_interval_ms: f64,
    pub burst_spread: f64,
    /// Emission point as a fraction of the canvas size.
    pub origin: (f64, f64),
    pub edge_fade_px: f64,
}

impl Default for EmitterParams {
    fn default() -> Self {
        Self {
            max_particles: 50,
            particles_per_burst: 8,
            burst_jitter: 5,
            burst_interval_ms: 250.0,
            burst_spread: 0.35,
            origin: (0.32, 0.90),
            edge_fade_px: 40.0,
        }
    }
}

impl EmitterParams {
    pub fn validate(&self) -> StickerResult<()> {
        if self.max_particles == 0 {
            return Err(StickerError::validation("emitter max_particles must be > 0"));
        }
        ensure_positive_ms("emitter burst_interval_ms", self.burst_interval_ms)?;
        if !self.edge_fade_px.is_finite() || self.edge_fade_px <= 0.0 {
            return Err(StickerError::validation(
                "emitter edge_fade_px must be finite and > 0",
            ));
        }
        let (ox, oy) = self.origin;
        if !(ox.is_finite() && oy.is_finite() && self.burst_spread.is_finite()) {
            return Err(StickerError::validation(
                "emitter origin and burst_spread must be finite",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Wobble {
    speed: f64,
    amplitude: f64,
    offset: f64,
}

impl Wobble {
    fn at(&self, lifetime: u32) -> f64 {
        (f64::from(lifetime) * self.speed + self.offset).sin() * self.amplitude
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Vec2,
    pub rotation: f64,
    /// Sprite scale relative to the drop texture.
    pub scale: f64,
    pub alpha: f64,
    curve: f64,
    spin: f64,
    gravity: f64,
    wobble: Wobble,
    rotation_wobble: Wobble,
    lifetime: u32,
    max_life: f64,
}

impl Particle {
    /// One Euler step. Returns `false` once the particle is dead.
    fn step(&mut self, rng: &mut StdRng, canvas: Canvas, edge_fade_px: f64) -> bool {
        self.lifetime += 1;

        self.velocity.x += self.curve;
        self.velocity.x += self.wobble.at(self.lifetime) * 0.15;
        self.rotation += self.spin + self.rotation_wobble.at(self.lifetime);

        self.velocity.y += self.gravity + (rng.random::<f64>() - 0.5) * 0.1;
        self.position.x += self.velocity.x + (rng.random::<f64>() - 0.5) * 0.3;
        self.position.y += self.velocity.y;

        let (w, h) = (canvas.width_f64(), canvas.height_f64());
        let (x, y) = (self.position.x, self.position.y);
        let edge_fade = ((h - y) / edge_fade_px)
            .min(y / edge_fade_px)
            .min((w - x) / edge_fade_px)
            .min(x / edge_fade_px);
        let life_fade = 1.0 - f64::from(self.lifetime) / self.max_life;
        self.alpha = edge_fade.max(life_fade).clamp(0.0, 1.0);

        !(self.alpha <= 0.0 || y > h || x < 0.0 || x > w)
    }
}

/// Seeded burst emitter. Same seed and same timestamps give the same particles.
#[derive(Clone, Debug)]
pub struct ParticleEmitter {
    params: EmitterParams,
    canvas: Canvas,
    rng: StdRng,
    particles: Vec<Particle>,
    active: bool,
    sim_ms: f64,
    last_emit_ms: f64,
    next_burst_after_ms: f64,
}

impl ParticleEmitter {
    pub fn new(canvas: Canvas, params: EmitterParams, seed: u64) -> Self {
        Self {
            params,
            canvas,
            rng: StdRng::seed_from_u64(seed),
            particles: Vec::with_capacity(params.max_particles),
            active: false,
            sim_ms: 0.0,
            last_emit_ms: 0.0,
            next_burst_after_ms: params.burst_interval_ms,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn start(&mut self, now_ms: f64) {
        self.active = true;
        self.sim_ms = now_ms;
        self.last_emit_ms = now_ms;
        self.roll_next_burst();
        self.burst();
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.particles.clear();
    }

    /// Run every whole 60 Hz step between the last simulated instant and `now_ms`.
    pub fn advance_to(&mut self, now_ms: f64) {
        if !self.active {
            return;
        }
        if now_ms < self.sim_ms {
            self.sim_ms = now_ms;
            return;
        }
        if now_ms - self.sim_ms > MAX_CATCH_UP_MS {
            self.sim_ms = now_ms - MAX_CATCH_UP_MS;
        }
        while self.sim_ms + TICK_MS <= now_ms {
            self.sim_ms += TICK_MS;
            self.step(self.sim_ms);
        }
    }

    fn step(&mut self, t_ms: f64) {
        if t_ms - self.last_emit_ms >= self.next_burst_after_ms {
            self.burst();
            self.last_emit_ms = t_ms;
            self.roll_next_burst();
        }

        let canvas = self.canvas;
        let edge = self.params.edge_fade_px;
        let rng = &mut self.rng;
        self.particles.retain_mut(|p| p.step(rng, canvas, edge));
    }

    fn roll_next_burst(&mut self) {
        self.next_burst_after_ms =
            self.params.burst_interval_ms * (0.8 + self.rng.random::<f64>() * 0.4);
    }

    fn burst(&mut self) {
        let jitter = if self.params.burst_jitter > 0 {
            self.rng.random_range(0..self.params.burst_jitter)
        } else {
            0
        };
        let size = self.params.particles_per_burst + jitter;
        for i in 0..size {
            let spread_factor = (i as f64 / size as f64) * PI * 0.4;
            let angle_offset = spread_factor.sin() * self.params.burst_spread;
            if !self.spawn(angle_offset) {
                break;
            }
        }
        tracing::trace!(live = self.particles.len(), "particle burst");
    }

    fn spawn(&mut self, angle_offset: f64) -> bool {
        if self.particles.len() >= self.params.max_particles {
            return false;
        }
        let rng = &mut self.rng;
        let mut r = || rng.random::<f64>();

        let (w, h) = (self.canvas.width_f64(), self.canvas.height_f64());
        let (ox, oy) = self.params.origin;
        let position = Point::new(w * (ox + (r() - 0.5) * 0.02), h * (oy + (r() - 0.5) * 0.02));

        let base_angle = -FRAC_PI_4 + (r() - 0.5) * 0.8;
        let random_spread = (r() - 0.5) * self.params.burst_spread * 1.5;
        let burst_power = 1.4 + r() * 1.2;
        let angle = base_angle + random_spread + angle_offset;
        let speed = (8.0 + r() * 8.0) * burst_power;
        let curve = (r() - 0.5) * 0.4;

        let scale = 0.12 + r() * 0.15;
        let rotation = r() * TAU;
        let spin = r() - 0.5;
        let rotation_wobble = Wobble {
            speed: 0.15 + r() * 0.3,
            amplitude: 0.4 + r() * 0.6,
            offset: r() * TAU,
        };
        let wobble = Wobble {
            speed: 0.1 + r() * 0.2,
            amplitude: 0.2 + r() * 0.4,
            offset: r() * TAU,
        };
        let gravity = 0.2 + r() * 0.4;
        let max_life = 25.0 + r() * 15.0;

        self.particles.push(Particle {
            position,
            velocity: Vec2::new(angle.cos() * speed, angle.sin() * speed),
            rotation,
            scale,
            alpha: 1.0,
            curve,
            spin,
            gravity,
            wobble,
            rotation_wobble,
            lifetime: 0,
            max_life,
        });
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/particles.rs"]
mod tests;
