//! One-shot particle bursts.
//!
//! A [`ParticleSystem`] spawns `count` particles around a centre point with a
//! normal spread, each with a random uniform acceleration, lifetime and
//! palette colour. The burst expires as a whole once the longest lifetime
//! has elapsed.
//!
//! # Example
//!
//! ```
//! use stepframe::entities::particles::ParticleSystem;
//! use stepframe::math::Vec2;
//!
//! let mut burst = ParticleSystem::new(Vec2::new(50.0, 50.0), 16, 7)
//!     .with_life_time(0.2, 0.5)
//!     .with_linear_acceleration(Vec2::new(-30.0, -30.0), Vec2::new(30.0, 30.0));
//! burst.generate();
//! assert_eq!(burst.particles().len(), 16);
//! assert!(burst.update(0.5));
//! assert!(burst.particles().is_empty());
//! ```

use std::f32::consts::TAU;

use crate::math::Vec2;
use crate::resources::canvas::{Canvas, Color};

const PARTICLE_RADIUS: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub life_time: f32,
    pub color: Color,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }
}

pub struct ParticleSystem {
    center: Vec2,
    count: usize,
    min_life_time: f32,
    max_life_time: f32,
    accel_min: Vec2,
    accel_max: Vec2,
    spread: Vec2,
    colors: Vec<Color>,
    timer: f32,
    particles: Vec<Particle>,
    rng: fastrand::Rng,
}

impl ParticleSystem {
    /// `seed` makes the burst reproducible.
    pub fn new(center: Vec2, count: usize, seed: u64) -> Self {
        ParticleSystem {
            center,
            count,
            min_life_time: 0.0,
            max_life_time: 0.0,
            accel_min: Vec2::ZERO,
            accel_max: Vec2::ZERO,
            spread: Vec2::ONE,
            colors: Vec::new(),
            timer: 0.0,
            particles: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn with_life_time(mut self, min: f32, max: f32) -> Self {
        self.min_life_time = min.min(max);
        self.max_life_time = max.max(min);
        self
    }

    pub fn with_linear_acceleration(mut self, min: Vec2, max: Vec2) -> Self {
        self.accel_min = min;
        self.accel_max = max;
        self
    }

    /// Standard deviation of spawn positions around the centre.
    pub fn with_area_spread(mut self, rx: f32, ry: f32) -> Self {
        self.spread = Vec2::new(rx, ry);
        self
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    fn uniform(&mut self, a: f32, b: f32) -> f32 {
        a + (b - a) * self.rng.f32()
    }

    /// Box-Muller sample from N(mean, sd).
    fn normal(&mut self, mean: f32, sd: f32) -> f32 {
        let u1 = self.rng.f32().max(f32::MIN_POSITIVE);
        let u2 = self.rng.f32();
        mean + sd * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Spawn the burst's particles.
    pub fn generate(&mut self) {
        for _ in 0..self.count {
            let acceleration = Vec2::new(
                self.uniform(self.accel_min.x, self.accel_max.x),
                self.uniform(self.accel_min.y, self.accel_max.y),
            );
            let position = Vec2::new(
                self.normal(self.center.x, self.spread.x),
                self.normal(self.center.y, self.spread.y),
            );
            let color = if self.colors.is_empty() {
                Color::WHITE
            } else {
                self.colors[self.rng.usize(..self.colors.len())]
            };
            let life_time = self.uniform(self.min_life_time, self.max_life_time);
            self.particles.push(Particle {
                position,
                velocity: Vec2::ZERO,
                acceleration,
                life_time,
                color,
            });
        }
    }

    /// Advance the burst. Returns `true` on the frame it expires.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.particles.is_empty() {
            return false;
        }
        self.timer += dt;
        if self.timer >= self.max_life_time {
            self.timer = 0.0;
            self.particles.clear();
            return true;
        }
        let timer = self.timer;
        for particle in self.particles.iter_mut().filter(|p| timer < p.life_time) {
            particle.update(dt);
        }
        false
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        for particle in self.particles.iter().filter(|p| self.timer < p.life_time) {
            canvas.draw_circle(particle.position, PARTICLE_RADIUS, particle.color);
        }
    }
}
