//! Particle field
//!
//! Short-lived kinematic points for bursts and sparks. Velocities are in
//! pixels per 1/60 s so the look is the same at any host refresh rate.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{BASELINE_FPS, MAX_PARTICLES};
use crate::renderer::Surface;
use crate::{Color, Rect};

/// Emission parameters for one burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Particles spawned by one `emit`
    pub count: usize,
    /// Mean speed; actual speed is uniform in [0.5, 1.5] times this
    pub speed: f32,
    pub color: Color,
    /// Square edge length in pixels
    pub size: f32,
    /// Seconds until the particle disappears
    pub lifetime: f32,
    /// Added to vertical velocity every baseline frame
    pub gravity: f32,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            count: 10,
            speed: 3.0,
            color: Color::WHITE,
            size: 4.0,
            lifetime: 1.0,
            gravity: 0.0,
        }
    }
}

/// A single particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    /// Remaining life in seconds
    pub life: f32,
    /// Initial life, for the alpha fade
    pub max_life: f32,
    pub gravity: f32,
}

impl Particle {
    /// Opacity from remaining life (1 at spawn, 0 at death)
    #[inline]
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Pool of live particles
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    max_particles: usize,
    rng: Pcg32,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ParticleField {
    pub fn new(seed: u64) -> Self {
        Self::with_capacity(seed, MAX_PARTICLES)
    }

    /// Field holding at most `max_particles` live particles
    pub fn with_capacity(seed: u64, max_particles: usize) -> Self {
        let max_particles = max_particles.min(MAX_PARTICLES);
        Self {
            particles: Vec::with_capacity(max_particles.min(256)),
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn set_max_particles(&mut self, max_particles: usize) {
        self.max_particles = max_particles.min(MAX_PARTICLES);
        self.particles.truncate(self.max_particles);
    }

    /// Spawn a burst at (x, y) in random directions
    ///
    /// Returns how many particles were actually spawned (the cap may truncate).
    pub fn emit(&mut self, x: f32, y: f32, config: &EmitConfig) -> usize {
        let room = self.max_particles.saturating_sub(self.particles.len());
        let count = config.count.min(room);
        if count < config.count {
            log::warn!(
                "Particle cap {} reached, dropping {} of {}",
                self.max_particles,
                config.count - count,
                config.count
            );
        }

        for _ in 0..count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = config.speed * self.rng.random_range(0.5..=1.5);
            self.particles.push(Particle {
                pos: Vec2::new(x, y),
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color: config.color,
                size: config.size,
                life: config.lifetime,
                max_life: config.lifetime,
                gravity: config.gravity,
            });
        }
        count
    }

    /// Integrate all particles and drop the ones whose life ran out
    pub fn update(&mut self, dt: f32) {
        let scale = dt * BASELINE_FPS;
        // Back to front so swap_remove never skips a neighbor
        let mut i = self.particles.len();
        while i > 0 {
            i -= 1;
            let p = &mut self.particles[i];
            p.pos += p.vel * scale;
            p.vel.y += p.gravity * scale;
            p.life -= dt;
            if p.life <= 0.0 {
                self.particles.swap_remove(i);
            }
        }
    }

    /// Draw each particle as a square centered on its position
    ///
    /// The surface's global alpha is restored afterwards.
    pub fn draw(&self, surface: &mut dyn Surface) {
        if self.particles.is_empty() {
            return;
        }
        let saved = surface.global_alpha();
        for p in &self.particles {
            surface.set_global_alpha(saved * p.alpha());
            let half = p.size / 2.0;
            surface.fill_rect(
                Rect::new(p.pos.x - half, p.pos.y - half, p.size, p.size),
                p.color,
            );
        }
        surface.set_global_alpha(saved);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandBuffer, DrawCommand};

    fn burst(lifetime: f32) -> EmitConfig {
        EmitConfig {
            lifetime,
            ..Default::default()
        }
    }

    #[test]
    fn test_emit_default_count() {
        let mut field = ParticleField::new(1);
        assert_eq!(field.emit(10.0, 10.0, &EmitConfig::default()), 10);
        assert_eq!(field.len(), 10);
    }

    #[test]
    fn test_speed_within_range() {
        let mut field = ParticleField::new(7);
        let config = EmitConfig {
            count: 200,
            speed: 4.0,
            ..Default::default()
        };
        field.emit(0.0, 0.0, &config);
        for p in field.particles() {
            let s = p.vel.length();
            assert!((2.0 - 1e-4..=6.0 + 1e-4).contains(&s), "speed {}", s);
        }
    }

    #[test]
    fn test_single_update_removes_expired() {
        let mut field = ParticleField::new(3);
        field.emit(0.0, 0.0, &burst(0.5));
        field.update(0.5);
        assert_eq!(field.len(), 0);
    }

    #[test]
    fn test_mixed_lifetimes_removed_individually() {
        let mut field = ParticleField::new(3);
        field.emit(0.0, 0.0, &burst(0.1));
        field.emit(0.0, 0.0, &burst(1.0));
        field.emit(0.0, 0.0, &burst(0.1));
        field.update(0.2);
        assert_eq!(field.len(), 10);
        assert!(field.particles().iter().all(|p| p.max_life == 1.0));
    }

    #[test]
    fn test_velocity_scaled_to_baseline() {
        let mut field = ParticleField::new(5);
        field.emit(0.0, 0.0, &EmitConfig { count: 1, ..Default::default() });
        let v = field.particles()[0].vel;
        field.update(1.0 / 60.0);
        let p = field.particles()[0].pos;
        assert!((p - v).length() < 1e-4);
    }

    #[test]
    fn test_gravity_accelerates_down() {
        let mut field = ParticleField::new(5);
        field.emit(
            0.0,
            0.0,
            &EmitConfig {
                count: 1,
                gravity: 0.5,
                ..Default::default()
            },
        );
        let vy = field.particles()[0].vel.y;
        field.update(1.0 / 30.0);
        assert!((field.particles()[0].vel.y - (vy + 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_cap_truncates_emit() {
        let mut field = ParticleField::with_capacity(1, 15);
        assert_eq!(field.emit(0.0, 0.0, &EmitConfig::default()), 10);
        assert_eq!(field.emit(0.0, 0.0, &EmitConfig::default()), 5);
        assert_eq!(field.len(), 15);
    }

    #[test]
    fn test_lowering_cap_truncates_live_particles() {
        let mut field = ParticleField::with_capacity(1, 50);
        field.emit(0.0, 0.0, &EmitConfig { count: 30, ..Default::default() });
        field.set_max_particles(12);
        assert_eq!(field.len(), 12);
        assert_eq!(field.emit(0.0, 0.0, &EmitConfig::default()), 0);

        field.set_max_particles(usize::MAX);
        field.emit(0.0, 0.0, &EmitConfig { count: MAX_PARTICLES, ..Default::default() });
        assert_eq!(field.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_draw_fades_and_restores_alpha() {
        let mut field = ParticleField::new(9);
        field.emit(50.0, 50.0, &EmitConfig { count: 1, lifetime: 1.0, ..Default::default() });
        field.update(0.5);
        let mut buf = CommandBuffer::new(100.0, 100.0);
        buf.set_global_alpha(0.8);
        field.draw(&mut buf);
        assert_eq!(buf.global_alpha(), 0.8);
        match &buf.commands()[0] {
            DrawCommand::FillRect { rect, color } => {
                assert_eq!(rect.w, 4.0);
                assert!((color.a - 0.4).abs() < 1e-3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_dead_particles_not_drawn() {
        let mut field = ParticleField::new(2);
        field.emit(0.0, 0.0, &burst(0.2));
        for _ in 0..20 {
            field.update(1.0 / 60.0);
        }
        let mut buf = CommandBuffer::new(100.0, 100.0);
        field.draw(&mut buf);
        assert!(buf.commands().is_empty());
        assert!(field.is_empty());
    }
}
