//! Screen effects: shake jitter, full-surface flash, fading trails

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{SHAKE_MAX_INTENSITY, SHAKE_MIN_INTENSITY};
use crate::renderer::Surface;
use crate::{Color, Rect};

/// A fading point left behind by a moving object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub color: Color,
    pub size: f32,
    pub life: f32,
    pub max_life: f32,
}

impl TrailPoint {
    #[inline]
    fn fade(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shake {
    intensity: f32,
    remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flash {
    color: Color,
    duration: f32,
    remaining: f32,
}

/// Camera-independent screen effects
#[derive(Debug, Clone)]
pub struct ScreenEffects {
    shake: Option<Shake>,
    flash: Option<Flash>,
    offset: Vec2,
    trails: Vec<TrailPoint>,
    rng: Pcg32,
}

impl Default for ScreenEffects {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ScreenEffects {
    pub fn new(seed: u64) -> Self {
        Self {
            shake: None,
            flash: None,
            offset: Vec2::ZERO,
            trails: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start (or restart) a shake; intensity is clamped to 1..20 pixels
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        self.shake = Some(Shake {
            intensity: intensity.clamp(SHAKE_MIN_INTENSITY, SHAKE_MAX_INTENSITY),
            remaining: duration.max(0.0),
        });
    }

    /// Start (or restart) a full-surface flash
    pub fn flash(&mut self, color: Color, duration: f32) {
        self.flash = Some(Flash {
            color,
            duration: duration.max(0.0),
            remaining: duration.max(0.0),
        });
    }

    /// Append a fading trail point
    pub fn add_trail(&mut self, x: f32, y: f32, color: Color, size: f32, life: f32) {
        self.trails.push(TrailPoint {
            pos: Vec2::new(x, y),
            color,
            size,
            life,
            max_life: life,
        });
    }

    pub fn update(&mut self, dt: f32) {
        // Fresh random offset every tick while active
        self.offset = Vec2::ZERO;
        if let Some(shake) = self.shake.as_mut() {
            shake.remaining -= dt;
            if shake.remaining > 0.0 {
                let i = shake.intensity;
                self.offset = Vec2::new(
                    self.rng.random_range(-i..=i),
                    self.rng.random_range(-i..=i),
                );
            } else {
                self.shake = None;
            }
        }

        if let Some(flash) = self.flash.as_mut() {
            flash.remaining -= dt;
            if flash.remaining <= 0.0 {
                self.flash = None;
            }
        }

        self.trails.retain_mut(|t| {
            t.life -= dt;
            t.life > 0.0
        });
    }

    /// Current shake jitter (zero when no shake is active)
    pub fn shake_offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    pub fn trails(&self) -> &[TrailPoint] {
        &self.trails
    }

    /// Draw trail points, shrinking and fading with remaining life
    pub fn draw_trails(&self, surface: &mut dyn Surface) {
        let saved = surface.global_alpha();
        for t in &self.trails {
            let fade = t.fade();
            let size = t.size * fade;
            surface.set_global_alpha(saved * fade);
            surface.fill_rect(
                Rect::new(t.pos.x - size / 2.0, t.pos.y - size / 2.0, size, size),
                t.color,
            );
        }
        surface.set_global_alpha(saved);
    }

    /// Cover the whole surface with the flash color
    ///
    /// Call after any camera translation has been reset; flash is screen space.
    pub fn draw_flash(&self, surface: &mut dyn Surface) {
        let Some(flash) = self.flash else { return };
        let alpha = if flash.duration > 0.0 {
            (flash.remaining / flash.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let size = surface.size();
        surface.fill_rect(
            Rect::new(0.0, 0.0, size.x, size.y),
            flash.color.with_alpha(flash.color.a * alpha),
        );
    }

    /// Drop every active effect
    pub fn reset(&mut self) {
        self.shake = None;
        self.flash = None;
        self.offset = Vec2::ZERO;
        self.trails.clear();
    }
}
