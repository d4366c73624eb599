//! 2D camera: world-to-screen offset with clamped bounds, follow and shake
//!
//! The base position is always inside `[0, world - screen]` on both axes.
//! Shake is layered on top in `offset()` and is never clamped.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Rect;
use crate::consts::{SHAKE_MAX_INTENSITY, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Shared, live handle to an entity's bounds the camera can follow
///
/// The game keeps one clone and writes the entity's rectangle into it each
/// tick; the camera reads the current value on every `update`.
pub type FollowTarget = Rc<Cell<Rect>>;

/// Make a follow handle initialized to `rect`
pub fn follow_target(rect: Rect) -> FollowTarget {
    Rc::new(Cell::new(rect))
}

#[derive(Debug, Clone)]
pub struct Camera {
    pos: Vec2,
    screen: Vec2,
    world: Vec2,
    target: Option<FollowTarget>,
    follow_speed: f32,
    shake_intensity: f32,
    shake_remaining: f32,
    shake_offset: Vec2,
    rng: Pcg32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl Camera {
    pub fn new(screen_w: f32, screen_h: f32, world_w: f32, world_h: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            screen: Vec2::new(screen_w, screen_h),
            world: Vec2::new(world_w, world_h),
            target: None,
            follow_speed: 1.0,
            shake_intensity: 0.0,
            shake_remaining: 0.0,
            shake_offset: Vec2::ZERO,
            rng: Pcg32::seed_from_u64(0),
        }
    }

    /// Reseed the shake RNG (for reproducible runs)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Pcg32::seed_from_u64(seed);
        self
    }

    /// Largest allowed top-left position
    #[inline]
    fn max_pos(&self) -> Vec2 {
        (self.world - self.screen).max(Vec2::ZERO)
    }

    #[inline]
    fn clamp(&mut self) {
        self.pos = self.pos.clamp(Vec2::ZERO, self.max_pos());
    }

    /// Clamped base position (no shake)
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen
    }

    pub fn world_size(&self) -> Vec2 {
        self.world
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.clamp();
    }

    pub fn set_world_size(&mut self, width: f32, height: f32) {
        self.world = Vec2::new(width, height);
        self.clamp();
    }

    /// Place the view so that `point` is at its center (clamped)
    pub fn center_on(&mut self, point: Vec2) {
        self.pos = point - self.screen / 2.0;
        self.clamp();
    }

    /// Track a live target; `speed >= 1.0` snaps, lower values ease in
    pub fn follow(&mut self, target: FollowTarget, speed: f32) {
        self.target = Some(target);
        self.follow_speed = speed.max(0.0);
    }

    pub fn unfollow(&mut self) {
        self.target = None;
    }

    pub fn is_following(&self) -> bool {
        self.target.is_some()
    }

    /// Start (or restart) a camera shake
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        self.shake_intensity = intensity.clamp(0.0, SHAKE_MAX_INTENSITY);
        self.shake_remaining = duration.max(0.0);
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_remaining > 0.0
    }

    pub fn update(&mut self, dt: f32) {
        if let Some(target) = &self.target {
            let desired = target.get().center() - self.screen / 2.0;
            if self.follow_speed >= 1.0 {
                self.pos = desired;
            } else {
                self.pos += (desired - self.pos) * self.follow_speed;
            }
        }
        self.clamp();

        if self.shake_remaining > 0.0 {
            self.shake_remaining -= dt;
            let i = self.shake_intensity;
            self.shake_offset = if self.shake_remaining > 0.0 && i > 0.0 {
                Vec2::new(
                    self.rng.random_range(-i..=i),
                    self.rng.random_range(-i..=i),
                )
            } else {
                Vec2::ZERO
            };
        } else {
            self.shake_offset = Vec2::ZERO;
        }
    }

    /// Draw offset: clamped base position plus shake
    pub fn offset(&self) -> Vec2 {
        self.pos + self.shake_offset
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset()
    }

    /// The world-space rectangle currently on screen
    pub fn view_rect(&self) -> Rect {
        let o = self.offset();
        Rect::new(o.x, o.y, self.screen.x, self.screen.y)
    }

    /// Separating-axis test of a world rectangle against the view
    pub fn is_visible(&self, rect: &Rect) -> bool {
        let o = self.offset();
        rect.x + rect.w > o.x
            && rect.x < o.x + self.screen.x
            && rect.y + rect.h > o.y
            && rect.y < o.y + self.screen.y
    }
}
