//! Arcade Runtime - fixed-cadence engine for small portrait arcade games
//!
//! Core modules:
//! - `sim`: Pure per-tick subsystems (collision, particles, effects, tiles, camera, stages, phases)
//! - `input`: Keyboard/touch sampling into logical buttons
//! - `resources`: Asynchronous image/sound loading
//! - `runtime`: The tick driver and the `Game` hook contract
//! - `renderer`: Drawing surface abstraction

pub mod error;
pub mod input;
pub mod renderer;
pub mod resources;
pub mod runtime;
pub mod settings;
pub mod sim;

pub use error::RuntimeError;
pub use input::{Button, InputState};
pub use renderer::{CommandBuffer, Surface};
pub use resources::{Resource, ResourceTable};
pub use runtime::{Engine, Game, Runtime};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Runtime configuration constants
pub mod consts {
    /// Logical drawing surface (game area)
    pub const SCREEN_WIDTH: f32 = 360.0;
    pub const SCREEN_HEIGHT: f32 = 540.0;
    /// Input bar below the game area
    pub const INPUT_BAR_HEIGHT: f32 = 100.0;
    /// Full host surface height (game area + input bar)
    pub const HOST_HEIGHT: f32 = SCREEN_HEIGHT + INPUT_BAR_HEIGHT;

    /// Target frame rate of the tick driver
    pub const TARGET_FPS: f32 = 60.0;
    /// Fixed frame interval in seconds
    pub const FRAME_INTERVAL: f32 = 1.0 / TARGET_FPS;
    /// Largest host delta accepted per tick (seconds); longer stalls are clipped
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Particle/trail velocities are expressed per 1/60 s
    pub const BASELINE_FPS: f32 = 60.0;

    /// Debounce before GAME_OVER/GAME_CLEAR accept a restart press
    pub const RESTART_DELAY_MS: f64 = 3000.0;

    /// Joystick drag below this distance is ignored (pixels)
    pub const JOYSTICK_DEADZONE: f32 = 20.0;
    /// Joystick knob indicator is clamped to this radius (pixels)
    pub const JOYSTICK_MAX_RADIUS: f32 = 40.0;

    /// Joystick and action-a zones are the lower-left and lower-right
    /// quarters of the input bar; contacts above this line get no role
    pub const TOUCH_ZONE_TOP: f32 = SCREEN_HEIGHT + INPUT_BAR_HEIGHT / 2.0;

    /// Action-b button in the input bar (hit-tested before the quarters)
    pub const BUTTON_B_CENTER: (f32, f32) = (250.0, 590.0);
    pub const BUTTON_B_RADIUS: f32 = 30.0;

    /// Screen shake intensity limits (pixels)
    pub const SHAKE_MIN_INTENSITY: f32 = 1.0;
    pub const SHAKE_MAX_INTENSITY: f32 = 20.0;

    /// Hard ceiling on live particles regardless of settings
    pub const MAX_PARTICLES: usize = 2000;
}

/// Axis-aligned rectangle in pixels (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Point containment (half-open: left/top inclusive, right/bottom exclusive)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Same rectangle moved by `offset`
    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }
}

/// Circle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

impl Circle {
    pub const fn new(x: f32, y: f32, r: f32) -> Self {
        Self { x, y, r }
    }
}

/// Linear RGBA color, components in 0..1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const YELLOW: Color = Color::rgb(1.0, 0.9, 0.2);
    pub const RED: Color = Color::rgb(1.0, 0.25, 0.2);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
