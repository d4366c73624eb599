//! Runtime settings and preferences
//!
//! Loaded from an optional JSON file next to the host; every field has a
//! default so partial files are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::RuntimeError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => MAX_PARTICLES,
        }
    }
}

/// Runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Text shown on the title screen
    pub title: String,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Frames per second the driver throttles to
    pub target_fps: f32,
    /// Debounce before GAME_OVER/GAME_CLEAR accept a restart (ms)
    pub restart_delay_ms: f64,

    // === Input ===
    /// Joystick deadzone radius (pixels)
    pub joystick_deadzone: f32,
    /// Joystick indicator clamp radius (pixels)
    pub joystick_max_radius: f32,

    // === Visual Effects ===
    /// Screen shake (camera and screen effects)
    pub screen_shake: bool,
    /// Full-screen flashes
    pub flash: bool,
    /// Particle effects
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Accessibility ===
    /// Reduced motion (suppresses shake and flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "ARCADE".to_string(),
            quality: QualityPreset::Medium,
            target_fps: TARGET_FPS,
            restart_delay_ms: RESTART_DELAY_MS,

            joystick_deadzone: JOYSTICK_DEADZONE,
            joystick_max_radius: JOYSTICK_MAX_RADIUS,

            screen_shake: true,
            flash: true,
            particles: true,

            show_fps: false,

            master_volume: 0.8,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.flash && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Fixed frame interval in seconds; non-positive rates fall back to the default
    pub fn frame_interval(&self) -> f32 {
        if self.target_fps > 0.0 {
            1.0 / self.target_fps
        } else {
            FRAME_INTERVAL
        }
    }

    /// Master volume clamped to 0..1
    pub fn volume(&self) -> f32 {
        self.master_volume.clamp(0.0, 1.0)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, RuntimeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read_from(path) {
            Ok(settings) => {
                log::info!(
                    "Loaded settings from {} ({} quality)",
                    path.display(),
                    settings.quality.as_str()
                );
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), RuntimeError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
