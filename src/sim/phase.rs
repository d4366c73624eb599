//! Game lifecycle state machine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// Current phase of the game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Assets still resolving
    Loading,
    /// Title screen, waiting for the start press
    Title,
    /// Active gameplay
    Playing,
    /// Frozen frame with pause overlay
    Paused,
    /// Between stages, showing the bonus
    StageClear,
    /// Scripted sequence driven by the game
    Cutscene,
    /// Active gameplay, boss variant
    Boss,
    /// Run ended in defeat
    GameOver,
    /// Run ended in victory
    GameClear,
}

impl Phase {
    pub const ALL: [Phase; 9] = [
        Phase::Loading,
        Phase::Title,
        Phase::Playing,
        Phase::Paused,
        Phase::StageClear,
        Phase::Cutscene,
        Phase::Boss,
        Phase::GameOver,
        Phase::GameClear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "LOADING",
            Phase::Title => "TITLE",
            Phase::Playing => "PLAYING",
            Phase::Paused => "PAUSED",
            Phase::StageClear => "STAGE_CLEAR",
            Phase::Cutscene => "CUTSCENE",
            Phase::Boss => "BOSS",
            Phase::GameOver => "GAME_OVER",
            Phase::GameClear => "GAME_CLEAR",
        }
    }

    /// Phases in which the game's update hook runs
    pub fn is_gameplay(&self) -> bool {
        matches!(self, Phase::Playing | Phase::Boss)
    }

    /// Terminal phases that return to the title after the debounce window
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::GameClear)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RuntimeError::UnknownPhase(s.to_string()))
    }
}

/// Exactly one active phase plus the time it was entered
///
/// The machine keeps its own millisecond clock, advanced by the driver, so
/// debounce checks are deterministic under synthetic ticks.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    phase: Phase,
    clock_ms: f64,
    changed_at_ms: f64,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new(Phase::Loading)
    }
}

impl PhaseMachine {
    pub fn new(initial: Phase) -> Self {
        Self {
            phase: initial,
            clock_ms: 0.0,
            changed_at_ms: 0.0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is(&self, phase: Phase) -> bool {
        self.phase == phase
    }

    /// Enter `phase` and stamp the transition time
    pub fn set_phase(&mut self, phase: Phase) {
        if phase != self.phase {
            log::info!("Phase {} -> {}", self.phase, phase);
        }
        self.phase = phase;
        self.changed_at_ms = self.clock_ms;
    }

    /// Enter a phase by name
    ///
    /// # Panics
    /// An unknown name is a programming error and panics.
    pub fn set_phase_named(&mut self, name: &str) {
        match name.parse::<Phase>() {
            Ok(phase) => self.set_phase(phase),
            Err(e) => panic!("invalid phase transition: {}", e),
        }
    }

    pub fn advance_clock(&mut self, dt_ms: f64) {
        self.clock_ms += dt_ms.max(0.0);
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Milliseconds spent in the current phase
    pub fn time_in_phase_ms(&self) -> f64 {
        self.clock_ms - self.changed_at_ms
    }

    /// True once at least `min_delay_ms` has passed since the last transition
    pub fn can_accept_input(&self, min_delay_ms: f64) -> bool {
        self.time_in_phase_ms() >= min_delay_ms
    }
}
