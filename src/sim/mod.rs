//! Per-tick simulation subsystems
//!
//! Everything here is synchronous and single-owner:
//! - No suspension points
//! - Seeded RNG only
//! - No platform dependencies; drawing goes through `renderer::Surface`

pub mod camera;
pub mod collision;
pub mod effects;
pub mod particles;
pub mod phase;
pub mod stages;
pub mod tiles;

pub use camera::{Camera, FollowTarget, follow_target};
pub use collision::{circle_overlap, circle_rect_overlap, distance, rect_overlap};
pub use effects::{ScreenEffects, TrailPoint};
pub use particles::{EmitConfig, Particle, ParticleField};
pub use phase::{Phase, PhaseMachine};
pub use stages::StageSequencer;
pub use tiles::{EMPTY_TILE, TileGrid, TileRange};
