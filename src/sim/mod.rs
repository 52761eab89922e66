//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step per frame callback, never a wall-clock delta
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids monotonic)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;

pub use collision::PlayerHitbox;
pub use entity::{Firework, Heart, Particle, Spark};
pub use state::{
    AnimationClocks, Banner, CelebrationStage, GameEvent, GameMode, Session, TimerAction,
};
pub use tick::{TickInput, celebration_tick, difficulty_multiplier, milestone_index, tick};
