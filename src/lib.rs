//! Heart Catcher - A falling-heart catcher arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, session state)
//! - `game`: Session-level state machine and celebration flow
//! - `input`: Keyboard/pointer mapping into movement intents
//! - `effects`: Audio cue and celebration media collaborators
//! - `render`: Read-only frame snapshot handed to renderers
//! - `settings`: Operator configuration and quality hints
//! - `perf`: Frame-rate telemetry

pub mod effects;
pub mod game;
pub mod input;
pub mod perf;
pub mod render;
pub mod settings;
pub mod sim;

pub use effects::{CelebrationMedia, Cue, Effects, EffectsError, NullEffects, NullMedia};
pub use game::{FrameToken, Game, GameError};
pub use input::{Autopilot, InputState, Intent, Key};
pub use perf::FrameMonitor;
pub use render::{Frame, RenderError, Renderer};
pub use settings::{
    ConfigError, DeviceProfile, GameConfig, MemoryClass, Platform, QualityPreset, QualityProvider,
    QualitySettings,
};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical pixels, y grows downward)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Animation clock advance per frame callback
    pub const FRAME_STEP: f32 = 0.1;
    /// Background scroll per frame, wrapped at `BACKGROUND_WRAP`
    pub const BACKGROUND_SCROLL: f32 = 0.5;
    pub const BACKGROUND_WRAP: f32 = 100.0;
    /// Walk cycle advance per frame while moving, wrapped at `WALK_FRAMES`
    pub const WALK_STEP: f32 = 0.2;
    pub const WALK_FRAMES: f32 = 4.0;

    /// Hearts spawn above the visible area
    pub const HEART_SPAWN_Y: f32 = -40.0;
    /// Horizontal inset of the spawn band from each edge
    pub const HEART_SPAWN_INSET: f32 = 25.0;
    pub const HEART_MIN_SPEED: f32 = 0.8;
    pub const HEART_MAX_SPEED: f32 = 1.5;
    pub const HEART_SPIN: f32 = 0.05;
    pub const HEART_PULSE_STEP: f32 = 0.1;
    /// Hearts below `FIELD_HEIGHT + HEART_MISS_MARGIN` are missed
    pub const HEART_MISS_MARGIN: f32 = 50.0;
    /// Side of the heart's collision square (anchored at its position)
    pub const HEART_EXTENT: f32 = 20.0;

    /// Base spawn interval, divided by the difficulty multiplier
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 2500.0;
    pub const DIFFICULTY_PER_POINT: f32 = 0.005;
    pub const MAX_DIFFICULTY: f32 = 2.0;

    /// Player horizontal position, percent of the playfield width
    pub const PLAYER_MIN_X: f32 = 15.0;
    pub const PLAYER_MAX_X: f32 = 85.0;
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_STEP: f32 = 0.8;
    /// Player hitbox (centered on the player, top edge above the floor)
    pub const HITBOX_WIDTH: f32 = 80.0;
    pub const HITBOX_HEIGHT: f32 = 80.0;
    pub const HITBOX_FLOOR_OFFSET: f32 = 120.0;

    /// Catch burst
    pub const CATCH_PARTICLES: usize = 8;
    pub const PARTICLE_LIFE: u32 = 40;
    pub const PARTICLE_SPREAD: f32 = 6.0;
    pub const PARTICLE_LIFT: f32 = 3.0;
    pub const PARTICLE_SPIN: f32 = 0.2;
    pub const PARTICLE_SHRINK: f32 = 0.98;
    /// Downward acceleration per frame for particles and sparks
    pub const GRAVITY: f32 = 0.1;

    /// Reward messages every N points
    pub const MILESTONE_INTERVAL: u32 = 10;
    pub const MESSAGE_DISPLAY_MS: f64 = 3000.0;
    pub const MESSAGE_CUE_DELAY_MS: f64 = 200.0;

    /// Victory animation clocks
    pub const CELEBRATION_POSE_STEP: f32 = 0.3;

    /// Fireworks
    pub const FIREWORK_SPARKS: usize = 15;
    pub const SPARK_LIFE: u32 = 60;
    pub const SPARK_MIN_SPEED: f32 = 2.0;
    pub const SPARK_MAX_SPEED: f32 = 5.0;
    pub const FIREWORK_PALETTE: [u32; 6] =
        [0xFF4757, 0xFF6B7A, 0xFFD700, 0xFF69B4, 0xFFA500, 0xFF1493];

    /// Celebration sequence timing
    pub const FINAL_MESSAGE_DELAY_MS: f64 = 500.0;
    pub const BURST_FIREWORKS: u32 = 10;
    pub const BURST_STAGGER_MS: f64 = 100.0;
    pub const BURST_DURATION_MS: f64 = 3000.0;

    /// Operator-configurable target score bounds
    pub const MIN_TARGET_SCORE: u32 = 1;
    pub const MAX_TARGET_SCORE: u32 = 200;
    pub const DEFAULT_TARGET_SCORE: u32 = 50;
}

/// Convert a player position (percent of width) to playfield x
#[inline]
pub fn percent_to_field_x(percent: f32) -> f32 {
    percent / 100.0 * consts::FIELD_WIDTH
}
