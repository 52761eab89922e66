//! Session state and core simulation types
//!
//! A `Session` is the complete mutable state of one play-through. It owns every
//! entity collection, the id counters, the spawn timer and the scheduled timers,
//! so nothing about a run lives outside it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Firework, Heart, Particle};
use crate::consts::*;
use crate::settings::{GameConfig, QualitySettings};

/// Session-level mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Waiting for the start action
    #[default]
    Menu,
    /// Active gameplay, ticks run
    Playing,
    /// Ticks halted
    Paused,
    /// Target reached; only the celebration subtick runs
    Victory,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Menu => "menu",
            GameMode::Playing => "playing",
            GameMode::Paused => "paused",
            GameMode::Victory => "victory",
        }
    }

    /// Modes that consume frame callbacks
    pub fn is_animating(&self) -> bool {
        matches!(self, GameMode::Playing | GameMode::Victory)
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the victory sequence currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CelebrationStage {
    /// Celebration media is playing
    Media,
    /// Media done (or absent); final message on screen
    FinalMessage,
    /// Fireworks burst running, ends back in the menu
    Burst,
}

/// Cosmetic clocks handed to the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationClocks {
    pub animation_time: f32,
    pub background_offset: f32,
    pub walk_frame: f32,
    pub victory_time: f32,
    pub celebration_frame: f32,
}

/// Reward message currently on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: u32,
    pub text: String,
    /// Index into the reward message list
    pub index: usize,
}

/// Something that happened during a tick, consumed by the game layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    HeartSpawned { id: u32 },
    HeartCaught { id: u32, pos: Vec2 },
    HeartMissed { id: u32 },
    Milestone { score: u32, index: usize },
    Victory { score: u32 },
}

/// Deferred work scheduled against host wall-clock time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerAction {
    /// Play the reward message cue
    MessageCue,
    /// Hide the banner, if it is still the one with this id
    HideBanner { banner_id: u32 },
    /// Swap celebration media for the final message
    RevealFinalMessage,
    /// Launch one burst firework at a random position
    LaunchFirework,
    /// Burst done, return to the menu
    FinishBurst,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Timer {
    due_ms: f64,
    action: TimerAction,
}

/// Complete state of one play-through
#[derive(Debug, Clone)]
pub struct Session {
    /// Current mode (reset leaves it untouched)
    pub mode: GameMode,
    pub score: u32,
    pub target_score: u32,
    /// Reward messages snapshot taken at reset
    pub reward_messages: Vec<String>,
    /// Player position, percent of playfield width in [15, 85]
    pub player_x: f32,
    /// Derived from score, see `difficulty_multiplier`
    pub difficulty: f32,
    pub hearts: Vec<Heart>,
    pub particles: Vec<Particle>,
    pub fireworks: Vec<Firework>,
    pub clocks: AnimationClocks,
    pub banner: Option<Banner>,
    pub celebration: Option<CelebrationStage>,
    /// Most particles a renderer should draw; the simulation keeps them all
    pub particle_budget: usize,
    /// Simulation ticks since reset
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    seed: u64,
    pub(crate) rng: Pcg32,
    /// Host time of the last heart spawn; `None` spawns on the next tick
    pub(crate) last_spawn_ms: Option<f64>,
    next_heart_id: u32,
    next_particle_id: u32,
    next_firework_id: u32,
    next_banner_id: u32,
    timers: Vec<Timer>,
}

impl Session {
    /// Create a fresh session in `Menu` mode
    pub fn new(seed: u64, config: &GameConfig, quality: &QualitySettings) -> Self {
        Self {
            mode: GameMode::Menu,
            score: 0,
            target_score: config.target_score,
            reward_messages: config.reward_messages.clone(),
            player_x: PLAYER_START_X,
            difficulty: 1.0,
            hearts: Vec::new(),
            particles: Vec::new(),
            fireworks: Vec::new(),
            clocks: AnimationClocks::default(),
            banner: None,
            celebration: None,
            particle_budget: quality.particle_budget,
            time_ticks: 0,
            events: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_ms: None,
            next_heart_id: 0,
            next_particle_id: 0,
            next_firework_id: 0,
            next_banner_id: 0,
            timers: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Clear score, entities, counters, clocks and pending timers.
    ///
    /// Keeps the mode, seed and configuration snapshot; running it twice in a
    /// row yields the same state as running it once.
    pub fn reset(&mut self) {
        self.score = 0;
        self.player_x = PLAYER_START_X;
        self.difficulty = 1.0;
        self.hearts.clear();
        self.particles.clear();
        self.fireworks.clear();
        self.clocks = AnimationClocks::default();
        self.banner = None;
        self.celebration = None;
        self.time_ticks = 0;
        self.events.clear();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.last_spawn_ms = None;
        self.next_heart_id = 0;
        self.next_particle_id = 0;
        self.next_firework_id = 0;
        self.next_banner_id = 0;
        self.timers.clear();
    }

    /// Reset with a new seed and a fresh configuration snapshot
    pub fn reset_with(&mut self, seed: u64, config: &GameConfig, quality: &QualitySettings) {
        self.seed = seed;
        self.target_score = config.target_score;
        self.reward_messages = config.reward_messages.clone();
        self.particle_budget = quality.particle_budget;
        self.reset();
    }

    pub fn next_heart_id(&mut self) -> u32 {
        let id = self.next_heart_id;
        self.next_heart_id += 1;
        id
    }

    pub fn next_particle_id(&mut self) -> u32 {
        let id = self.next_particle_id;
        self.next_particle_id += 1;
        id
    }

    pub fn next_firework_id(&mut self) -> u32 {
        let id = self.next_firework_id;
        self.next_firework_id += 1;
        id
    }

    /// Spawn a random heart above the playfield
    pub fn spawn_heart(&mut self) -> u32 {
        let id = self.next_heart_id();
        let heart = Heart::spawn(id, &mut self.rng);
        self.hearts.push(heart);
        self.events.push(GameEvent::HeartSpawned { id });
        id
    }

    /// Drop a heart at an exact position (scripted drops, tests)
    pub fn drop_heart_at(&mut self, pos: Vec2, speed: f32) -> u32 {
        let id = self.next_heart_id();
        self.hearts.push(Heart::at(id, pos, speed));
        id
    }

    /// Emit a catch burst. Particles only leave the session when their life runs out.
    pub fn spawn_catch_particles(&mut self, pos: Vec2) {
        for _ in 0..CATCH_PARTICLES {
            let id = self.next_particle_id();
            let particle = Particle::burst(id, pos, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// Launch a firework at `origin`
    pub fn spawn_firework(&mut self, origin: Vec2) -> u32 {
        let id = self.next_firework_id();
        let firework = Firework::launch(id, origin, &mut self.rng);
        self.fireworks.push(firework);
        id
    }

    /// Launch a firework anywhere on the playfield
    pub fn spawn_random_firework(&mut self) -> u32 {
        use rand::Rng;
        let origin = Vec2::new(
            self.rng.random::<f32>() * FIELD_WIDTH,
            self.rng.random::<f32>() * FIELD_HEIGHT,
        );
        self.spawn_firework(origin)
    }

    /// Put a reward message on screen and return its banner id
    pub fn show_banner(&mut self, text: String, index: usize) -> u32 {
        let id = self.next_banner_id;
        self.next_banner_id += 1;
        self.banner = Some(Banner { id, text, index });
        id
    }

    /// Hide the banner only if `banner_id` is still the one showing
    pub fn hide_banner(&mut self, banner_id: u32) {
        if self.banner.as_ref().is_some_and(|b| b.id == banner_id) {
            self.banner = None;
        }
    }

    /// Schedule `action` to fire once host time reaches `due_ms`
    pub fn schedule(&mut self, due_ms: f64, action: TimerAction) {
        self.timers.push(Timer { due_ms, action });
    }

    /// Remove and return every action due at `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<TimerAction> {
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.due_ms <= now_ms {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|t| t.action).collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Drain events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
