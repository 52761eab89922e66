//! Entity records: falling hearts, catch particles and victory fireworks
//!
//! Plain data plus the per-frame advance rule for each kind. Entities are only
//! ever owned by a `Session`.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A falling collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heart {
    pub id: u32,
    pub pos: Vec2,
    /// Fall distance per frame (always positive)
    pub speed: f32,
    pub rotation: f32,
    pub scale: f32,
    /// Visual breathing phase, not gameplay-relevant
    pub pulse: f32,
}

impl Heart {
    /// Spawn a heart above the visible area at a random column
    pub fn spawn<R: Rng>(id: u32, rng: &mut R) -> Self {
        let x = rng.random_range(HEART_SPAWN_INSET..=FIELD_WIDTH - HEART_SPAWN_INSET);
        Self {
            id,
            pos: Vec2::new(x, HEART_SPAWN_Y),
            speed: rng.random_range(HEART_MIN_SPEED..=HEART_MAX_SPEED),
            rotation: rng.random::<f32>() * TAU,
            scale: 0.8 + rng.random::<f32>() * 0.4,
            pulse: rng.random::<f32>() * TAU,
        }
    }

    /// Place a heart at an exact position (scripted drops, tests)
    pub fn at(id: u32, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            speed: speed.max(0.0),
            rotation: 0.0,
            scale: 1.0,
            pulse: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
        self.rotation += HEART_SPIN;
        self.pulse += HEART_PULSE_STEP;
    }

    /// True once the heart has fallen past the bottom margin
    pub fn is_missed(&self) -> bool {
        self.pos.y >= FIELD_HEIGHT + HEART_MISS_MARGIN
    }
}

/// A short-lived sparkle emitted when a heart is caught
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames remaining, `0 <= life <= max_life`
    pub life: u32,
    pub max_life: u32,
    pub rotation: f32,
    pub scale: f32,
}

impl Particle {
    /// Spawn one catch particle with a random upward-biased velocity
    pub fn burst<R: Rng>(id: u32, pos: Vec2, rng: &mut R) -> Self {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
            (rng.random::<f32>() - 0.5) * PARTICLE_SPREAD - PARTICLE_LIFT,
        );
        Self {
            id,
            pos,
            vel,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
            rotation: rng.random::<f32>() * TAU,
            scale: 0.5 + rng.random::<f32>() * 0.5,
        }
    }

    /// Advance one frame. Returns false when the particle has expired.
    pub fn advance(&mut self) -> bool {
        self.pos += self.vel;
        self.vel.y += GRAVITY;
        self.life = self.life.saturating_sub(1);
        self.rotation += PARTICLE_SPIN;
        self.scale *= PARTICLE_SHRINK;
        self.life > 0
    }

    /// Remaining life as a 0-1 fraction (for fading)
    pub fn life_fraction(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// One spark of a firework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
    /// 0xRRGGBB
    pub color: u32,
}

impl Spark {
    pub fn advance(&mut self) -> bool {
        self.pos += self.vel;
        self.vel.y += GRAVITY;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }
}

/// A victory burst; lives until its last spark expires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firework {
    pub id: u32,
    pub origin: Vec2,
    pub sparks: Vec<Spark>,
}

impl Firework {
    /// Sparks are spread evenly around the circle with random speed and color
    pub fn launch<R: Rng>(id: u32, origin: Vec2, rng: &mut R) -> Self {
        let sparks = (0..FIREWORK_SPARKS)
            .map(|i| {
                let angle = TAU * i as f32 / FIREWORK_SPARKS as f32;
                let speed = rng.random_range(SPARK_MIN_SPEED..SPARK_MAX_SPEED);
                let color = FIREWORK_PALETTE[rng.random_range(0..FIREWORK_PALETTE.len())];
                Spark {
                    pos: origin,
                    vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                    life: SPARK_LIFE,
                    max_life: SPARK_LIFE,
                    color,
                }
            })
            .collect();

        Self { id, origin, sparks }
    }

    /// Advance every spark and drop expired ones. Returns false once empty.
    pub fn advance(&mut self) -> bool {
        self.sparks.retain_mut(|s| s.advance());
        !self.sparks.is_empty()
    }
}
