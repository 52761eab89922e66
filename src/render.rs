//! Render adapter contract
//!
//! Each frame the game hands a borrowed, read-only `Frame` to a `Renderer`.
//! Renderers must not assume non-empty collections.

use serde::Serialize;
use thiserror::Error;

use crate::sim::{AnimationClocks, CelebrationStage, Firework, GameMode, Heart, Particle};

/// Read-only snapshot of everything needed to draw one frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Frame<'a> {
    pub mode: GameMode,
    pub score: u32,
    pub target_score: u32,
    pub hearts: &'a [Heart],
    pub particles: &'a [Particle],
    pub fireworks: &'a [Firework],
    /// Percent of playfield width
    pub player_x: f32,
    pub clocks: AnimationClocks,
    /// Reward message on screen, if any
    pub message: Option<&'a str>,
    pub celebration: Option<CelebrationStage>,
    /// Most particles worth drawing on this device
    pub particle_budget: usize,
}

impl<'a> Frame<'a> {
    /// Newest particles within the drawing budget
    pub fn visible_particles(&self) -> &'a [Particle] {
        let skip = self.particles.len().saturating_sub(self.particle_budget);
        &self.particles[skip..]
    }

    /// JSON form for renderers on the other side of an FFI boundary
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    /// Drawing surface lost or not ready
    #[error("surface unavailable")]
    SurfaceLost,
    #[error("render failed: {0}")]
    Other(String),
}

pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), RenderError>;
}
