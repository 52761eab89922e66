//! Catch detection
//!
//! The player catches with a generous axis-aligned box rather than the
//! character's outline; one O(1) overlap test per heart.

use glam::Vec2;

use crate::consts::*;
use crate::percent_to_field_x;

/// Axis-aligned catch region around the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerHitbox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl PlayerHitbox {
    /// Hitbox for a player at `player_x` percent of the playfield width
    pub fn at(player_x: f32) -> Self {
        let center = percent_to_field_x(player_x);
        let top = FIELD_HEIGHT - HITBOX_FLOOR_OFFSET;
        Self {
            left: center - HITBOX_WIDTH / 2.0,
            right: center + HITBOX_WIDTH / 2.0,
            top,
            bottom: top + HITBOX_HEIGHT,
        }
    }

    /// Strict overlap between the heart's square (anchored at `pos`) and the box
    pub fn catches(&self, pos: Vec2) -> bool {
        pos.x + HEART_EXTENT > self.left
            && pos.x < self.right
            && pos.y + HEART_EXTENT > self.top
            && pos.y < self.bottom
    }
}
