//! Input adapter
//!
//! Keyboard and pointer sources are tracked separately and OR'd into one
//! `Intent`. Pause is edge-triggered: one press yields exactly one toggle.

use crate::percent_to_field_x;
use crate::sim::{Session, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Pause,
}

impl Key {
    /// Map a DOM-style key name (`KeyboardEvent.key`)
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Normalized player intent for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    /// Set once per pause key press
    pub pause_toggle: bool,
}

impl Intent {
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            move_left: self.move_left,
            move_right: self.move_right,
        }
    }
}

/// Held keys, pointer state and pending pause edge
#[derive(Debug, Clone, Default)]
pub struct InputState {
    key_left: bool,
    key_right: bool,
    pause_held: bool,
    pointer_left: bool,
    pointer_right: bool,
    pause_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.key_left = true,
            Key::Right => self.key_right = true,
            Key::Pause => {
                // Auto-repeat keeps firing keydown while held
                if !self.pause_held {
                    self.pause_pending = true;
                }
                self.pause_held = true;
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.key_left = false,
            Key::Right => self.key_right = false,
            Key::Pause => self.pause_held = false,
        }
    }

    /// Pointer pressed at `x` on a surface `surface_width` wide
    pub fn pointer_down(&mut self, x: f32, surface_width: f32) {
        if x < surface_width / 2.0 {
            self.pointer_left = true;
        } else {
            self.pointer_right = true;
        }
    }

    /// Pointer released or left the surface
    pub fn pointer_up(&mut self) {
        self.pointer_left = false;
        self.pointer_right = false;
    }

    /// Drop everything held (focus lost, mode change)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Current intent; consumes the pending pause edge
    pub fn take_intent(&mut self) -> Intent {
        let intent = Intent {
            move_left: self.key_left || self.pointer_left,
            move_right: self.key_right || self.pointer_right,
            pause_toggle: self.pause_pending,
        };
        self.pause_pending = false;
        intent
    }
}

/// Idle/demo driver that chases the lowest falling heart
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Horizontal distance (playfield px) treated as "close enough"
    pub dead_zone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { dead_zone: 6.0 }
    }
}

impl Autopilot {
    pub fn intent(&self, session: &Session) -> Intent {
        let target = session
            .hearts
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|h| h.pos.x + crate::consts::HEART_EXTENT / 2.0);

        let Some(target) = target else {
            return Intent::default();
        };
        let player = percent_to_field_x(session.player_x);
        let delta = target - player;
        Intent {
            move_left: delta < -self.dead_zone,
            move_right: delta > self.dead_zone,
            pause_toggle: false,
        }
    }
}
