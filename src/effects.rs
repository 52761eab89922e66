//! Audio cue and celebration media collaborators
//!
//! The core only fires cues; synthesis and playback live behind these traits.
//! Every call is fire-and-forget: errors are reported back so the caller can
//! log them, and the tick goes on regardless.

use thiserror::Error;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Heart caught
    Catch,
    /// Reward message shown
    Message,
    /// Target reached
    Victory,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Catch => "catch",
            Cue::Message => "message",
            Cue::Victory => "victory",
        }
    }
}

#[derive(Debug, Error)]
pub enum EffectsError {
    /// No audio/media backend (not created, not allowed yet, ...)
    #[error("backend unavailable")]
    Unavailable,
    #[error("backend error: {0}")]
    Backend(String),
}

/// Sound cues and background music
pub trait Effects {
    fn play_catch_cue(&mut self) -> Result<(), EffectsError>;
    fn play_message_cue(&mut self) -> Result<(), EffectsError>;
    fn play_victory_cue(&mut self) -> Result<(), EffectsError>;
    fn set_music_enabled(&mut self, enabled: bool) -> Result<(), EffectsError>;

    /// Silence every cue (no audio on this device). Backends without a mute
    /// switch can ignore it.
    fn set_muted(&mut self, _muted: bool) -> Result<(), EffectsError> {
        Ok(())
    }

    /// Dispatch by cue type
    fn play(&mut self, cue: Cue) -> Result<(), EffectsError> {
        match cue {
            Cue::Catch => self.play_catch_cue(),
            Cue::Message => self.play_message_cue(),
            Cue::Victory => self.play_victory_cue(),
        }
    }
}

/// Victory media (video) player
pub trait CelebrationMedia {
    /// Whether there is anything to play; when false the celebration skips
    /// straight to the final message
    fn is_available(&self) -> bool {
        true
    }
    fn play(&mut self) -> Result<(), EffectsError>;
    fn pause(&mut self) -> Result<(), EffectsError>;
    /// Volume in 0.0 - 1.0
    fn set_volume(&mut self, volume: f32) -> Result<(), EffectsError>;
}

/// Silent effects
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffects;

impl Effects for NullEffects {
    fn play_catch_cue(&mut self) -> Result<(), EffectsError> {
        Ok(())
    }

    fn play_message_cue(&mut self) -> Result<(), EffectsError> {
        Ok(())
    }

    fn play_victory_cue(&mut self) -> Result<(), EffectsError> {
        Ok(())
    }

    fn set_music_enabled(&mut self, _enabled: bool) -> Result<(), EffectsError> {
        Ok(())
    }
}

/// No celebration media configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMedia;

impl CelebrationMedia for NullMedia {
    fn is_available(&self) -> bool {
        false
    }

    fn play(&mut self) -> Result<(), EffectsError> {
        Err(EffectsError::Unavailable)
    }

    fn pause(&mut self) -> Result<(), EffectsError> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) -> Result<(), EffectsError> {
        Ok(())
    }
}

/// Effects that write each cue to the log (headless runs)
#[derive(Debug, Clone, Default)]
pub struct LogEffects {
    muted: bool,
    music: bool,
    played: Vec<Cue>,
}

impl LogEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn music_enabled(&self) -> bool {
        self.music
    }

    /// Cues played so far, oldest first
    pub fn played(&self) -> &[Cue] {
        &self.played
    }

    fn cue(&mut self, cue: Cue) -> Result<(), EffectsError> {
        if self.muted {
            return Ok(());
        }
        log::debug!("cue: {}", cue.as_str());
        self.played.push(cue);
        Ok(())
    }
}

impl Effects for LogEffects {
    fn play_catch_cue(&mut self) -> Result<(), EffectsError> {
        self.cue(Cue::Catch)
    }

    fn play_message_cue(&mut self) -> Result<(), EffectsError> {
        self.cue(Cue::Message)
    }

    fn play_victory_cue(&mut self) -> Result<(), EffectsError> {
        self.cue(Cue::Victory)
    }

    fn set_music_enabled(&mut self, enabled: bool) -> Result<(), EffectsError> {
        if self.music != enabled {
            log::info!("music {}", if enabled { "on" } else { "off" });
        }
        self.music = enabled;
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), EffectsError> {
        self.muted = muted;
        Ok(())
    }
}
