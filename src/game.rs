//! Game state machine
//!
//! `Game` owns the `Session`, the operator configuration and the collaborators.
//! It decides which tick runs for each frame callback, turns simulation events
//! into effect cues, runs the scheduled timers and drives the celebration.
//!
//! Transitions:
//! - `menu -> playing` via [`Game::start`]
//! - `playing <-> paused` via [`Game::toggle_pause`]
//! - `playing -> victory` automatically when the target is reached
//! - `victory -> menu` via [`Game::replay`] (or when the burst finishes)
//! - `victory -> playing` via [`Game::play_again`]

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts::*;
use crate::effects::{CelebrationMedia, Effects, EffectsError, NullEffects, NullMedia};
use crate::input::Intent;
use crate::render::{Frame, Renderer};
use crate::settings::{GameConfig, QualityProvider, QualitySettings};
use crate::sim::{
    CelebrationStage, GameEvent, GameMode, Session, TickInput, TimerAction, celebration_tick, tick,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Action not allowed in the current mode; nothing changed
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: GameMode, action: &'static str },
}

/// Handle for one requested frame callback. Any mode change invalidates
/// outstanding tokens, so a stale callback can never tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(u64);

/// Log a failed fire-and-forget collaborator call and carry on
fn best_effort(what: &str, result: Result<(), EffectsError>) {
    if let Err(e) = result {
        log::warn!("{what} failed: {e}");
    }
}

pub struct Game<E: Effects = NullEffects, M: CelebrationMedia = NullMedia> {
    config: GameConfig,
    quality: QualitySettings,
    session: Session,
    effects: E,
    media: M,
    /// Seeds each new session
    seeds: Pcg32,
    movement: TickInput,
    frame_generation: u64,
    pending_frame: Option<FrameToken>,
}

impl Game {
    /// Game with silent collaborators
    pub fn headless(seed: u64, config: GameConfig) -> Self {
        Self::new(seed, config, NullEffects, NullMedia)
    }
}

impl<E: Effects, M: CelebrationMedia> Game<E, M> {
    pub fn new(seed: u64, config: GameConfig, effects: E, media: M) -> Self {
        let mut seeds = Pcg32::seed_from_u64(seed);
        let quality = QualitySettings::default();
        let session = Session::new(seeds.next_u64(), &config, &quality);
        Self {
            config,
            quality,
            session,
            effects,
            media,
            seeds,
            movement: TickInput::default(),
            frame_generation: 0,
            pending_frame: None,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.session.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session access for scripted scenarios
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Replace the configuration; the running session keeps its snapshot
    /// until the next start or replay
    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    pub fn quality(&self) -> QualitySettings {
        self.quality
    }

    /// Pull a fresh quality hint; applied at the next session reset
    pub fn apply_quality<Q: QualityProvider + ?Sized>(&mut self, provider: &Q) {
        let quality = provider.quality_settings();
        if quality != self.quality {
            log::debug!(
                "quality {} (particle budget {})",
                quality.preset.as_str(),
                quality.particle_budget
            );
        }
        self.quality = quality;
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    // === Transitions ===

    fn invalid(&self, action: &'static str) -> GameError {
        GameError::InvalidTransition {
            from: self.session.mode,
            action,
        }
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.session.mode != mode {
            log::info!("{} -> {}", self.session.mode, mode);
        }
        self.session.mode = mode;
        self.cancel_frame();
    }

    /// Fresh session from the current config; drops pending timers
    fn reset_session(&mut self) {
        let seed = self.seeds.next_u64();
        self.session.reset_with(seed, &self.config, &self.quality);
        self.movement = TickInput::default();
        best_effort("mute", self.effects.set_muted(!self.quality.audio_enabled));
    }

    fn begin_play(&mut self) {
        self.reset_session();
        self.set_mode(GameMode::Playing);
        if self.config.music_enabled && self.quality.audio_enabled {
            best_effort("music on", self.effects.set_music_enabled(true));
        }
    }

    /// `menu -> playing` with a full reset
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.session.mode != GameMode::Menu {
            return Err(self.invalid("start"));
        }
        self.begin_play();
        Ok(())
    }

    /// `playing <-> paused`
    pub fn toggle_pause(&mut self) -> Result<(), GameError> {
        match self.session.mode {
            GameMode::Playing => {
                self.movement = TickInput::default();
                self.set_mode(GameMode::Paused);
            }
            GameMode::Paused => self.set_mode(GameMode::Playing),
            _ => return Err(self.invalid("toggle pause")),
        }
        Ok(())
    }

    /// `victory -> menu` with a full reset
    pub fn replay(&mut self) -> Result<(), GameError> {
        if self.session.mode != GameMode::Victory {
            return Err(self.invalid("replay"));
        }
        self.return_to_menu();
        Ok(())
    }

    /// `victory -> playing` with a full reset
    pub fn play_again(&mut self) -> Result<(), GameError> {
        if self.session.mode != GameMode::Victory {
            return Err(self.invalid("play again"));
        }
        best_effort("media pause", self.media.pause());
        self.begin_play();
        Ok(())
    }

    fn return_to_menu(&mut self) {
        best_effort("media pause", self.media.pause());
        self.reset_session();
        self.set_mode(GameMode::Menu);
    }

    fn enter_victory(&mut self) {
        // The simulation already flipped the mode; outstanding tokens belong to play
        self.cancel_frame();
        self.movement = TickInput::default();
        log::info!(
            "victory with {} / {} hearts",
            self.session.score,
            self.session.target_score
        );
        best_effort("victory cue", self.effects.play_victory_cue());

        let stage = if self.media.is_available() {
            match self.media.play() {
                Ok(()) => CelebrationStage::Media,
                Err(e) => {
                    log::warn!("celebration media failed: {e}");
                    CelebrationStage::FinalMessage
                }
            }
        } else {
            CelebrationStage::FinalMessage
        };
        self.set_stage(stage);
    }

    fn set_stage(&mut self, stage: CelebrationStage) {
        log::debug!("celebration stage {stage:?}");
        self.session.celebration = Some(stage);
    }

    // === Celebration ===

    /// Celebration media finished; the final message follows shortly
    pub fn celebration_media_finished(&mut self, now_ms: f64) -> Result<(), GameError> {
        if self.session.mode != GameMode::Victory
            || self.session.celebration != Some(CelebrationStage::Media)
        {
            return Err(self.invalid("finish celebration media"));
        }
        self.session
            .schedule(now_ms + FINAL_MESSAGE_DELAY_MS, TimerAction::RevealFinalMessage);
        Ok(())
    }

    /// Reward prompt tapped: fireworks burst, then back to the menu
    pub fn celebrate(&mut self, now_ms: f64) -> Result<(), GameError> {
        if self.session.mode != GameMode::Victory
            || self.session.celebration == Some(CelebrationStage::Burst)
        {
            return Err(self.invalid("celebrate"));
        }
        if self.session.celebration == Some(CelebrationStage::Media) {
            best_effort("media pause", self.media.pause());
        }
        self.set_stage(CelebrationStage::Burst);
        for i in 0..BURST_FIREWORKS {
            self.session
                .schedule(now_ms + i as f64 * BURST_STAGGER_MS, TimerAction::LaunchFirework);
        }
        self.session
            .schedule(now_ms + BURST_DURATION_MS, TimerAction::FinishBurst);
        Ok(())
    }

    /// Launch a single firework at a playfield position
    pub fn launch_firework(&mut self, x: f32, y: f32) -> Result<u32, GameError> {
        if self.session.mode != GameMode::Victory {
            return Err(self.invalid("launch firework"));
        }
        Ok(self.session.spawn_firework(Vec2::new(x, y)))
    }

    // === Collaborator settings ===

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.config.music_enabled = enabled;
        best_effort("music toggle", self.effects.set_music_enabled(enabled));
    }

    /// Celebration media volume, clamped to 0.0 - 1.0
    pub fn set_media_volume(&mut self, volume: f32) {
        best_effort("media volume", self.media.set_volume(volume.clamp(0.0, 1.0)));
    }

    // === Input ===

    /// Apply an intent: pause edge plus held movement. Movement is only kept
    /// while playing.
    pub fn handle_intent(&mut self, intent: &Intent) {
        if intent.pause_toggle {
            if let Err(e) = self.toggle_pause() {
                log::trace!("pause ignored: {e}");
            }
        }
        self.movement = if self.session.mode == GameMode::Playing {
            intent.tick_input()
        } else {
            TickInput::default()
        };
    }

    // === Frame loop ===

    /// Ask for the next frame callback. `None` when the mode does not animate.
    pub fn request_frame(&mut self) -> Option<FrameToken> {
        if !self.session.mode.is_animating() {
            return None;
        }
        let token = FrameToken(self.frame_generation);
        self.pending_frame = Some(token);
        Some(token)
    }

    /// Drop the outstanding frame request, if any
    pub fn cancel_frame(&mut self) {
        self.frame_generation += 1;
        self.pending_frame = None;
    }

    /// Run the frame callback for `token` at host time `now_ms`.
    ///
    /// Returns false (and does nothing) for stale or unrequested tokens.
    pub fn on_frame(&mut self, token: FrameToken, now_ms: f64) -> bool {
        if self.pending_frame != Some(token) {
            log::trace!("stale frame {token:?} ignored");
            return false;
        }
        self.pending_frame = None;

        self.poll_timers(now_ms);
        match self.session.mode {
            GameMode::Playing => {
                tick(&mut self.session, &self.movement, now_ms);
                self.dispatch_events();
            }
            GameMode::Victory => celebration_tick(&mut self.session),
            GameMode::Menu | GameMode::Paused => {}
        }
        true
    }

    /// Fire every scheduled action due at `now_ms`
    pub fn poll_timers(&mut self, now_ms: f64) {
        for action in self.session.take_due(now_ms) {
            match action {
                TimerAction::MessageCue => {
                    best_effort("message cue", self.effects.play_message_cue());
                }
                TimerAction::HideBanner { banner_id } => self.session.hide_banner(banner_id),
                TimerAction::RevealFinalMessage => {
                    if self.session.celebration == Some(CelebrationStage::Media) {
                        self.set_stage(CelebrationStage::FinalMessage);
                    }
                }
                TimerAction::LaunchFirework => {
                    self.session.spawn_random_firework();
                }
                TimerAction::FinishBurst => {
                    // Reset drops the rest of this batch with the other timers
                    self.return_to_menu();
                    break;
                }
            }
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                GameEvent::HeartCaught { .. } => {
                    best_effort("catch cue", self.effects.play_catch_cue());
                }
                GameEvent::Milestone { score, index } => {
                    log::debug!("milestone {score}: message {index}");
                }
                GameEvent::Victory { .. } => self.enter_victory(),
                GameEvent::HeartSpawned { .. } | GameEvent::HeartMissed { .. } => {}
            }
        }
    }

    // === Rendering ===

    /// Read-only snapshot for the renderer
    pub fn frame(&self) -> Frame<'_> {
        let s = &self.session;
        Frame {
            mode: s.mode,
            score: s.score,
            target_score: s.target_score,
            hearts: &s.hearts,
            particles: &s.particles,
            fireworks: &s.fireworks,
            player_x: s.player_x,
            clocks: s.clocks,
            message: s.banner.as_ref().map(|b| b.text.as_str()),
            celebration: s.celebration,
            particle_budget: s.particle_budget,
        }
    }

    /// Draw the current frame; renderer failures are logged, never fatal
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        if let Err(e) = renderer.draw(&self.frame()) {
            log::warn!("render failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Cue;
    use crate::render::RenderError;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Records cues; optionally fails every call
    #[derive(Default)]
    struct Recorder {
        cues: Vec<Cue>,
        music: Vec<bool>,
        muted: Option<bool>,
        failing: bool,
    }

    impl Recorder {
        fn record(&mut self, cue: Cue) -> Result<(), EffectsError> {
            self.cues.push(cue);
            if self.failing {
                Err(EffectsError::Backend("boom".into()))
            } else {
                Ok(())
            }
        }
    }

    impl Effects for Recorder {
        fn play_catch_cue(&mut self) -> Result<(), EffectsError> {
            self.record(Cue::Catch)
        }
        fn play_message_cue(&mut self) -> Result<(), EffectsError> {
            self.record(Cue::Message)
        }
        fn play_victory_cue(&mut self) -> Result<(), EffectsError> {
            self.record(Cue::Victory)
        }
        fn set_music_enabled(&mut self, enabled: bool) -> Result<(), EffectsError> {
            self.music.push(enabled);
            Ok(())
        }
        fn set_muted(&mut self, muted: bool) -> Result<(), EffectsError> {
            self.muted = Some(muted);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Video {
        playing: bool,
        volume: f32,
    }

    impl CelebrationMedia for Video {
        fn play(&mut self) -> Result<(), EffectsError> {
            self.playing = true;
            Ok(())
        }
        fn pause(&mut self) -> Result<(), EffectsError> {
            self.playing = false;
            Ok(())
        }
        fn set_volume(&mut self, volume: f32) -> Result<(), EffectsError> {
            self.volume = volume;
            Ok(())
        }
    }

    fn config(target: u32, messages: &[&str]) -> GameConfig {
        GameConfig {
            target_score: target,
            reward_messages: messages.iter().map(|m| m.to_string()).collect(),
            music_enabled: true,
        }
    }

    fn game(target: u32, messages: &[&str]) -> Game<Recorder, Video> {
        Game::new(7, config(target, messages), Recorder::default(), Video::default())
    }

    /// Run one requested frame
    fn frame<E: Effects, M: CelebrationMedia>(game: &mut Game<E, M>, now: f64) -> bool {
        match game.request_frame() {
            Some(token) => game.on_frame(token, now),
            None => false,
        }
    }

    fn drop_on_player<E: Effects, M: CelebrationMedia>(game: &mut Game<E, M>) {
        let s = game.session_mut();
        // Keep random spawns out of the way
        s.last_spawn_ms = Some(f64::MAX / 2.0);
        let x = crate::percent_to_field_x(s.player_x) - HEART_EXTENT / 2.0;
        s.drop_heart_at(Vec2::new(x, 499.0), 1.0);
    }

    #[test]
    fn test_start_from_menu_only() {
        let mut g = game(5, &[]);
        assert_eq!(g.mode(), GameMode::Menu);
        assert_eq!(g.request_frame(), None);
        assert!(g.toggle_pause().is_err());
        assert!(g.replay().is_err());

        g.start().unwrap();
        assert_eq!(g.mode(), GameMode::Playing);
        assert_eq!(g.effects().music, vec![true]);
        assert_eq!(
            g.start(),
            Err(GameError::InvalidTransition {
                from: GameMode::Playing,
                action: "start"
            })
        );
    }

    #[test]
    fn test_pause_cancels_pending_frame() {
        let mut g = game(5, &[]);
        g.start().unwrap();
        let token = g.request_frame().unwrap();
        g.toggle_pause().unwrap();
        assert_eq!(g.request_frame(), None);
        assert!(!g.on_frame(token, 100.0), "stale frame must not tick");
        assert_eq!(g.session().time_ticks, 0);

        g.toggle_pause().unwrap();
        assert!(!g.on_frame(token, 200.0), "old token stays stale after resume");
        assert!(frame(&mut g, 300.0));
        assert_eq!(g.session().time_ticks, 1);
    }

    #[test]
    fn test_pause_intent_toggles_and_clears_movement() {
        let mut g = game(5, &[]);
        g.start().unwrap();
        g.handle_intent(&Intent {
            move_left: true,
            move_right: false,
            pause_toggle: true,
        });
        assert_eq!(g.mode(), GameMode::Paused);

        g.handle_intent(&Intent {
            pause_toggle: true,
            ..Default::default()
        });
        assert_eq!(g.mode(), GameMode::Playing);
        frame(&mut g, 0.0);
        assert_eq!(g.session().player_x, PLAYER_START_X);
    }

    #[test]
    fn test_catches_fire_cues_and_victory_runs_celebration() {
        let mut g = game(3, &[]);
        g.start().unwrap();
        for n in 1..=3 {
            drop_on_player(&mut g);
            assert!(frame(&mut g, n as f64 * FRAME_MS));
        }
        assert_eq!(g.mode(), GameMode::Victory);
        assert_eq!(
            g.effects().cues,
            vec![Cue::Catch, Cue::Catch, Cue::Catch, Cue::Victory]
        );
        assert!(g.media().playing);
        assert_eq!(g.session().celebration, Some(CelebrationStage::Media));

        // Hearts frozen, celebration clocks run
        let hearts = g.session().hearts.clone();
        assert!(frame(&mut g, 1000.0));
        assert_eq!(g.session().hearts, hearts);
        assert!(g.session().clocks.victory_time > 0.0);
    }

    #[test]
    fn test_celebration_flow_returns_to_menu() {
        let mut g = game(1, &[]);
        g.start().unwrap();
        drop_on_player(&mut g);
        frame(&mut g, 0.0);
        assert_eq!(g.mode(), GameMode::Victory);

        g.celebration_media_finished(1000.0).unwrap();
        frame(&mut g, 1400.0);
        assert_eq!(g.session().celebration, Some(CelebrationStage::Media));
        frame(&mut g, 1500.0);
        assert_eq!(g.session().celebration, Some(CelebrationStage::FinalMessage));

        g.celebrate(2000.0).unwrap();
        assert!(g.celebrate(2000.0).is_err());
        frame(&mut g, 2000.0);
        assert_eq!(g.session().fireworks.len(), 1);
        frame(&mut g, 2950.0);
        assert_eq!(g.session().fireworks.len(), BURST_FIREWORKS as usize);

        frame(&mut g, 5000.0);
        assert_eq!(g.mode(), GameMode::Menu);
        assert!(g.session().fireworks.is_empty());
        assert_eq!(g.session().score, 0);
        assert_eq!(g.session().pending_timers(), 0);
    }

    #[test]
    fn test_victory_without_media_shows_final_message() {
        let mut g = Game::new(3, config(1, &[]), Recorder::default(), NullMedia);
        g.start().unwrap();
        drop_on_player(&mut g);
        frame(&mut g, 0.0);
        assert_eq!(g.session().celebration, Some(CelebrationStage::FinalMessage));
        assert!(g.celebration_media_finished(10.0).is_err());
    }

    #[test]
    fn test_replay_and_play_again() {
        let mut g = game(1, &[]);
        g.start().unwrap();
        drop_on_player(&mut g);
        frame(&mut g, 0.0);
        g.launch_firework(100.0, 100.0).unwrap();

        g.replay().unwrap();
        assert_eq!(g.mode(), GameMode::Menu);
        assert!(g.session().fireworks.is_empty());
        assert!(!g.media().playing);
        assert!(g.launch_firework(1.0, 1.0).is_err());

        g.start().unwrap();
        drop_on_player(&mut g);
        frame(&mut g, 0.0);
        g.play_again().unwrap();
        assert_eq!(g.mode(), GameMode::Playing);
        assert_eq!(g.session().score, 0);
        assert!(g.session().hearts.is_empty());
    }

    #[test]
    fn test_message_cue_delayed_and_cancelled_by_reset() {
        let mut g = game(200, &["hello"]);
        g.start().unwrap();
        g.session_mut().score = 9;
        drop_on_player(&mut g);
        frame(&mut g, 1000.0);
        assert_eq!(g.frame().message, Some("hello"));
        assert!(!g.effects().cues.contains(&Cue::Message));

        frame(&mut g, 1200.0);
        assert_eq!(g.effects().cues.last(), Some(&Cue::Message));
        frame(&mut g, 4000.0);
        assert_eq!(g.frame().message, None);

        // A milestone right before a reset never plays its cue afterwards
        g.session_mut().score = 19;
        drop_on_player(&mut g);
        frame(&mut g, 5000.0);
        g.session_mut().score = 1;
        drop_on_player(&mut g);
        let cues_before = g.effects().cues.len();
        g.session_mut().target_score = 2;
        frame(&mut g, 5010.0);
        assert_eq!(g.mode(), GameMode::Victory);
        g.replay().unwrap();
        g.start().unwrap();
        frame(&mut g, 6000.0);
        let late: Vec<_> = g.effects().cues[cues_before..]
            .iter()
            .filter(|c| **c == Cue::Message)
            .collect();
        assert!(late.is_empty());
        assert_eq!(g.frame().message, None);
    }

    #[test]
    fn test_failing_effects_do_not_halt_ticks() {
        let effects = Recorder {
            failing: true,
            ..Default::default()
        };
        let mut g = Game::new(1, config(2, &[]), effects, Video::default());
        g.start().unwrap();
        drop_on_player(&mut g);
        assert!(frame(&mut g, 0.0));
        drop_on_player(&mut g);
        assert!(frame(&mut g, FRAME_MS));
        assert_eq!(g.session().score, 2);
        assert_eq!(g.mode(), GameMode::Victory);
    }

    #[test]
    fn test_config_applies_at_next_reset() {
        let mut g = game(5, &[]);
        g.start().unwrap();
        g.set_config(config(9, &["x"]));
        assert_eq!(g.session().target_score, 5);
        g.toggle_pause().unwrap();
        g.session_mut().mode = GameMode::Victory;
        g.replay().unwrap();
        g.start().unwrap();
        assert_eq!(g.session().target_score, 9);
        assert_eq!(g.session().reward_messages, vec!["x".to_string()]);
    }

    #[test]
    fn test_quality_budget_applies_at_reset() {
        let mut g = game(5, &[]);
        g.apply_quality(&QualitySettings::from_preset(crate::QualityPreset::Low));
        g.start().unwrap();
        assert_eq!(g.session().particle_budget, 20);
        assert_eq!(g.frame().particle_budget, 20);
    }

    #[test]
    fn test_device_without_audio_mutes_at_reset() {
        let mut g = game(5, &[]);
        g.apply_quality(&QualitySettings {
            audio_enabled: false,
            ..Default::default()
        });
        g.start().unwrap();
        assert_eq!(g.effects().muted, Some(true));
        assert!(g.effects().music.is_empty());

        g.apply_quality(&QualitySettings::default());
        g.toggle_pause().unwrap();
        g.session_mut().mode = GameMode::Victory;
        g.play_again().unwrap();
        assert_eq!(g.effects().muted, Some(false));
        assert_eq!(g.effects().music, vec![true]);
    }

    #[test]
    fn test_music_and_volume() {
        let mut g = game(5, &[]);
        g.set_music_enabled(false);
        assert!(!g.config().music_enabled);
        g.start().unwrap();
        assert_eq!(g.effects().music, vec![false]);
        g.set_media_volume(3.0);
        assert_eq!(g.media().volume, 1.0);
    }

    struct Broken;

    impl Renderer for Broken {
        fn draw(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
            assert!(frame.hearts.is_empty());
            Err(RenderError::SurfaceLost)
        }
    }

    #[test]
    fn test_render_failure_is_not_fatal() {
        let mut g = game(5, &[]);
        g.render(&mut Broken);
        g.start().unwrap();
        assert!(frame(&mut g, 0.0));
    }
}
