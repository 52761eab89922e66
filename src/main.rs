//! Heart Catcher headless entry point
//!
//! Drives one full session at a simulated 60 Hz with the autopilot: play to
//! the target, let the celebration media "finish", tap the reward prompt and
//! ride the fireworks back to the menu.

use heart_catcher::effects::LogEffects;
use heart_catcher::sim::{CelebrationStage, GameMode};
use heart_catcher::{
    Autopilot, CelebrationMedia, EffectsError, Frame, FrameMonitor, Game, GameConfig, RenderError,
    Renderer,
};

const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten simulated minutes
const MAX_FRAMES: u64 = 60 * 60 * 10;
/// Simulated length of the celebration video
const MEDIA_LENGTH_MS: f64 = 2000.0;

/// Logs a one-line summary every couple of seconds
struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.frames += 1;
        if self.frames % 120 == 0 {
            let particles = frame.visible_particles();
            let fade = if particles.is_empty() {
                0.0
            } else {
                particles.iter().map(|p| p.life_fraction()).sum::<f32>() / particles.len() as f32
            };
            log::debug!(
                "[{}] score {}/{} hearts {} particles {} (fade {:.2}) fireworks {} player {:.1}%",
                frame.mode,
                frame.score,
                frame.target_score,
                frame.hearts.len(),
                particles.len(),
                fade,
                frame.fireworks.len(),
                frame.player_x,
            );
        }
        if log::log_enabled!(log::Level::Trace) {
            let json = frame
                .to_json()
                .map_err(|e| RenderError::Other(e.to_string()))?;
            log::trace!("frame {json}");
        }
        if let Some(message) = frame.message {
            log::trace!("banner: {message}");
        }
        Ok(())
    }
}

/// Pretend video: starts on play, the driver reports when it ends
#[derive(Default)]
struct ScriptedVideo {
    playing: bool,
}

impl CelebrationMedia for ScriptedVideo {
    fn play(&mut self) -> Result<(), EffectsError> {
        log::info!("celebration video playing");
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EffectsError> {
        self.playing = false;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), EffectsError> {
        log::debug!("video volume {volume:.2}");
        Ok(())
    }
}

fn load_config() -> Result<GameConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            Ok(GameConfig::from_json(&json)?)
        }
        None => {
            let mut config = GameConfig::default();
            config.set_target_score(20)?;
            Ok(config)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Heart Catcher (headless) starting...");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid config: {e}");
            std::process::exit(1);
        }
    };

    let mut game = Game::new(0x4845_4152, config, LogEffects::new(), ScriptedVideo::default());
    game.set_media_volume(0.8);
    let pilot = Autopilot::default();
    let mut renderer = LogRenderer { frames: 0 };
    let mut monitor = FrameMonitor::new();

    if let Err(e) = game.start() {
        log::error!("{e}");
        std::process::exit(1);
    }
    log::debug!("session seed {:#x}", game.session().seed());

    let mut now = 0.0;
    let mut media_ends_at: Option<f64> = None;
    let mut celebrated = false;
    let mut won = false;

    for _ in 0..MAX_FRAMES {
        now += FRAME_MS;
        monitor.record(now);

        let intent = pilot.intent(game.session());
        game.handle_intent(&intent);

        let Some(token) = game.request_frame() else {
            break;
        };
        game.on_frame(token, now);
        game.render(&mut renderer);

        if game.mode() == GameMode::Victory {
            won = true;
            match game.session().celebration {
                Some(CelebrationStage::Media) => {
                    let ends = *media_ends_at.get_or_insert(now + MEDIA_LENGTH_MS);
                    if now >= ends {
                        media_ends_at = Some(f64::INFINITY);
                        if let Err(e) = game.celebration_media_finished(now) {
                            log::warn!("{e}");
                        }
                    }
                }
                Some(CelebrationStage::FinalMessage) if !celebrated => {
                    celebrated = true;
                    if let Err(e) = game.celebrate(now) {
                        log::warn!("{e}");
                    }
                }
                _ => {}
            }
        }
    }

    game.apply_quality(&monitor);
    log::info!(
        "Finished in {:.1}s simulated: {} (mode {}, {} cues, {} fps, suggested quality {})",
        now / 1000.0,
        if won { "target reached" } else { "target not reached" },
        game.mode(),
        game.effects().played().len(),
        monitor.fps(),
        game.quality().preset.as_str(),
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}
