//! Fixed-step simulation tick
//!
//! One call advances the session by one frame callback. Physics never looks at
//! elapsed wall-clock time; `now_ms` only drives the heart spawn timer and the
//! scheduled message timers.

use super::collision::PlayerHitbox;
use super::state::{GameEvent, GameMode, Session, TimerAction};
use crate::consts::*;

/// Movement flags held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
}

impl TickInput {
    /// Net horizontal direction; opposite flags cancel
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Spawn cadence multiplier for a score, capped at `MAX_DIFFICULTY`
pub fn difficulty_multiplier(score: u32) -> f32 {
    (1.0 + score as f32 * DIFFICULTY_PER_POINT).min(MAX_DIFFICULTY)
}

/// Reward message index for a milestone score, `None` if the score is not a
/// milestone or there are no messages
pub fn milestone_index(score: u32, message_count: usize) -> Option<usize> {
    if score == 0 || message_count == 0 || score % MILESTONE_INTERVAL != 0 {
        return None;
    }
    let nth = (score / MILESTONE_INTERVAL - 1) as usize;
    Some(nth % message_count)
}

/// Advance a playing session by one frame.
///
/// Does nothing unless the session is `Playing`.
pub fn tick(session: &mut Session, input: &TickInput, now_ms: f64) {
    if session.mode != GameMode::Playing {
        return;
    }
    session.time_ticks += 1;

    // Cosmetic clocks
    let moving = input.move_left || input.move_right;
    let clocks = &mut session.clocks;
    clocks.animation_time += FRAME_STEP;
    clocks.background_offset = (clocks.background_offset + BACKGROUND_SCROLL) % BACKGROUND_WRAP;
    if moving {
        clocks.walk_frame = (clocks.walk_frame + WALK_STEP) % WALK_FRAMES;
    }

    // Spawn timer
    let interval = BASE_SPAWN_INTERVAL_MS / session.difficulty as f64;
    let spawn_due = session
        .last_spawn_ms
        .is_none_or(|last| now_ms - last > interval);
    if spawn_due {
        let id = session.spawn_heart();
        session.last_spawn_ms = Some(now_ms);
        log::trace!("heart {id} spawned at {now_ms:.0}ms");
    }

    // Fall, then drop hearts past the bottom margin
    for heart in &mut session.hearts {
        heart.advance();
    }
    let mut missed = Vec::new();
    session.hearts.retain(|h| {
        if h.is_missed() {
            missed.push(h.id);
            false
        } else {
            true
        }
    });
    session
        .events
        .extend(missed.into_iter().map(|id| GameEvent::HeartMissed { id }));

    // Catches
    let hitbox = PlayerHitbox::at(session.player_x);
    let (caught, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut session.hearts)
        .into_iter()
        .partition(|h| hitbox.catches(h.pos));
    session.hearts = remaining;

    let mut won = false;
    for heart in caught {
        session.score += 1;
        session.spawn_catch_particles(heart.pos);
        session.events.push(GameEvent::HeartCaught {
            id: heart.id,
            pos: heart.pos,
        });
        log::trace!("heart {} caught, score {}", heart.id, session.score);

        if won {
            continue;
        }
        if session.score >= session.target_score {
            won = true;
            session.mode = GameMode::Victory;
            session.events.push(GameEvent::Victory {
                score: session.score,
            });
            continue;
        }
        if let Some(index) = milestone_index(session.score, session.reward_messages.len()) {
            let text = session.reward_messages[index].clone();
            let banner_id = session.show_banner(text, index);
            session.schedule(now_ms + MESSAGE_CUE_DELAY_MS, TimerAction::MessageCue);
            session.schedule(
                now_ms + MESSAGE_DISPLAY_MS,
                TimerAction::HideBanner { banner_id },
            );
            session.events.push(GameEvent::Milestone {
                score: session.score,
                index,
            });
        }
    }

    // Particles
    session.particles.retain_mut(|p| p.advance());

    // Movement
    let direction = input.direction();
    if direction != 0.0 {
        session.player_x =
            (session.player_x + direction * PLAYER_STEP).clamp(PLAYER_MIN_X, PLAYER_MAX_X);
    }

    session.difficulty = difficulty_multiplier(session.score);
}

/// Advance the victory-only celebration: clocks and fireworks.
///
/// Does nothing unless the session is in `Victory`. Hearts are frozen.
pub fn celebration_tick(session: &mut Session) {
    if session.mode != GameMode::Victory {
        return;
    }
    session.clocks.victory_time += FRAME_STEP;
    session.clocks.celebration_frame += CELEBRATION_POSE_STEP;
    session.fireworks.retain_mut(|fw| fw.advance());
}
