//! Frame-rate telemetry
//!
//! Keeps the last 60 frame timestamps and derives an fps figure and a quality
//! hint from them. Purely advisory; the simulation never reads it.

use crate::settings::{QualityPreset, QualityProvider, QualitySettings};

const WINDOW: usize = 60;
/// Below this the monitor warns once per dip
const LOW_FPS: u32 = 30;
const MEDIUM_FPS: u32 = 45;

#[derive(Debug, Clone)]
pub struct FrameMonitor {
    frame_times: [f64; WINDOW],
    frame_index: usize,
    recorded: usize,
    fps: u32,
    low_reported: bool,
}

impl Default for FrameMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMonitor {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; WINDOW],
            frame_index: 0,
            recorded: 0,
            fps: 0,
            low_reported: false,
        }
    }

    /// Record a frame callback at host time `now_ms`
    pub fn record(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % WINDOW;
        self.recorded = (self.recorded + 1).min(WINDOW);

        if self.recorded < WINDOW {
            return;
        }
        // Oldest sample is the one about to be overwritten
        let oldest = self.frame_times[self.frame_index];
        let elapsed = now_ms - oldest;
        if elapsed > 0.0 {
            self.fps = ((WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
        }

        if self.fps < LOW_FPS {
            if !self.low_reported {
                log::warn!("Low FPS detected: {}", self.fps);
                self.low_reported = true;
            }
        } else {
            self.low_reported = false;
        }
    }

    /// Measured frames per second (0 until the window has filled)
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Preset that the measured rate can sustain
    pub fn suggested_preset(&self) -> Option<QualityPreset> {
        if self.recorded < WINDOW {
            return None;
        }
        Some(match self.fps {
            f if f < LOW_FPS => QualityPreset::Low,
            f if f < MEDIUM_FPS => QualityPreset::Medium,
            _ => QualityPreset::High,
        })
    }
}

impl QualityProvider for FrameMonitor {
    fn quality_settings(&self) -> QualitySettings {
        self.suggested_preset()
            .map(QualitySettings::from_preset)
            .unwrap_or_default()
    }
}
