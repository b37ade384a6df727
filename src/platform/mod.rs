//! Platform abstraction layer
//!
//! - `FrameClock`: turns display-refresh timestamps into tick deltas
//! - `web`: browser binding (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Frame timing for a tick loop driven by the display refresh.
///
/// Stopping makes later frames no-ops; resuming re-bases the clock so the
/// first delta after a pause is zero instead of the whole pause.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time: Option<f64>,
    running: bool,
    max_frame_ms: f64,
}

impl FrameClock {
    pub fn new(max_frame_ms: f64) -> Self {
        Self {
            last_time: None,
            running: false,
            max_frame_ms,
        }
    }

    /// Start (or restart) the loop at `now` (ms)
    pub fn resume(&mut self, now: f64) {
        self.last_time = Some(now);
        self.running = true;
    }

    /// Stop the loop; pending frames are ignored
    pub fn stop(&mut self) {
        self.running = false;
        self.last_time = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Raw milliseconds since the previous frame, `None` when stopped
    pub fn frame(&mut self, now: f64) -> Option<f64> {
        if !self.running {
            log::warn!("Frame at {:.1}ms after stop ignored", now);
            return None;
        }
        let last = self.last_time.replace(now).unwrap_or(now);
        Some((now - last).clamp(0.0, self.max_frame_ms))
    }
}
