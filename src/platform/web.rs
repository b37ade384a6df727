//! Browser binding
//!
//! The host page owns the canvas and the `requestAnimationFrame` loop. It
//! forwards DOM events and timestamps here and draws the returned snapshot.

use wasm_bindgen::prelude::*;

use crate::input::InputState;
use crate::settings::Settings;
use crate::sim::{LevelSet, Session};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
    }
    log::info!("Neon Breakout starting...");
}

/// One game bound to a page
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    input: InputState,
}

#[wasm_bindgen]
impl WebGame {
    /// New game on the title screen. `seed` is usually `Date.now()`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebGame {
        let session = Session::new(
            seed as u64,
            Tuning::default(),
            Settings::load(),
            LevelSet::builtin(),
        );
        WebGame {
            session,
            input: InputState::new(),
        }
    }

    /// Override tuning with a JSON document (missing fields keep defaults)
    #[wasm_bindgen(js_name = withTuning)]
    pub fn with_tuning(seed: f64, json: &str) -> Result<WebGame, JsValue> {
        let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let session = Session::new(seed as u64, tuning, Settings::load(), LevelSet::builtin());
        Ok(WebGame {
            session,
            input: InputState::new(),
        })
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self, now: f64) {
        self.input.clear();
        self.session.start_game(now);
    }

    #[wasm_bindgen(js_name = nextLevel)]
    pub fn next_level(&mut self, now: f64) -> bool {
        self.session.next_level(now)
    }

    /// Level intro timer elapsed
    #[wasm_bindgen(js_name = finishIntro)]
    pub fn finish_intro(&mut self) {
        self.session.finish_intro();
    }

    /// Back to the title screen
    pub fn reset(&mut self) {
        self.input.clear();
        self.session.reset();
    }

    /// Returns true if the key was handled (call `preventDefault`)
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    /// Pointer x relative to the board's left edge
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32) {
        self.input.pointer_move(x);
    }

    pub fn click(&mut self) {
        self.input.click();
    }

    /// Animation frame callback. Returns the snapshot as JSON, or
    /// `undefined` when the loop is stopped.
    pub fn frame(&mut self, now: f64) -> Option<String> {
        let input = self.input.take_tick_input();
        if !self.session.frame(now, &input) {
            return None;
        }
        match serde_json::to_string(&self.session.snapshot()) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Snapshot encode failed: {}", e);
                None
            }
        }
    }

    /// Current snapshot as JSON, without advancing
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_default()
    }

    /// Audio cues since the last call, as a JSON array of kebab-case names
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        serde_json::to_string(&self.session.drain_events()).unwrap_or_default()
    }

    /// Page hidden or unmounted
    pub fn stop(&mut self) {
        self.input.clear();
        self.session.stop();
    }

    pub fn resume(&mut self, now: f64) {
        self.session.resume(now);
    }

    /// Apply and persist new settings (JSON)
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        self.session.set_settings(settings);
        Ok(())
    }
}
