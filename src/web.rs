//! JavaScript bindings
//!
//! The page owns the canvas, HUD and audio. It forwards pointer events here,
//! calls `tick` once per animation frame and draws the returned JSON snapshot.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{SimulationSession, TickInput, tick};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger was already initialised");
    }
    log::info!("Float Pop starting...");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Game instance holding the session and pending input
#[wasm_bindgen]
pub struct WebGame {
    session: SimulationSession,
    input: TickInput,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game from settings JSON (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<WebGame, JsValue> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(to_js)?
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            session: SimulationSession::new(settings, seed),
            input: TickInput::default(),
        })
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.pointer = Some(Vec2::new(x, y));
    }

    pub fn pointer_leave(&mut self) {
        self.input.pointer = None;
    }

    /// Queue a click for the next tick
    pub fn click(&mut self, x: f32, y: f32) {
        self.input.click = Some(Vec2::new(x, y));
    }

    /// Advance one frame and return the snapshot as JSON
    pub fn tick(&mut self) -> Result<String, JsValue> {
        let snapshot = tick(&mut self.session, &self.input);
        // Clear one-shot inputs after processing
        self.input.click = None;
        serde_json::to_string(&snapshot).map_err(to_js)
    }

    /// Current state as JSON without advancing
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(to_js)
    }

    /// Apply new settings; they take effect on the next reset
    pub fn configure(&mut self, settings_json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(settings_json).map_err(to_js)?;
        self.session.configure(settings);
        Ok(())
    }

    pub fn reset(&mut self, preserve_target_total: bool) {
        self.session.reset(preserve_target_total);
        self.input = TickInput::default();
    }

    pub fn start_new_session(&mut self, group_size: u32) -> Result<(), JsValue> {
        self.session.start_new_session(group_size).map_err(to_js)?;
        self.input = TickInput::default();
        Ok(())
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn unlocked_group_sizes(&self) -> Vec<u32> {
        self.session.unlocks.group_sizes()
    }
}
