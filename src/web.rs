//! Browser frame driver
//!
//! JavaScript owns the canvas, input capture and `requestAnimationFrame`. It
//! calls [`WebGame::frame`] once per display refresh and draws the returned
//! snapshot JSON.

use wasm_bindgen::prelude::*;

use crate::audio::AudioManager;
use crate::consts::FRAME_MS;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Longest frame we simulate in one go (tab switches, debugger pauses)
const MAX_FRAME_MS: f64 = 250.0;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Brickfall starting...");
}

fn seed_or_now(seed: Option<f64>) -> u64 {
    seed.unwrap_or_else(js_sys::Date::now) as u64
}

/// Game instance owned by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    settings: Settings,
    audio: AudioManager,
    last_time: Option<f64>,
    pending_pause: bool,
    idle_mode: bool,
    unlocked: bool,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>) -> WebGame {
        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let mut state = GameState::new(seed_or_now(seed));
        state.particle_cap = settings.max_particles();

        WebGame {
            state,
            settings,
            audio,
            last_time: None,
            pending_pause: false,
            idle_mode: false,
            unlocked: false,
        }
    }

    /// Advance one display frame and return the snapshot as JSON
    pub fn frame(&mut self, now_ms: f64, paddle_x: Option<f32>) -> String {
        let dt = match self.last_time {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => FRAME_MS,
        };
        self.last_time = Some(now_ms);

        let input = TickInput {
            paddle_x,
            pause: std::mem::take(&mut self.pending_pause),
            idle_mode: self.idle_mode,
        };
        tick(&mut self.state, &input, dt);
        if !self.settings.trails {
            self.state.clear_trails();
        }

        for event in &self.state.events {
            match event {
                GameEvent::Sound(cue) => self.audio.play(*cue),
                GameEvent::GameOver { final_score } => {
                    self.audio.stop_ambient();
                    log::info!("Final score: {final_score}");
                }
                _ => {}
            }
        }

        serde_json::to_string(&self.state.snapshot()).unwrap_or_default()
    }

    /// First click/tap/key: browsers only allow audio after a user gesture
    pub fn first_interaction(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;
        self.audio.resume();
        if self.settings.bgm_enabled && self.state.phase != GamePhase::GameOver {
            self.audio.start_ambient();
        }
    }

    /// Toggle pause on the next frame
    pub fn toggle_pause(&mut self) {
        self.pending_pause = !self.pending_pause;
    }

    /// Let the autopilot drive the paddle (attract mode)
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    /// Start a fresh run
    pub fn restart(&mut self, seed: Option<f64>) {
        self.state = GameState::new(seed_or_now(seed));
        self.state.particle_cap = self.settings.max_particles();
        self.last_time = None;
        self.pending_pause = false;
        if self.unlocked && self.settings.bgm_enabled {
            self.audio.start_ambient();
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    /// Final score once the run has ended
    pub fn final_score(&self) -> Option<f64> {
        self.is_game_over().then_some(self.state.score as f64)
    }

    pub fn settings_json(&self) -> String {
        self.settings.to_json().unwrap_or_default()
    }

    /// Replace settings from JSON, persisting them. Returns false on bad input.
    pub fn apply_settings_json(&mut self, json: &str) -> bool {
        match Settings::from_json(json) {
            Ok(settings) => {
                self.audio.apply_settings(&settings);
                self.state.particle_cap = settings.max_particles();
                if self.unlocked && settings.bgm_enabled && !self.is_game_over() {
                    self.audio.start_ambient();
                }
                settings.save();
                self.settings = settings;
                true
            }
            Err(e) => {
                log::warn!("Rejected settings: {e}");
                false
            }
        }
    }
}
