use crate::hud::HudText;
use crate::time::TimeManager;
use rhythm_common::core::Outcome;
use rhythm_common::{GameConfig, KeyMap, Session, SubscriptionId, TickResult};
use wasm_bindgen::prelude::*;

mod hud;
mod time;

// For logging to JS console
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Lane for a raw column coming from JS; negative values never match.
fn lane(column: i32) -> Option<usize> {
    usize::try_from(column).ok()
}

/// One rendered frame, handed to the JS renderer.
#[wasm_bindgen]
pub struct Frame {
    elapsed: f64,
    missed: usize,
    positions: Vec<f32>,
}

#[wasm_bindgen]
impl Frame {
    #[wasm_bindgen(getter)]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Notes missed during this frame.
    #[wasm_bindgen(getter)]
    pub fn missed(&self) -> usize {
        self.missed
    }

    /// `[x0, y0, x1, y1, ...]` in clip space.
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f32> {
        self.positions.clone()
    }
}

impl Frame {
    fn new(elapsed: f64, result: &TickResult) -> Self {
        Self {
            elapsed,
            missed: result.missed,
            positions: result.flat_positions(),
        }
    }
}

/// Browser-side game session: owns the clock and the key bindings, and
/// forwards frames and keypresses to the engine.
#[wasm_bindgen]
pub struct Game {
    session: Session,
    keys: KeyMap,
    time: TimeManager,
    hud_listener: Option<SubscriptionId>,
}

#[wasm_bindgen]
impl Game {
    /// Create a game from a config object, or the demo song when `config`
    /// is `undefined`/`null`. The clock starts paused.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Game, JsValue> {
        init_logging();
        let config: GameConfig = if config.is_undefined() || config.is_null() {
            GameConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| js_err(format!("Failed to parse config: {}", e)))?
        };
        Self::from_config(config)
    }

    /// Fetch a JSON or YAML config (picked by URL extension) and create a
    /// game from it.
    pub async fn load(url: String) -> Result<Game, JsValue> {
        init_logging();
        let window = web_sys::window().ok_or("no window")?;
        let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(&url)).await?;
        let resp: web_sys::Response = resp_value.dyn_into()?;

        if !resp.ok() {
            return Err(JsValue::from_str(&format!(
                "Fetch failed: {}",
                resp.status_text()
            )));
        }

        let text = wasm_bindgen_futures::JsFuture::from(resp.text()?)
            .await?
            .as_string()
            .ok_or("config is not text")?;
        let config = if url.ends_with(".yml") || url.ends_with(".yaml") {
            GameConfig::from_yaml_str(&text)
        } else {
            GameConfig::from_json_str(&text)
        }
        .map_err(|e| js_err(format!("Failed to parse config {}: {:#}", url, e)))?;

        Self::from_config(config)
    }

    pub fn start(&mut self) {
        self.time.resume();
    }

    pub fn pause(&mut self) {
        self.time.pause();
    }

    pub fn resume(&mut self) {
        self.time.resume();
    }

    pub fn paused(&self) -> bool {
        self.time.paused()
    }

    /// Back to song time 0 with every note pending.
    pub fn restart(&mut self) {
        self.session.restart();
        self.time.reset();
    }

    /// Current song time in milliseconds.
    pub fn elapsed(&self) -> f64 {
        self.time.now()
    }

    /// Advance to the wall clock. Call once per animation frame.
    pub fn tick(&mut self) -> Frame {
        self.tick_at(self.time.now())
    }

    /// Advance to an externally supplied time.
    pub fn tick_at(&mut self, elapsed_ms: f64) -> Frame {
        let result = self.session.tick(elapsed_ms);
        Frame::new(elapsed_ms, &result)
    }

    /// Handle a `keydown` event's `key`. Returns `undefined` for unmapped
    /// keys, otherwise the serialized outcome.
    pub fn key_down(&mut self, key: &str) -> Result<JsValue, JsValue> {
        let Some(column) = self.keys.column(key) else {
            return Ok(JsValue::UNDEFINED);
        };
        let outcome = self.session.on_key_press(column, self.time.now());
        to_js(&outcome)
    }

    /// Press `column` at an externally supplied time.
    pub fn press_at(&mut self, column: i32, elapsed_ms: f64) -> Result<JsValue, JsValue> {
        let outcome = match lane(column) {
            Some(column) => self.session.on_key_press(column, elapsed_ms),
            None => Outcome::NoTarget,
        };
        to_js(&outcome)
    }

    /// Call `callback(hud)` with fresh HUD text after every score change,
    /// replacing any previous callback.
    pub fn on_hud_change(&mut self, callback: js_sys::Function) {
        if let Some(id) = self.hud_listener.take() {
            self.session.unsubscribe(id);
        }
        let id = self.session.subscribe(move |state| {
            let hud = HudText::from_state(state);
            match serde_wasm_bindgen::to_value(&hud) {
                Ok(value) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                        log::warn!("HUD callback failed: {:?}", e);
                    }
                }
                Err(e) => log::warn!("Failed to serialize HUD: {}", e),
            }
        });
        self.hud_listener = Some(id);
    }

    pub fn hud(&self) -> Result<JsValue, JsValue> {
        to_js(&HudText::from_state(self.session.state()))
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.state())
    }

    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.summary())
    }

    pub fn finished(&self) -> bool {
        self.session.is_finished()
    }

    pub fn columns(&self) -> usize {
        self.session.columns()
    }

    /// Clip-space X of each lane's target, for drawing the target row.
    pub fn target_xs(&self) -> Vec<f32> {
        let layout = self.session.projector().layout;
        (0..self.session.columns())
            .map(|c| layout.column_x(c) as f32)
            .collect()
    }

    /// Clip-space Y of the target row.
    pub fn target_y(&self) -> f32 {
        self.session.projector().layout.base_y as f32
    }
}

impl Game {
    fn from_config(config: GameConfig) -> Result<Game, JsValue> {
        let session = Session::new(&config).map_err(|e| js_err(format!("{:#}", e)))?;
        console_log!(
            "Game Initialized: {} notes, {} columns",
            session.notes().len(),
            session.columns()
        );

        let mut time = TimeManager::new();
        time.pause();

        Ok(Game {
            session,
            keys: config.keys,
            time,
            hud_listener: None,
        })
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| js_err(format!("Failed to serialize: {}", e)))
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // Already installed when a second game is created
    let _ = console_log::init_with_level(log::Level::Debug);
}
