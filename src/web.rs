//! Browser bindings
//!
//! The page owns the render loop and the scene; it forwards key events and
//! frame deltas here and reads back the pose each frame.

use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::config::{DriveConfig, TrackConfig, TrackKind};
use crate::session::Session;
use crate::sim::ControlKey;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Loop Racer starting...");
}

#[wasm_bindgen]
pub struct WebSession {
    inner: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// `drive_json` overrides the default tuning; `track` is "street" or "layout"
    #[wasm_bindgen(constructor)]
    pub fn new(drive_json: Option<String>, track: &str) -> Result<WebSession, JsValue> {
        let kind = TrackKind::from_str(track)
            .ok_or_else(|| JsValue::from_str(&format!("unknown track kind: {track}")))?;
        let drive = match drive_json {
            Some(json) => DriveConfig::from_json(&json).map_err(to_js)?,
            None => DriveConfig::default(),
        };
        let inner = Session::new(drive, &TrackConfig::for_kind(kind)).map_err(to_js)?;
        Ok(WebSession { inner })
    }

    /// Returns true when the key drives the car; the default action is suppressed then
    pub fn key_down(&mut self, event: &KeyboardEvent) -> bool {
        let handled = self.inner.key_down(&event.key());
        if handled {
            event.prevent_default();
        }
        handled
    }

    pub fn key_up(&mut self, event: &KeyboardEvent) -> bool {
        let handled = self.inner.key_up(&event.key());
        if handled {
            event.prevent_default();
        }
        handled
    }

    /// Window blur: release everything
    pub fn blur(&mut self) {
        self.inner.release_all();
    }

    /// Advance by a frame delta in milliseconds; returns ticks run
    pub fn frame(&mut self, dt_ms: f64) -> u32 {
        self.inner.frame((dt_ms / 1000.0) as f32)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Brake held right now, for tail lights
    #[wasm_bindgen(getter)]
    pub fn braking(&self) -> bool {
        self.inner.held().contains(ControlKey::Brake)
    }

    // === Pose ===

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f32 {
        self.inner.pose().position.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f32 {
        self.inner.pose().position.y
    }

    #[wasm_bindgen(getter)]
    pub fn z(&self) -> f32 {
        self.inner.pose().position.z
    }

    #[wasm_bindgen(getter)]
    pub fn yaw(&self) -> f32 {
        self.inner.pose().yaw
    }

    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f32 {
        self.inner.speed()
    }

    #[wasm_bindgen(getter)]
    pub fn moving(&self) -> bool {
        self.inner.vehicle().is_moving()
    }

    // === Camera ===

    /// Camera position as [x, y, z]
    pub fn camera_position(&self) -> Vec<f32> {
        self.inner.camera().position.to_array().to_vec()
    }

    /// Camera look-at point as [x, y, z]
    pub fn camera_look_at(&self) -> Vec<f32> {
        self.inner.camera().look_at.to_array().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn orbit_enabled(&self) -> bool {
        self.inner.camera().orbit_enabled
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
