use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod control;
pub mod data;
pub mod error;
pub mod generation;
pub mod gesture;
pub mod logging;
pub mod math;
pub mod particles;
pub mod scene;

pub use control::{Mode, SwipeDirection};
pub use data::{PhotoList, SceneConfig};
pub use error::SceneError;
pub use particles::GroupKind;
pub use scene::Scene;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Change the console log level ("error", "warn", "info", "debug", "trace")
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logging::init(logging::parse_level(level));
}

fn to_js(e: SceneError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Engine object exposed to JavaScript.
///
/// The page owns the canvas, the camera feed and the hand-landmark model. Each
/// animation frame it pushes the latest landmarks (or reports no hand), calls
/// `tick`, then uploads the buffers of every group to the GPU.
#[wasm_bindgen]
pub struct GestureTree {
    scene: Scene,
}

#[wasm_bindgen]
impl GestureTree {
    /// Create the scene from an optional YAML config
    #[wasm_bindgen(constructor)]
    pub fn new(config_yaml: Option<String>) -> Result<GestureTree, JsValue> {
        let config = match config_yaml {
            Some(yaml) if !yaml.trim().is_empty() => SceneConfig::from_yaml(&yaml).map_err(to_js)?,
            _ => SceneConfig::default(),
        };
        let scene = Scene::new(config).map_err(to_js)?;
        Ok(Self { scene })
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.scene.tick(dt);
    }

    // === Commands ===

    /// 0 = scattered, 1 = formed
    pub fn set_mode(&mut self, mode: u32) {
        self.scene.set_mode(Mode::from_code(mode));
    }

    pub fn get_mode(&self) -> u32 {
        self.scene.mode().code()
    }

    pub fn toggle_mode(&mut self) {
        let next = self.scene.mode().toggled();
        self.scene.set_mode(next);
    }

    pub fn request_focus(&mut self) {
        self.scene.request_focus();
    }

    /// Positive steps to the next photo, negative to the previous
    pub fn swipe(&mut self, direction: f32) {
        if direction != 0.0 && direction.is_finite() {
            self.scene.swipe(SwipeDirection::from_dx(direction));
        }
    }

    pub fn set_rotation(&mut self, speed: f32) {
        self.scene.set_rotation(speed);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.scene.set_zoom(zoom);
    }

    pub fn is_focus_active(&self) -> bool {
        self.scene.state().focus_active
    }

    // === Photos ===

    pub fn set_photo_count(&mut self, count: usize) {
        self.scene.set_photo_count(count);
    }

    pub fn set_photos(&mut self, ids: Vec<String>) {
        self.scene.set_photos(PhotoList::new(ids));
    }

    /// Photo index shown on each ornament of the "photos" group
    pub fn photo_bindings(&self) -> Vec<u32> {
        self.scene
            .group(GroupKind::Photos)
            .layout()
            .photo_bindings
            .iter()
            .map(|&photo| photo as u32)
            .collect()
    }

    pub fn selected_photo(&self) -> Option<String> {
        self.scene.selected_photo().map(str::to_string)
    }

    // === Hand detector ===

    /// Latest detector output: 21 landmarks as `[x, y, z, ...]`
    pub fn push_hand_landmarks(&mut self, landmarks: &[f32]) {
        self.scene.push_hand_landmarks(landmarks);
    }

    pub fn clear_hand(&mut self) {
        self.scene.clear_hand();
    }

    /// The camera or model could not be used; gesture control turns off
    pub fn detector_failed(&mut self, reason: &str) {
        self.scene.detector_failed(reason);
    }

    pub fn release_detector(&mut self) {
        self.scene.release_detector();
    }

    pub fn is_gesture_available(&self) -> bool {
        self.scene.gesture_available()
    }

    // === Render sink ===

    pub fn group_names(&self) -> Vec<String> {
        GroupKind::ALL.iter().map(|k| k.name().to_string()).collect()
    }

    pub fn particle_count(&self, group: &str) -> Result<usize, JsValue> {
        Ok(self.group(group)?.len())
    }

    /// Display positions, `[x, y, z] * count`
    pub fn positions(&self, group: &str) -> Result<Float32Array, JsValue> {
        Ok(Float32Array::from(self.group(group)?.positions()))
    }

    pub fn colors(&self, group: &str) -> Result<Float32Array, JsValue> {
        Ok(Float32Array::from(self.group(group)?.colors()))
    }

    pub fn scales(&self, group: &str) -> Result<Float32Array, JsValue> {
        Ok(Float32Array::from(self.group(group)?.scales()))
    }

    /// Euler angles, `[x, y, z] * count`
    pub fn rotations(&self, group: &str) -> Result<Float32Array, JsValue> {
        Ok(Float32Array::from(self.group(group)?.rotations()))
    }

    pub fn camera_position(&self) -> Float32Array {
        Float32Array::from(&self.scene.camera().position().to_array()[..])
    }

    pub fn time(&self) -> f32 {
        self.scene.time()
    }
}

impl GestureTree {
    fn group(&self, name: &str) -> Result<&particles::ParticleGroup, JsValue> {
        GroupKind::from_name(name)
            .map(|kind| self.scene.group(kind))
            .ok_or_else(|| JsValue::from_str(&format!("Unknown particle group: {}", name)))
    }
}
