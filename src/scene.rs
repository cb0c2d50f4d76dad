//! The whole sculpture: particle groups, input, mode state and camera, advanced once per frame.

use crate::control::{CameraRig, InteractionState, Mode, ModeController, SwipeDirection};
use crate::data::{PhotoList, SceneConfig};
use crate::error::SceneError;
use crate::generation::ConfigurationGenerator;
use crate::gesture::{
    ClassifierOutput, DetectorStatus, GestureClassifier, HandSource, LatestFrameSlot,
};
use crate::particles::{FocusOverride, GroupKind, InterpolationEngine, ParticleGroup};

/// Scene state for one render surface.
///
/// Frame order inside [`tick`](Scene::tick): poll the detector, classify,
/// update the controller, retarget the focused ornament, blend the particles,
/// move the camera. The render sink reads buffers only after `tick` returns.
pub struct Scene {
    config: SceneConfig,
    generator: ConfigurationGenerator,
    groups: Vec<ParticleGroup>,
    engine: InterpolationEngine,
    classifier: GestureClassifier,
    controller: ModeController,
    camera: CameraRig,
    photos: PhotoList,
    /// Frames pushed by the host (JavaScript)
    host_slot: LatestFrameSlot,
    /// A detector owned by the scene; replaces the host slot while attached
    attached: Option<Box<dyn HandSource>>,
    last_output: ClassifierOutput,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let generator = ConfigurationGenerator::new(&config);
        let photos = PhotoList::default();

        let groups = GroupKind::ALL
            .iter()
            .map(|&kind| {
                let layout = match kind {
                    GroupKind::Photos => generator.generate_photos(&photos),
                    _ => generator.generate(kind, config.counts.count(kind)),
                };
                ParticleGroup::new(kind, layout, config.motion.policy(kind))
            })
            .collect();

        let scene = Self {
            groups,
            engine: InterpolationEngine::new(),
            classifier: GestureClassifier::new(config.gesture),
            controller: ModeController::new(config.slideshow.interval_secs, config.autopilot_interval),
            camera: CameraRig::new(config.camera),
            photos,
            host_slot: LatestFrameSlot::new(),
            attached: None,
            last_output: ClassifierOutput::default(),
            generator,
            config,
        };
        log::info!("scene ready with {} particles", scene.particle_count());
        Ok(scene)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, SceneError> {
        Self::new(SceneConfig::from_yaml(yaml)?)
    }

    /// Advance everything by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let now_ms = f64::from(self.engine.time() + dt) * 1000.0;

        self.poll_gestures(now_ms);
        self.controller.update(dt);
        self.update_focus();

        let mode = self.controller.mode();
        self.engine.tick(dt, mode, &mut self.groups);
        self.camera.update(dt, self.controller.state());
    }

    fn poll_gestures(&mut self, now_ms: f64) {
        let source: &mut dyn HandSource = match self.attached.as_deref_mut() {
            Some(source) => source,
            None => &mut self.host_slot,
        };

        // At most one classification per detector frame
        if let Some(detection) = source.latest_frame() {
            let output = self.classifier.classify(detection.hand(), now_ms);
            self.controller.apply(&output);
            self.last_output = output;
        }

        let available = source.status().is_running();
        if available != self.controller.gesture_available() {
            if !available {
                log::info!("gesture control unavailable, autopilot takes over");
                self.classifier.reset();
            }
            self.controller.set_gesture_available(available);
        }
    }

    /// Point the focus override at the ornament showing the selected photo
    fn update_focus(&mut self) {
        let selected = match (self.controller.focus_active(), self.controller.selected_index()) {
            (true, Some(selected)) => Some(selected),
            _ => None,
        };
        let position = self.config.slideshow.focus_point;
        let scale = self.config.slideshow.focus_scale;

        let photos = self.group_mut(GroupKind::Photos);
        let focus = selected
            .and_then(|photo| photos.ornament_for_photo(photo))
            .map(|index| FocusOverride { index, position, scale });
        photos.set_focus(focus);
    }

    // === Command surface ===

    pub fn set_mode(&mut self, mode: Mode) {
        self.controller.set_mode(mode);
    }

    pub fn request_focus(&mut self) {
        self.controller.request_focus();
    }

    pub fn swipe(&mut self, direction: SwipeDirection) {
        self.controller.swipe(direction);
    }

    pub fn set_rotation(&mut self, speed: f32) {
        self.controller.set_rotation(speed);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.controller.set_zoom(zoom);
    }

    // === Photos ===

    /// Replace the photo list and rebuild the photo ornaments
    pub fn set_photos(&mut self, photos: PhotoList) {
        let layout = self.generator.generate_photos(&photos);
        self.controller.set_photos(&photos);
        self.photos = photos;
        self.group_mut(GroupKind::Photos).replace_layout(layout);
        self.update_focus();
    }

    pub fn set_photo_count(&mut self, count: usize) {
        self.set_photos(PhotoList::with_count(count));
    }

    pub fn photos(&self) -> &PhotoList {
        &self.photos
    }

    /// Identifier of the photo currently selected for the slideshow
    pub fn selected_photo(&self) -> Option<&str> {
        self.controller
            .selected_index()
            .and_then(|index| self.photos.get(index))
    }

    // === Hand input ===

    /// Host-side detector output as a flat `[x, y, z] * 21` array.
    /// Anything else counts as "no hand".
    pub fn push_hand_landmarks(&mut self, values: &[f32]) {
        self.host_slot.publish_flat(values);
    }

    /// The host detector ran and found no hand
    pub fn clear_hand(&mut self) {
        self.host_slot.publish(crate::gesture::Detection::NoHand);
    }

    /// Hand a detector to the scene; it is polled instead of the host slot
    pub fn attach_source(&mut self, source: Box<dyn HandSource>) {
        if let Some(mut previous) = self.attached.replace(source) {
            previous.shutdown();
        }
        self.classifier.reset();
    }

    /// The detector could not start or stopped delivering frames
    pub fn detector_failed(&mut self, reason: &str) {
        let error = SceneError::Detector(reason.to_string());
        if let Some(mut source) = self.attached.take() {
            source.shutdown();
        }
        self.host_slot.fail(error);
        self.controller.set_gesture_available(false);
        self.classifier.reset();
    }

    /// Stop gesture input and release detector resources
    pub fn release_detector(&mut self) {
        if let Some(mut source) = self.attached.take() {
            source.shutdown();
        }
        self.host_slot.shutdown();
        self.controller.set_gesture_available(false);
        self.classifier.reset();
        log::info!("hand detector released");
    }

    pub fn detector_status(&self) -> DetectorStatus {
        match &self.attached {
            Some(source) => source.status(),
            None => self.host_slot.status(),
        }
    }

    pub fn gesture_available(&self) -> bool {
        self.controller.gesture_available()
    }

    /// Result of the most recent classification
    pub fn last_gesture(&self) -> &ClassifierOutput {
        &self.last_output
    }

    // === Render sink ===

    pub fn groups(&self) -> &[ParticleGroup] {
        &self.groups
    }

    pub fn group(&self, kind: GroupKind) -> &ParticleGroup {
        &self.groups[group_slot(kind)]
    }

    fn group_mut(&mut self, kind: GroupKind) -> &mut ParticleGroup {
        &mut self.groups[group_slot(kind)]
    }

    pub fn particle_count(&self) -> usize {
        self.groups.iter().map(ParticleGroup::len).sum()
    }

    pub fn state(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn time(&self) -> f32 {
        self.engine.time()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        if let Some(mut source) = self.attached.take() {
            source.shutdown();
        }
    }
}

/// Groups are stored in `GroupKind::ALL` order
fn group_slot(kind: GroupKind) -> usize {
    GroupKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or_default()
}
