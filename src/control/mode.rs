use crate::data::PhotoList;
use crate::gesture::ClassifierOutput;
use super::autopilot::Autopilot;

/// Which target configuration the particles converge to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Scattered,
    #[default]
    Formed,
}

impl Mode {
    pub const SCATTERED_CODE: u32 = 0;
    pub const FORMED_CODE: u32 = 1;

    /// Decode a mode coming from outside the crate.
    ///
    /// Unknown codes are a caller bug: they panic in debug builds and fall
    /// back to `Formed` in release builds.
    pub fn from_code(code: u32) -> Self {
        match code {
            Self::SCATTERED_CODE => Mode::Scattered,
            Self::FORMED_CODE => Mode::Formed,
            other => {
                debug_assert!(false, "invalid mode code {}", other);
                log::warn!("invalid mode code {}, using formed", other);
                Mode::Formed
            }
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Mode::Scattered => Self::SCATTERED_CODE,
            Mode::Formed => Self::FORMED_CODE,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Scattered => Mode::Formed,
            Mode::Formed => Mode::Scattered,
        }
    }
}

/// Horizontal swipe through the photo slideshow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Previous photo
    Left,
    /// Next photo
    Right,
}

impl SwipeDirection {
    pub fn from_dx(dx: f32) -> Self {
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    }
}

/// The single authoritative interaction state
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub mode: Mode,
    pub focus_active: bool,
    /// Slideshow position; only meaningful while the photo list is non-empty
    pub selected_index: usize,
    /// Orbit speed in rad/s
    pub rotation_speed: f32,
    /// Camera zoom in [-1, 1]
    pub zoom_delta: f32,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: Mode::Formed,
            focus_active: false,
            selected_index: 0,
            rotation_speed: 0.0,
            zoom_delta: 0.0,
        }
    }
}

/// Owns [`InteractionState`] and applies every transition to it.
///
/// Gesture events and UI commands go through the same methods, so the
/// "forming the tree exits focus" rule holds no matter where a command
/// comes from.
#[derive(Debug, Clone)]
pub struct ModeController {
    state: InteractionState,
    photo_count: usize,
    slideshow_interval: f32,
    slideshow_elapsed: f32,
    autopilot: Autopilot,
    gesture_available: bool,
}

impl ModeController {
    pub fn new(slideshow_interval: f32, autopilot_interval: Option<f32>) -> Self {
        Self {
            state: InteractionState::default(),
            photo_count: 0,
            slideshow_interval,
            slideshow_elapsed: 0.0,
            autopilot: Autopilot::new(autopilot_interval),
            gesture_available: true,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn focus_active(&self) -> bool {
        self.state.focus_active
    }

    /// Selected photo, or None while the photo list is empty
    pub fn selected_index(&self) -> Option<usize> {
        if self.photo_count == 0 {
            None
        } else {
            Some(self.state.selected_index)
        }
    }

    // === Command surface ===

    /// Set the mode directly. Forming the tree always leaves focus.
    pub fn set_mode(&mut self, mode: Mode) {
        self.apply_mode(mode);
        self.autopilot.restart();
    }

    /// Enter focus (slideshow) view; never changes the mode
    pub fn request_focus(&mut self) {
        if !self.state.focus_active {
            self.slideshow_elapsed = 0.0;
        }
        self.state.focus_active = true;
    }

    /// Step the selection; a no-op while the photo list is empty
    pub fn swipe(&mut self, direction: SwipeDirection) {
        match direction {
            SwipeDirection::Right => self.step_selection(1),
            SwipeDirection::Left => self.step_selection(-1),
        }
    }

    pub fn set_rotation(&mut self, speed: f32) {
        if speed.is_finite() {
            self.state.rotation_speed = speed;
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.state.zoom_delta = zoom.clamp(-1.0, 1.0);
        }
    }

    // === Inputs ===

    /// Apply one classifier result. Mode is applied before focus so a frame
    /// cannot leave focus set after it formed the tree in the same call.
    pub fn apply(&mut self, output: &ClassifierOutput) {
        if let Some(mode) = output.tree_state {
            self.apply_mode(mode);
        }
        if output.focus_requested {
            self.request_focus();
        }
        if let Some(direction) = output.swipe {
            self.swipe(direction);
        }
        if let Some(rotation) = output.rotation_delta {
            self.set_rotation(rotation);
        }
        if let Some(zoom) = output.zoom_signal {
            self.set_zoom(zoom);
        }
    }

    /// Photo list changed length; keeps the selection in range
    pub fn set_photos(&mut self, photos: &PhotoList) {
        self.photo_count = photos.len();
        if self.photo_count > 0 {
            self.state.selected_index %= self.photo_count;
        }
    }

    /// Gesture control lost or regained; the autopilot only runs without it
    pub fn set_gesture_available(&mut self, available: bool) {
        if self.gesture_available != available {
            self.autopilot.restart();
        }
        self.gesture_available = available;
    }

    pub fn gesture_available(&self) -> bool {
        self.gesture_available
    }

    /// Advance the slideshow and autopilot timers
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.state.focus_active && self.photo_count > 0 {
            self.slideshow_elapsed += dt;
            let steps = (self.slideshow_elapsed / self.slideshow_interval).floor();
            if steps >= 1.0 {
                // Large dt catches up in one step; only the count mod len matters
                self.slideshow_elapsed %= self.slideshow_interval;
                let advance = steps % self.photo_count as f32;
                self.step_selection(if advance.is_finite() { advance as isize } else { 0 });
            }
        }

        if !self.gesture_available && self.autopilot.advance(dt) {
            let next = self.state.mode.toggled();
            log::debug!("autopilot switching to {:?}", next);
            self.apply_mode(next);
        }
    }

    fn apply_mode(&mut self, mode: Mode) {
        if mode == Mode::Formed {
            self.state.focus_active = false;
        }
        self.state.mode = mode;
    }

    fn step_selection(&mut self, step: isize) {
        if self.photo_count == 0 {
            return;
        }
        let n = self.photo_count as isize;
        let index = (self.state.selected_index as isize + step).rem_euclid(n);
        self.state.selected_index = index as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_with_photos(count: usize) -> ModeController {
        let mut controller = ModeController::new(4.0, None);
        controller.set_photos(&PhotoList::with_count(count));
        controller
    }

    #[test]
    fn test_defaults() {
        let controller = ModeController::new(4.0, None);
        assert_eq!(controller.mode(), Mode::Formed);
        assert!(!controller.focus_active());
        assert_eq!(controller.state().selected_index, 0);
        assert_eq!(controller.selected_index(), None);
    }

    #[test]
    fn test_forming_exits_focus() {
        let mut controller = controller_with_photos(3);
        controller.set_mode(Mode::Scattered);
        controller.request_focus();
        assert!(controller.focus_active());

        controller.set_mode(Mode::Formed);
        assert!(!controller.focus_active());
    }

    #[test]
    fn test_formed_while_formed_still_exits_focus() {
        let mut controller = controller_with_photos(3);
        controller.request_focus();
        assert!(controller.focus_active());
        controller.apply(&ClassifierOutput {
            tree_state: Some(Mode::Formed),
            ..Default::default()
        });
        assert!(!controller.focus_active());
    }

    #[test]
    fn test_focus_does_not_change_mode() {
        let mut controller = controller_with_photos(3);
        controller.set_mode(Mode::Scattered);
        controller.request_focus();
        assert_eq!(controller.mode(), Mode::Scattered);
    }

    #[test]
    fn test_scattering_keeps_focus() {
        let mut controller = controller_with_photos(3);
        controller.set_mode(Mode::Scattered);
        controller.request_focus();
        controller.set_mode(Mode::Scattered);
        assert!(controller.focus_active());
    }

    #[test]
    fn test_swipe_wraps() {
        let mut controller = controller_with_photos(3);
        controller.swipe(SwipeDirection::Left);
        assert_eq!(controller.selected_index(), Some(2));
        controller.swipe(SwipeDirection::Right);
        controller.swipe(SwipeDirection::Right);
        assert_eq!(controller.selected_index(), Some(1));
    }

    #[test]
    fn test_empty_photo_list_noops() {
        let mut controller = controller_with_photos(0);
        controller.request_focus();
        controller.swipe(SwipeDirection::Right);
        controller.swipe(SwipeDirection::Left);
        controller.update(100.0);
        assert_eq!(controller.state().selected_index, 0);
        assert_eq!(controller.selected_index(), None);
    }

    #[test]
    fn test_slideshow_advances_only_while_focused() {
        let mut controller = controller_with_photos(5);
        controller.update(10.0);
        assert_eq!(controller.selected_index(), Some(0));

        controller.set_mode(Mode::Scattered);
        controller.request_focus();
        controller.update(3.9);
        assert_eq!(controller.selected_index(), Some(0));
        controller.update(0.2);
        assert_eq!(controller.selected_index(), Some(1));
        controller.update(8.0);
        assert_eq!(controller.selected_index(), Some(3));
    }

    #[test]
    fn test_swipe_keeps_timer_phase() {
        let mut controller = controller_with_photos(5);
        controller.set_mode(Mode::Scattered);
        controller.request_focus();
        controller.update(3.0);
        controller.swipe(SwipeDirection::Right);
        assert_eq!(controller.selected_index(), Some(1));
        // Timer fires one second later, not four
        controller.update(1.0);
        assert_eq!(controller.selected_index(), Some(2));
    }

    #[test]
    fn test_huge_dt_catches_up_in_one_step() {
        let mut controller = controller_with_photos(3);
        controller.request_focus();
        // 2.5e8 intervals; 2.5e8 mod 3 == 1
        controller.update(1.0e9);
        assert_eq!(controller.selected_index(), Some(1));
        assert!(controller.slideshow_elapsed < controller.slideshow_interval);

        // Timer keeps working normally afterwards
        controller.update(4.0);
        assert_eq!(controller.selected_index(), Some(2));
    }

    #[test]
    fn test_tiny_interval_does_not_stall() {
        let mut controller = ModeController::new(1.0e-30, None);
        controller.set_photos(&PhotoList::with_count(4));
        controller.request_focus();
        controller.update(1.0e9);
        controller.update(0.016);
        assert!(controller.selected_index().unwrap() < 4);
    }

    #[test]
    fn test_photo_shrink_clamps_selection() {
        let mut controller = controller_with_photos(5);
        controller.swipe(SwipeDirection::Left);
        assert_eq!(controller.selected_index(), Some(4));
        controller.set_photos(&PhotoList::with_count(3));
        assert_eq!(controller.selected_index(), Some(1));
        controller.set_photos(&PhotoList::default());
        assert_eq!(controller.selected_index(), None);
    }

    #[test]
    fn test_apply_continuous_signals() {
        let mut controller = controller_with_photos(0);
        controller.apply(&ClassifierOutput {
            rotation_delta: Some(0.4),
            zoom_signal: Some(3.0),
            ..Default::default()
        });
        assert_eq!(controller.state().rotation_speed, 0.4);
        assert_eq!(controller.state().zoom_delta, 1.0);

        // No hand: previous values hold
        controller.apply(&ClassifierOutput::default());
        assert_eq!(controller.state().rotation_speed, 0.4);
        assert_eq!(controller.state().zoom_delta, 1.0);
    }

    #[test]
    fn test_autopilot_only_without_gestures() {
        let mut controller = ModeController::new(4.0, Some(2.0));
        controller.update(5.0);
        assert_eq!(controller.mode(), Mode::Formed);

        controller.set_gesture_available(false);
        controller.update(2.5);
        assert_eq!(controller.mode(), Mode::Scattered);
        controller.update(2.0);
        assert_eq!(controller.mode(), Mode::Formed);
    }

    #[test]
    fn test_manual_mode_restarts_autopilot() {
        let mut controller = ModeController::new(4.0, Some(2.0));
        controller.set_gesture_available(false);
        controller.update(1.5);
        controller.set_mode(Mode::Scattered);
        controller.update(1.5);
        assert_eq!(controller.mode(), Mode::Scattered);
        controller.update(0.6);
        assert_eq!(controller.mode(), Mode::Formed);
    }

    #[test]
    fn test_mode_codes() {
        assert_eq!(Mode::from_code(0), Mode::Scattered);
        assert_eq!(Mode::from_code(1), Mode::Formed);
        assert_eq!(Mode::from_code(Mode::Scattered.code()), Mode::Scattered);
        assert_eq!(Mode::Formed.toggled(), Mode::Scattered);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_invalid_mode_code_panics_in_debug() {
        Mode::from_code(7);
    }

    #[test]
    fn test_swipe_direction_from_dx() {
        assert_eq!(SwipeDirection::from_dx(0.05), SwipeDirection::Right);
        assert_eq!(SwipeDirection::from_dx(-0.05), SwipeDirection::Left);
    }
}
