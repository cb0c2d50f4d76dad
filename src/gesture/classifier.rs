use crate::control::{Mode, SwipeDirection};
use crate::data::GestureParams;
use super::landmarks::{Finger, HandFrame};

/// Everything one detector frame can say to the mode controller.
///
/// `Default` is the "no hand" output: no events, no continuous signals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierOutput {
    /// Fist or open classification; present on every frame with a hand
    pub tree_state: Option<Mode>,
    pub focus_requested: bool,
    pub swipe: Option<SwipeDirection>,
    pub rotation_delta: Option<f32>,
    /// Normalized vertical hand position in [-1, 1]
    pub zoom_signal: Option<f32>,
}

impl ClassifierOutput {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Pose features extracted from a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandFeatures {
    /// Index, middle, ring, pinky
    pub extended: [bool; 4],
    pub is_fist: bool,
    pub is_victory: bool,
    /// Reference point in image coordinates [0, 1]
    pub reference_x: f32,
    pub reference_y: f32,
}

impl HandFeatures {
    pub fn extract(frame: &HandFrame, min_extended_for_open: usize) -> Self {
        let mut extended = [false; 4];
        for (flag, finger) in extended.iter_mut().zip(Finger::ALL) {
            *flag = frame.is_extended(finger);
        }
        let count = extended.iter().filter(|e| **e).count();
        let [index, middle, ring, pinky] = extended;
        let reference = frame.reference_point();

        Self {
            extended,
            is_fist: count < min_extended_for_open,
            // Checked independently of the fist rule
            is_victory: index && middle && !ring && !pinky,
            reference_x: reference.x,
            reference_y: reference.y,
        }
    }

    /// Reference point mapped from [0, 1] to [-1, 1]
    pub fn normalized(&self) -> (f32, f32) {
        ((self.reference_x - 0.5) * 2.0, (self.reference_y - 0.5) * 2.0)
    }
}

/// Streaming classifier turning hand frames into debounced commands.
///
/// Timestamps are caller-supplied milliseconds so the classifier is
/// deterministic under test and never reads a wall clock.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    params: GestureParams,
    last_hand_x: Option<f32>,
    last_swipe_ms: Option<f64>,
    last_select_ms: Option<f64>,
}

impl GestureClassifier {
    pub fn new(params: GestureParams) -> Self {
        Self {
            params,
            last_hand_x: None,
            last_swipe_ms: None,
            last_select_ms: None,
        }
    }

    pub fn params(&self) -> &GestureParams {
        &self.params
    }

    pub fn last_hand_x(&self) -> Option<f32> {
        self.last_hand_x
    }

    /// Forget all rolling memory, e.g. after the detector restarts
    pub fn reset(&mut self) {
        self.last_hand_x = None;
        self.last_swipe_ms = None;
        self.last_select_ms = None;
    }

    /// Classify one detector frame. `None` means the detector saw no hand.
    pub fn classify(&mut self, frame: Option<&HandFrame>, now_ms: f64) -> ClassifierOutput {
        let Some(frame) = frame else {
            self.last_hand_x = None;
            return ClassifierOutput::default();
        };

        let features = HandFeatures::extract(frame, self.params.min_extended_for_open);
        let (nx, ny) = features.normalized();
        let mut output = ClassifierOutput {
            tree_state: Some(if features.is_fist { Mode::Formed } else { Mode::Scattered }),
            rotation_delta: Some(nx * self.params.rotation_gain),
            zoom_signal: Some(ny),
            ..ClassifierOutput::default()
        };

        if !features.is_victory {
            // A fresh victory pose starts a new baseline
            self.last_hand_x = None;
            return output;
        }

        if elapsed_since(self.last_select_ms, now_ms) > self.params.select_cooldown_ms {
            output.focus_requested = true;
            self.last_select_ms = Some(now_ms);
            log::debug!("gesture: select at {:.0}ms", now_ms);
        }

        let x = features.reference_x;
        if let Some(last_x) = self.last_hand_x {
            let dx = x - last_x;
            if dx.abs() > self.params.swipe_threshold
                && elapsed_since(self.last_swipe_ms, now_ms) > self.params.swipe_cooldown_ms
            {
                let direction = SwipeDirection::from_dx(dx);
                output.swipe = Some(direction);
                self.last_swipe_ms = Some(now_ms);
                log::debug!("gesture: swipe {:?} (dx {:.3})", direction, dx);
            }
        }
        self.last_hand_x = Some(x);

        output
    }
}

/// Milliseconds since `last`, infinite when nothing has fired yet
fn elapsed_since(last: Option<f64>, now_ms: f64) -> f64 {
    last.map_or(f64::INFINITY, |t| now_ms - t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::landmarks::fixtures::{fist, hand, open, victory};

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(GestureParams::default())
    }

    #[test]
    fn test_no_hand_emits_nothing() {
        let mut c = classifier();
        let out = c.classify(None, 0.0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_fist_forms_open_scatters() {
        let mut c = classifier();
        assert_eq!(c.classify(Some(&fist(0.5, 0.5)), 0.0).tree_state, Some(Mode::Formed));
        assert_eq!(c.classify(Some(&open(0.5, 0.5)), 33.0).tree_state, Some(Mode::Scattered));
    }

    #[test]
    fn test_single_finger_is_still_a_fist() {
        let mut c = classifier();
        let pointing = hand(0.5, 0.5, [true, false, false, false]);
        assert_eq!(c.classify(Some(&pointing), 0.0).tree_state, Some(Mode::Formed));
    }

    #[test]
    fn test_victory_is_independent_of_fist_rule() {
        let frame = victory(0.5, 0.5);
        let features = HandFeatures::extract(&frame, 2);
        assert!(features.is_victory);
        assert!(!features.is_fist);
        assert_eq!(features.extended, [true, true, false, false]);

        // A stricter open threshold makes the same pose a fist and a victory at once
        let strict = HandFeatures::extract(&frame, 3);
        assert!(strict.is_victory);
        assert!(strict.is_fist);
    }

    #[test]
    fn test_select_debounced_to_one_per_window() {
        let mut c = classifier();
        let frame = victory(0.5, 0.5);
        let mut fired = Vec::new();
        let mut t = 0.0;
        while t < 3000.0 {
            if c.classify(Some(&frame), t).focus_requested {
                fired.push(t);
            }
            t += 33.0;
        }
        assert_eq!(fired[0], 0.0);
        assert!(fired.len() >= 3);
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] > 800.0);
        }
    }

    #[test]
    fn test_select_requires_victory() {
        let mut c = classifier();
        assert!(!c.classify(Some(&open(0.5, 0.5)), 0.0).focus_requested);
        assert!(!c.classify(Some(&fist(0.5, 0.5)), 900.0).focus_requested);
    }

    #[test]
    fn test_swipe_right_fires_once() {
        let mut c = classifier();
        c.classify(Some(&victory(0.30, 0.5)), 0.0);
        let first = c.classify(Some(&victory(0.40, 0.5)), 100.0);
        assert_eq!(first.swipe, Some(SwipeDirection::Right));

        // Held still: baseline updated, nothing fires
        assert_eq!(c.classify(Some(&victory(0.40, 0.5)), 650.0).swipe, None);
        assert!((c.last_hand_x().unwrap() - 0.40).abs() < 1e-6);

        let out = c.classify(Some(&victory(0.45, 0.5)), 750.0);
        assert_eq!(out.swipe, Some(SwipeDirection::Right));
    }

    #[test]
    fn test_small_motion_is_not_a_swipe() {
        let mut c = classifier();
        c.classify(Some(&victory(0.40, 0.5)), 0.0);
        assert_eq!(c.classify(Some(&victory(0.41, 0.5)), 600.0).swipe, None);
    }

    #[test]
    fn test_swipe_left_and_cooldown() {
        let mut c = classifier();
        c.classify(Some(&victory(0.60, 0.5)), 0.0);
        assert_eq!(c.classify(Some(&victory(0.50, 0.5)), 33.0).swipe, Some(SwipeDirection::Left));
        // Within 500ms of the last swipe
        assert_eq!(c.classify(Some(&victory(0.40, 0.5)), 66.0).swipe, None);
        // Baseline still advanced during the cooldown
        assert!((c.last_hand_x().unwrap() - 0.40).abs() < 1e-6);
        assert_eq!(c.classify(Some(&victory(0.30, 0.5)), 600.0).swipe, Some(SwipeDirection::Left));
    }

    #[test]
    fn test_swipe_ignored_outside_victory() {
        let mut c = classifier();
        c.classify(Some(&open(0.2, 0.5)), 0.0);
        assert_eq!(c.classify(Some(&open(0.8, 0.5)), 33.0).swipe, None);
        assert_eq!(c.last_hand_x(), None);
    }

    #[test]
    fn test_baseline_cleared_when_pose_drops() {
        let mut c = classifier();
        c.classify(Some(&victory(0.2, 0.5)), 0.0);
        c.classify(Some(&open(0.5, 0.5)), 33.0);
        // Re-entering victory far away must not read as a swipe
        assert_eq!(c.classify(Some(&victory(0.8, 0.5)), 66.0).swipe, None);

        c.classify(None, 99.0);
        assert_eq!(c.last_hand_x(), None);
    }

    #[test]
    fn test_continuous_signals() {
        let mut c = classifier();
        let out = c.classify(Some(&open(0.75, 0.25)), 0.0);
        let rotation = out.rotation_delta.unwrap();
        let zoom = out.zoom_signal.unwrap();
        assert!((rotation - 0.5 * 0.8).abs() < 1e-5);
        assert!((zoom + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_reset_clears_memory() {
        let mut c = classifier();
        c.classify(Some(&victory(0.5, 0.5)), 0.0);
        c.reset();
        assert_eq!(c.last_hand_x(), None);
        assert!(c.classify(Some(&victory(0.5, 0.5)), 10.0).focus_requested);
    }
}
