//! Hand-gesture input: landmark frames, the streaming classifier and detector sources.

mod landmarks;
mod classifier;
mod source;

pub use landmarks::{Finger, HandFrame, HandLandmark, LANDMARK_COUNT, LANDMARK_STRIDE};
pub use classifier::{ClassifierOutput, GestureClassifier, HandFeatures};
pub use source::{Detection, DetectorStatus, HandSource, LatestFrameSlot};

#[cfg(not(target_arch = "wasm32"))]
pub use source::{spawn_detector, LandmarkDetector, ThreadedHandSource};

#[cfg(test)]
pub(crate) use landmarks::fixtures;
