//! Authoritative interaction state and everything that mutates it:
//! mode transitions, the photo slideshow, the autopilot and the orbit camera.

mod mode;
mod autopilot;
mod camera;

pub use mode::{Mode, SwipeDirection, InteractionState, ModeController};
pub use autopilot::Autopilot;
pub use camera::CameraRig;
