//! Where hand frames come from.
//!
//! The landmark detector runs at its own pace (usually slower than the render
//! loop). A [`HandSource`] buffers only the newest result; the scene polls it
//! once per tick and classifies at most once per detector frame.

use crate::error::SceneError;
use super::landmarks::HandFrame;

/// One detector result
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Hand(HandFrame),
    NoHand,
}

impl Detection {
    pub fn hand(&self) -> Option<&HandFrame> {
        match self {
            Detection::Hand(frame) => Some(frame),
            Detection::NoHand => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectorStatus {
    Running,
    /// Capability lost; gesture control stays off until a new source is attached
    Failed(SceneError),
    /// Released by the owner
    Stopped,
}

impl DetectorStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, DetectorStatus::Running)
    }
}

pub trait HandSource {
    /// Newest detection not yet consumed. `None` means nothing new since the last poll.
    fn latest_frame(&mut self) -> Option<Detection>;

    fn status(&self) -> DetectorStatus;

    /// Release camera and model resources. Idempotent.
    fn shutdown(&mut self);
}

/// Single-slot mailbox filled by the host (e.g. JavaScript pushing landmark
/// arrays) and drained by the scene.
#[derive(Debug, Clone)]
pub struct LatestFrameSlot {
    pending: Option<Detection>,
    status: DetectorStatus,
}

impl Default for LatestFrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl LatestFrameSlot {
    pub fn new() -> Self {
        Self {
            pending: None,
            status: DetectorStatus::Running,
        }
    }

    /// Publish a result, replacing any unconsumed one
    pub fn publish(&mut self, detection: Detection) {
        if !self.status.is_running() {
            return;
        }
        self.pending = Some(detection);
    }

    /// Publish a flat landmark array; malformed input degrades to "no hand"
    pub fn publish_flat(&mut self, values: &[f32]) {
        let detection = match HandFrame::from_flat(values) {
            Some(frame) => Detection::Hand(frame),
            None => {
                log::debug!("malformed landmark array of {} floats", values.len());
                Detection::NoHand
            }
        };
        self.publish(detection);
    }

    pub fn fail(&mut self, error: SceneError) {
        log::warn!("hand detector failed: {}", error);
        self.pending = None;
        self.status = DetectorStatus::Failed(error);
    }
}

impl HandSource for LatestFrameSlot {
    fn latest_frame(&mut self) -> Option<Detection> {
        self.pending.take()
    }

    fn status(&self) -> DetectorStatus {
        self.status.clone()
    }

    fn shutdown(&mut self) {
        self.pending = None;
        if self.status.is_running() {
            self.status = DetectorStatus::Stopped;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use threaded::{spawn_detector, LandmarkDetector, ThreadedHandSource};

#[cfg(not(target_arch = "wasm32"))]
mod threaded {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};
    use std::thread::{self, JoinHandle};

    use super::{Detection, DetectorStatus, HandSource};
    use crate::error::SceneError;
    use crate::gesture::landmarks::HandFrame;

    /// A blocking landmark detector, e.g. a camera plus hand-tracking model
    pub trait LandmarkDetector: Send + 'static {
        /// Process the next camera frame. `Err` means the capability is gone for good.
        fn detect(&mut self) -> Result<Option<HandFrame>, SceneError>;
    }

    type Mailbox = Arc<Mutex<Option<Result<Detection, SceneError>>>>;

    /// Detector running on its own thread. Each result overwrites the
    /// previous unread one, so a slow consumer only ever sees the newest.
    pub struct ThreadedHandSource {
        mailbox: Mailbox,
        stop: Arc<AtomicBool>,
        handle: Option<JoinHandle<()>>,
        status: DetectorStatus,
    }

    /// Spawn a detector on its own thread and return the polling end.
    pub fn spawn_detector<D: LandmarkDetector>(mut detector: D) -> ThreadedHandSource {
        let mailbox: Mailbox = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));
        let posted = Arc::clone(&mailbox);
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                let message = detector.detect().map(|frame| match frame {
                    Some(frame) => Detection::Hand(frame),
                    None => Detection::NoHand,
                });
                let failed = message.is_err();
                *posted.lock().unwrap_or_else(PoisonError::into_inner) = Some(message);
                if failed {
                    break;
                }
            }
        });

        ThreadedHandSource {
            mailbox,
            stop,
            handle: Some(handle),
            status: DetectorStatus::Running,
        }
    }

    impl HandSource for ThreadedHandSource {
        fn latest_frame(&mut self) -> Option<Detection> {
            if !self.status.is_running() {
                return None;
            }
            // Read before taking: a thread that finished has already posted its last result
            let finished = self.handle.as_ref().map_or(true, JoinHandle::is_finished);
            let posted = self.mailbox.lock().unwrap_or_else(PoisonError::into_inner).take();
            match posted {
                Some(Ok(detection)) => Some(detection),
                Some(Err(error)) => {
                    log::warn!("hand detector failed: {}", error);
                    self.status = DetectorStatus::Failed(error);
                    None
                }
                None => {
                    if finished {
                        self.status = DetectorStatus::Failed(SceneError::Detector(
                            "detector thread exited".to_string(),
                        ));
                    }
                    None
                }
            }
        }

        fn status(&self) -> DetectorStatus {
            self.status.clone()
        }

        fn shutdown(&mut self) {
            self.stop.store(true, Ordering::Relaxed);
            if let Some(handle) = self.handle.take() {
                if handle.join().is_err() {
                    log::error!("detector thread panicked");
                }
            }
            self.mailbox.lock().unwrap_or_else(PoisonError::into_inner).take();
            if self.status.is_running() {
                self.status = DetectorStatus::Stopped;
            }
        }
    }

    impl Drop for ThreadedHandSource {
        fn drop(&mut self) {
            self.shutdown();
        }
    }
}
