//! Hand keypoints as delivered by the external landmark detector.
//!
//! 21 points per hand in the usual wrist/thumb/index/middle/ring/pinky order,
//! x and y normalized to [0, 1] with the origin at the top-left of the image,
//! z a relative depth.

pub const LANDMARK_COUNT: usize = 21;
/// Floats per landmark in a flat `[x, y, z, ...]` upload
pub const LANDMARK_STRIDE: usize = 3;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// The four non-thumb fingers used for pose features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> usize {
        match self {
            Finger::Index => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring => RING_TIP,
            Finger::Pinky => PINKY_TIP,
        }
    }

    /// Proximal interphalangeal joint
    pub fn pip(self) -> usize {
        match self {
            Finger::Index => INDEX_PIP,
            Finger::Middle => MIDDLE_PIP,
            Finger::Ring => RING_PIP,
            Finger::Pinky => PINKY_PIP,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl HandLandmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One detected hand. Construction validates the data, so a `HandFrame`
/// always holds 21 finite points.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    landmarks: [HandLandmark; LANDMARK_COUNT],
}

impl HandFrame {
    /// None if any coordinate is NaN or infinite
    pub fn new(landmarks: [HandLandmark; LANDMARK_COUNT]) -> Option<Self> {
        if landmarks.iter().all(HandLandmark::is_finite) {
            Some(Self { landmarks })
        } else {
            None
        }
    }

    /// Parse a flat `[x0, y0, z0, x1, ...]` array of exactly 63 floats
    pub fn from_flat(values: &[f32]) -> Option<Self> {
        if values.len() != LANDMARK_COUNT * LANDMARK_STRIDE {
            return None;
        }
        let mut landmarks = [HandLandmark::default(); LANDMARK_COUNT];
        for (landmark, chunk) in landmarks.iter_mut().zip(values.chunks_exact(LANDMARK_STRIDE)) {
            *landmark = HandLandmark::new(chunk[0], chunk[1], chunk[2]);
        }
        Self::new(landmarks)
    }

    pub fn landmark(&self, index: usize) -> HandLandmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[HandLandmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Tip above its PIP joint (smaller y, image origin is top-left)
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.landmarks[finger.tip()].y < self.landmarks[finger.pip()].y
    }

    /// Middle-finger knuckle; moves far less than any fingertip
    pub fn reference_point(&self) -> HandLandmark {
        self.landmarks[MIDDLE_MCP]
    }
}
