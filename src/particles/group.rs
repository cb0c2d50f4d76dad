use crate::data::MotionPolicy;
use crate::math::Vec3;

/// The fixed set of particle groups making up the sculpture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Needles,
    Trunk,
    Balls,
    Gifts,
    Lights,
    Ribbon,
    Snow,
    Sparkles,
    Photos,
}

impl GroupKind {
    pub const ALL: [GroupKind; 9] = [
        GroupKind::Needles,
        GroupKind::Trunk,
        GroupKind::Balls,
        GroupKind::Gifts,
        GroupKind::Lights,
        GroupKind::Ribbon,
        GroupKind::Snow,
        GroupKind::Sparkles,
        GroupKind::Photos,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GroupKind::Needles => "needles",
            GroupKind::Trunk => "trunk",
            GroupKind::Balls => "balls",
            GroupKind::Gifts => "gifts",
            GroupKind::Lights => "lights",
            GroupKind::Ribbon => "ribbon",
            GroupKind::Snow => "snow",
            GroupKind::Sparkles => "sparkles",
            GroupKind::Photos => "photos",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// Generated endpoints and decorations for one group.
///
/// All per-particle arrays share the same particle count; vector attributes
/// are flat xyz triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupLayout {
    pub scattered: Vec<f32>,
    pub formed: Vec<f32>,
    pub colors: Vec<f32>,
    pub scales: Vec<f32>,
    pub phases: Vec<f32>,
    pub rotations: Vec<f32>,
    pub rotation_speeds: Vec<f32>,
    /// Photo index bound to each particle (photo ornaments only)
    pub photo_bindings: Vec<usize>,
    /// (bottom, top) band that falling particles wrap inside
    pub fall_band: Option<(f32, f32)>,
}

impl GroupLayout {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            scattered: Vec::with_capacity(count * 3),
            formed: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
            scales: Vec::with_capacity(count),
            phases: Vec::with_capacity(count),
            rotations: Vec::with_capacity(count * 3),
            rotation_speeds: Vec::with_capacity(count * 3),
            photo_bindings: Vec::new(),
            fall_band: None,
        }
    }

    /// Append one particle
    pub fn push(&mut self, scattered: Vec3, formed: Vec3, color: Vec3, scale: f32, phase: f32) {
        self.scattered.extend_from_slice(&scattered.to_array());
        self.formed.extend_from_slice(&formed.to_array());
        self.colors.extend_from_slice(&color.to_array());
        self.scales.push(scale);
        self.phases.push(phase);
        self.rotations.extend_from_slice(&[0.0; 3]);
        self.rotation_speeds.extend_from_slice(&[0.0; 3]);
    }

    /// Set the initial orientation and spin of the most recently pushed particle
    pub fn set_last_rotation(&mut self, rotation: Vec3, speed: Vec3) {
        let last = self.len() - 1;
        rotation.write(&mut self.rotations, last);
        speed.write(&mut self.rotation_speeds, last);
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Every per-particle array agrees on the particle count
    pub fn is_consistent(&self) -> bool {
        let n = self.len();
        self.scattered.len() == n * 3
            && self.formed.len() == n * 3
            && self.colors.len() == n * 3
            && self.scales.len() == n
            && self.rotations.len() == n * 3
            && self.rotation_speeds.len() == n * 3
            && (self.photo_bindings.is_empty() || self.photo_bindings.len() == n)
    }
}

/// Retarget one particle to a presentation point (the focused photo)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusOverride {
    pub index: usize,
    pub position: Vec3,
    pub scale: f32,
}

/// A fixed-cardinality collection of particles sharing one layout and motion policy.
///
/// `current` is the blended state written only by the interpolation engine.
/// The `display_*` buffers are recomputed from it every tick and are what the
/// render sink reads.
#[derive(Debug, Clone)]
pub struct ParticleGroup {
    kind: GroupKind,
    pub(super) layout: GroupLayout,
    pub policy: MotionPolicy,
    pub(super) current: Vec<f32>,
    pub(super) display_positions: Vec<f32>,
    pub(super) display_scales: Vec<f32>,
    pub(super) display_rotations: Vec<f32>,
    /// Accumulated spin angle; advances only while formed
    pub(super) spin_angle: f32,
    pub(super) focus: Option<FocusOverride>,
}

impl ParticleGroup {
    /// Create a group whose particles start at their scattered positions
    pub fn new(kind: GroupKind, layout: GroupLayout, policy: MotionPolicy) -> Self {
        debug_assert!(layout.is_consistent(), "{} layout arrays disagree", kind.name());
        let mut group = Self {
            kind,
            current: Vec::new(),
            display_positions: Vec::new(),
            display_scales: Vec::new(),
            display_rotations: Vec::new(),
            layout,
            policy,
            spin_angle: 0.0,
            focus: None,
        };
        group.reseed();
        group
    }

    /// Swap in a regenerated layout.
    ///
    /// Same cardinality keeps `current` (index mapping is stable); a different
    /// count reallocates and reseeds from the new scattered layout.
    pub fn replace_layout(&mut self, layout: GroupLayout) {
        debug_assert!(layout.is_consistent(), "{} layout arrays disagree", self.kind.name());
        let resized = layout.len() != self.layout.len();
        self.layout = layout;
        if resized {
            self.reseed();
        }
        if let Some(focus) = self.focus {
            if focus.index >= self.len() {
                self.focus = None;
            }
        }
    }

    /// Reallocate every mutable buffer from the scattered layout
    pub(super) fn reseed(&mut self) {
        self.current = self.layout.scattered.clone();
        self.display_positions = self.layout.scattered.clone();
        self.display_scales = self.layout.scales.clone();
        self.display_rotations = self.layout.rotations.clone();
    }

    /// True when the mutable buffers match the layout's particle count
    pub fn is_in_sync(&self) -> bool {
        let n3 = self.layout.len() * 3;
        self.current.len() == n3
            && self.display_positions.len() == n3
            && self.display_scales.len() == self.layout.len()
            && self.display_rotations.len() == n3
    }

    pub fn set_focus(&mut self, focus: Option<FocusOverride>) {
        self.focus = focus.filter(|f| f.index < self.len());
    }

    /// Ornament showing `photo`. When no ornament is bound to it, slot
    /// `photo mod len` is rebound so every photo can be presented.
    pub fn ornament_for_photo(&mut self, photo: usize) -> Option<usize> {
        let bindings = &mut self.layout.photo_bindings;
        if bindings.is_empty() {
            return None;
        }
        if let Some(slot) = bindings.iter().position(|&bound| bound == photo) {
            return Some(slot);
        }
        let slot = photo % bindings.len();
        log::debug!("ornament {} rebound to photo {}", slot, photo);
        bindings[slot] = photo;
        Some(slot)
    }

    pub fn focus(&self) -> Option<FocusOverride> {
        self.focus
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    pub fn layout(&self) -> &GroupLayout {
        &self.layout
    }

    /// Blended positions without per-frame display transforms
    pub fn current(&self) -> &[f32] {
        &self.current
    }

    pub fn current_position(&self, index: usize) -> Vec3 {
        Vec3::read(&self.current, index)
    }

    /// Positions for the render sink: [x, y, z] * len
    pub fn positions(&self) -> &[f32] {
        &self.display_positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.layout.colors
    }

    pub fn scales(&self) -> &[f32] {
        &self.display_scales
    }

    /// Euler angles per particle: [x, y, z] * len
    pub fn rotations(&self) -> &[f32] {
        &self.display_rotations
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }
}
