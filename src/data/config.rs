use serde::{Deserialize, Serialize};
use crate::error::SceneError;
use crate::math::Vec3;
use crate::particles::GroupKind;

/// Complete scene configuration, loadable from YAML.
///
/// Every section is optional; missing fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for all procedural layouts; the same seed yields the same sculpture
    pub seed: u64,
    pub tree: TreeParams,
    pub counts: GroupCounts,
    pub motion: MotionConfig,
    pub gesture: GestureParams,
    pub slideshow: SlideshowParams,
    pub camera: CameraParams,
    /// Seconds between automatic form/scatter flips while gesture control is unavailable
    pub autopilot_interval: Option<f32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 2024,
            tree: TreeParams::default(),
            counts: GroupCounts::default(),
            motion: MotionConfig::default(),
            gesture: GestureParams::default(),
            slideshow: SlideshowParams::default(),
            camera: CameraParams::default(),
            autopilot_interval: Some(8.0),
        }
    }
}

/// Geometry of the formed tree and the scattered cloud
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    pub height: f32,
    /// Cone radius at the base
    pub base_radius: f32,
    /// Number of foliage tiers; each tier flares out slightly
    pub tiers: u32,
    /// Extra radius at the bottom of each tier
    pub tier_offset: f32,
    /// Relative radius jitter (0.2 = ±20%)
    pub jitter: f32,
    pub trunk_radius: f32,
    /// Radius of the sphere used for the scattered layout
    pub scatter_radius: f32,
    pub ribbon_turns: f32,
    pub ribbon_radius_tip: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            height: 14.0,
            base_radius: 6.0,
            tiers: 7,
            tier_offset: 0.45,
            jitter: 0.2,
            trunk_radius: 0.9,
            scatter_radius: 22.0,
            ribbon_turns: 5.0,
            ribbon_radius_tip: 0.4,
        }
    }
}

/// Particle counts per group, fixed for the lifetime of the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupCounts {
    pub needles: usize,
    pub trunk: usize,
    pub balls: usize,
    pub gifts: usize,
    pub lights: usize,
    pub ribbon: usize,
    pub snow: usize,
    pub sparkles: usize,
}

impl Default for GroupCounts {
    fn default() -> Self {
        Self {
            needles: 24_000,
            trunk: 1_500,
            balls: 300,
            gifts: 120,
            lights: 400,
            ribbon: 1_200,
            snow: 2_500,
            sparkles: 800,
        }
    }
}

impl GroupCounts {
    pub fn count(&self, kind: GroupKind) -> usize {
        match kind {
            GroupKind::Needles => self.needles,
            GroupKind::Trunk => self.trunk,
            GroupKind::Balls => self.balls,
            GroupKind::Gifts => self.gifts,
            GroupKind::Lights => self.lights,
            GroupKind::Ribbon => self.ribbon,
            GroupKind::Snow => self.snow,
            GroupKind::Sparkles => self.sparkles,
            // Sized by the slideshow, not here
            GroupKind::Photos => 0,
        }
    }
}

/// How one particle group moves toward its targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionPolicy {
    /// Exponential smoothing factor in (0, 1]
    pub alpha: f32,
    /// Per-axis noise amplitude added to the target while formed
    pub formed_noise: f32,
    /// Per-axis noise amplitude added to the target while scattered
    pub scattered_noise: f32,
    pub noise_frequency: f32,
    /// Radians per second around the vertical axis, advancing only while formed
    pub spin_speed: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    /// Units per second of continuous fall, wrapped inside the group's height band
    pub fall_speed: f32,
    /// Scale pulse depth in [0, 1]
    pub twinkle_depth: f32,
    pub twinkle_speed: f32,
}

impl Default for MotionPolicy {
    fn default() -> Self {
        Self {
            alpha: 0.04,
            formed_noise: 0.0,
            scattered_noise: 0.3,
            noise_frequency: 1.0,
            spin_speed: 0.0,
            bob_amplitude: 0.0,
            bob_frequency: 1.0,
            fall_speed: 0.0,
            twinkle_depth: 0.0,
            twinkle_speed: 4.0,
        }
    }
}

/// Motion policy for every group kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub needles: MotionPolicy,
    pub trunk: MotionPolicy,
    pub balls: MotionPolicy,
    pub gifts: MotionPolicy,
    pub lights: MotionPolicy,
    pub ribbon: MotionPolicy,
    pub snow: MotionPolicy,
    pub sparkles: MotionPolicy,
    pub photos: MotionPolicy,
}

impl Default for MotionConfig {
    fn default() -> Self {
        let base = MotionPolicy::default();
        Self {
            needles: MotionPolicy {
                alpha: 0.04,
                formed_noise: 0.03,
                scattered_noise: 0.35,
                noise_frequency: 1.2,
                ..base
            },
            trunk: MotionPolicy {
                alpha: 0.03,
                scattered_noise: 0.25,
                ..base
            },
            balls: MotionPolicy {
                alpha: 0.035,
                scattered_noise: 0.4,
                ..base
            },
            gifts: MotionPolicy {
                alpha: 0.03,
                scattered_noise: 0.4,
                ..base
            },
            lights: MotionPolicy {
                alpha: 0.045,
                twinkle_depth: 0.7,
                twinkle_speed: 5.0,
                ..base
            },
            ribbon: MotionPolicy {
                alpha: 0.03,
                spin_speed: 0.25,
                ..base
            },
            snow: MotionPolicy {
                alpha: 0.02,
                scattered_noise: 0.5,
                noise_frequency: 0.6,
                fall_speed: 1.2,
                ..base
            },
            sparkles: MotionPolicy {
                alpha: 0.05,
                spin_speed: 0.4,
                bob_amplitude: 0.3,
                bob_frequency: 1.5,
                twinkle_depth: 0.8,
                twinkle_speed: 6.0,
                ..base
            },
            photos: MotionPolicy {
                alpha: 0.05,
                scattered_noise: 0.2,
                bob_amplitude: 0.15,
                ..base
            },
        }
    }
}

impl MotionConfig {
    pub fn policy(&self, kind: GroupKind) -> MotionPolicy {
        match kind {
            GroupKind::Needles => self.needles,
            GroupKind::Trunk => self.trunk,
            GroupKind::Balls => self.balls,
            GroupKind::Gifts => self.gifts,
            GroupKind::Lights => self.lights,
            GroupKind::Ribbon => self.ribbon,
            GroupKind::Snow => self.snow,
            GroupKind::Sparkles => self.sparkles,
            GroupKind::Photos => self.photos,
        }
    }
}

/// Thresholds for the hand-gesture classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureParams {
    pub select_cooldown_ms: f64,
    pub swipe_cooldown_ms: f64,
    /// Minimum horizontal travel between consecutive frames, in normalized units
    pub swipe_threshold: f32,
    /// Rotation speed (rad/s) at the edge of the frame
    pub rotation_gain: f32,
    /// Fewer extended fingers than this counts as a fist
    pub min_extended_for_open: usize,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            select_cooldown_ms: 800.0,
            swipe_cooldown_ms: 500.0,
            swipe_threshold: 0.03,
            rotation_gain: 0.8,
            min_extended_for_open: 2,
        }
    }
}

/// Photo ornaments and the focus slideshow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowParams {
    pub interval_secs: f32,
    /// Ornaments placed on the spiral whenever the photo list is non-empty
    pub ornaments: usize,
    /// Where the focused ornament is presented
    pub focus_point: Vec3,
    pub focus_scale: f32,
}

impl Default for SlideshowParams {
    fn default() -> Self {
        Self {
            interval_secs: 4.0,
            ornaments: 12,
            focus_point: Vec3::new(0.0, 1.0, 10.0),
            focus_scale: 4.0,
        }
    }
}

/// Orbit camera driven by the rotation and zoom signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub base_distance: f32,
    /// Distance added at zoom = +1 (subtracted at -1)
    pub zoom_range: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub smoothing: f32,
    pub height: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            base_distance: 32.0,
            zoom_range: 12.0,
            min_distance: 12.0,
            max_distance: 60.0,
            smoothing: 0.05,
            height: 2.0,
        }
    }
}

impl SceneConfig {
    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, SceneError> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the sculpture degenerate or unstable
    pub fn validate(&self) -> Result<(), SceneError> {
        let t = &self.tree;
        if t.height <= 0.0 || t.base_radius <= 0.0 || t.scatter_radius <= 0.0 {
            return Err(SceneError::Config(
                "tree height, base_radius and scatter_radius must be positive".to_string(),
            ));
        }
        if t.tiers == 0 {
            return Err(SceneError::Config("tree tiers must be at least 1".to_string()));
        }

        for kind in GroupKind::ALL {
            let alpha = self.motion.policy(kind).alpha;
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(SceneError::Config(format!(
                    "{} smoothing alpha {} outside (0, 1]",
                    kind.name(),
                    alpha
                )));
            }
        }

        if self.slideshow.interval_secs <= 0.0 {
            return Err(SceneError::Config("slideshow interval must be positive".to_string()));
        }
        if let Some(interval) = self.autopilot_interval {
            if interval <= 0.0 {
                return Err(SceneError::Config("autopilot interval must be positive".to_string()));
            }
        }
        let c = &self.camera;
        if c.min_distance > c.max_distance || !(c.smoothing > 0.0 && c.smoothing <= 1.0) {
            return Err(SceneError::Config("camera distance range or smoothing invalid".to_string()));
        }

        Ok(())
    }
}
