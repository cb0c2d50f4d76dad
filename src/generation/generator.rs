use std::f32::consts::TAU;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::{PhotoList, SceneConfig, SlideshowParams, TreeParams};
use crate::math::{hsv_to_rgb, Vec3};
use crate::particles::{GroupKind, GroupLayout};
use super::layouts::{
    photo_spiral_point, ribbon_point, sample_cone_surface, sample_needle, sample_snow,
    sample_sparkle, sample_sphere, sample_trunk, snow_band,
};

/// Bauble hues; a fifth of baubles are desaturated to read as silver
const BAUBLE_HUES: [f32; 4] = [0.0, 0.12, 0.62, 0.9];
const GIFT_HUES: [f32; 3] = [0.0, 0.33, 0.58];

/// Builds the scattered and formed layouts for every group.
///
/// Each group draws from its own stream derived from the scene seed, so
/// regenerating one group (e.g. photos) never disturbs the others.
#[derive(Debug, Clone)]
pub struct ConfigurationGenerator {
    tree: TreeParams,
    slideshow: SlideshowParams,
    seed: u64,
}

impl ConfigurationGenerator {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            tree: config.tree,
            slideshow: config.slideshow,
            seed: config.seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn rng_for(&self, kind: GroupKind) -> StdRng {
        let salt = GroupKind::ALL.iter().position(|k| *k == kind).unwrap_or(0) as u64 + 1;
        StdRng::seed_from_u64(self.seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Layout for a fixed-count decorative group. Photos go through
    /// [`generate_photos`](Self::generate_photos) instead.
    pub fn generate(&self, kind: GroupKind, count: usize) -> GroupLayout {
        let mut rng = self.rng_for(kind);
        let tree = &self.tree;
        let mut layout = GroupLayout::with_capacity(count);

        for i in 0..count {
            let scattered = sample_sphere(&mut rng, tree.scatter_radius);
            let phase = TAU * rng.random::<f32>();
            match kind {
                GroupKind::Needles => {
                    let formed = sample_needle(&mut rng, tree);
                    let color = hsv_to_rgb(
                        0.33 + 0.05 * (rng.random::<f32>() - 0.5),
                        0.6 + 0.3 * rng.random::<f32>(),
                        0.25 + 0.35 * rng.random::<f32>(),
                    );
                    layout.push(scattered, formed, color, 0.08 + 0.06 * rng.random::<f32>(), phase);
                }
                GroupKind::Trunk => {
                    let formed = sample_trunk(&mut rng, tree);
                    let color = hsv_to_rgb(0.07, 0.6, 0.2 + 0.1 * rng.random::<f32>());
                    layout.push(scattered, formed, color, 0.12, phase);
                }
                GroupKind::Balls => {
                    let formed = sample_cone_surface(&mut rng, tree, (0.05, 0.9), 0.2);
                    let hue = BAUBLE_HUES[rng.random_range(0..BAUBLE_HUES.len())];
                    let saturation = if rng.random::<f32>() < 0.2 { 0.05 } else { 0.85 };
                    let color = hsv_to_rgb(hue, saturation, 0.9);
                    layout.push(scattered, formed, color, 0.35 + 0.25 * rng.random::<f32>(), phase);
                    let tilt = random_euler(&mut rng);
                    layout.set_last_rotation(tilt, Vec3::ZERO);
                }
                GroupKind::Gifts => {
                    let formed = sample_cone_surface(&mut rng, tree, (0.0, 0.6), 0.4);
                    let hue = GIFT_HUES[rng.random_range(0..GIFT_HUES.len())];
                    let color = hsv_to_rgb(hue, 0.75, 0.85);
                    layout.push(scattered, formed, color, 0.5 + 0.3 * rng.random::<f32>(), phase);
                    let tilt = random_euler(&mut rng);
                    let spin = Vec3::new(
                        rng.random_range(-0.5..0.5),
                        rng.random_range(-0.8..0.8),
                        rng.random_range(-0.5..0.5),
                    );
                    layout.set_last_rotation(tilt, spin);
                }
                GroupKind::Lights => {
                    let formed = sample_cone_surface(&mut rng, tree, (0.02, 0.95), 0.1);
                    let color = hsv_to_rgb(0.11 + 0.04 * rng.random::<f32>(), 0.35, 1.0);
                    layout.push(scattered, formed, color, 0.12, phase);
                }
                GroupKind::Ribbon => {
                    let formed = ribbon_point(tree, i, count);
                    let color = hsv_to_rgb(0.12, 0.7, 0.95);
                    layout.push(scattered, formed, color, 0.1, phase);
                }
                GroupKind::Snow => {
                    let formed = sample_snow(&mut rng, tree);
                    layout.push(scattered, formed, Vec3::ONE, 0.05 + 0.07 * rng.random::<f32>(), phase);
                }
                GroupKind::Sparkles => {
                    let formed = sample_sparkle(&mut rng, tree);
                    let color = hsv_to_rgb(0.14, 0.2, 1.0);
                    layout.push(scattered, formed, color, 0.06, phase);
                }
                GroupKind::Photos => {
                    debug_assert!(false, "photo ornaments are generated from the photo list");
                    log::warn!("photo ornaments requested through generate(); returning empty layout");
                    return GroupLayout::default();
                }
            }
        }

        if kind == GroupKind::Snow {
            layout.fall_band = Some(snow_band(tree));
        }
        log::info!("generated {} {} particles", layout.len(), kind.name());
        layout
    }

    /// Photo ornaments along their own spiral, each bound to `slot mod len`.
    /// An empty list yields an empty (valid) layout.
    pub fn generate_photos(&self, photos: &PhotoList) -> GroupLayout {
        if photos.is_empty() {
            log::info!("no photos, photo ornaments cleared");
            return GroupLayout::default();
        }
        let count = self.slideshow.ornaments;
        let mut rng = self.rng_for(GroupKind::Photos);
        let mut layout = GroupLayout::with_capacity(count);
        layout.photo_bindings.reserve(count);

        for slot in 0..count {
            let scattered = sample_sphere(&mut rng, self.tree.scatter_radius * 0.8);
            let (formed, angle) = photo_spiral_point(&self.tree, slot, count);
            let phase = TAU * rng.random::<f32>();
            layout.push(scattered, formed, Vec3::ONE, 1.2, phase);
            // Face outward from the trunk
            layout.set_last_rotation(Vec3::new(0.0, TAU / 4.0 - angle, 0.0), Vec3::ZERO);
            if let Some(binding) = photos.binding(slot) {
                layout.photo_bindings.push(binding);
            }
        }

        log::info!("generated {} photo ornaments for {} photos", layout.len(), photos.len());
        layout
    }
}

fn random_euler<R: Rng>(rng: &mut R) -> Vec3 {
    Vec3::new(
        TAU * rng.random::<f32>(),
        TAU * rng.random::<f32>(),
        TAU * rng.random::<f32>(),
    )
}
