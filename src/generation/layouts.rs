//! Sampling primitives for the two target configurations.
//!
//! The tree is centred on the origin: its base sits at `-height/2` and its
//! tip at `+height/2`.

use std::f32::consts::{PI, TAU};
use rand::Rng;
use crate::data::TreeParams;
use crate::math::Vec3;

/// Uniform-density point inside a sphere
pub fn sample_sphere<R: Rng>(rng: &mut R, radius: f32) -> Vec3 {
    let r = radius * rng.random::<f32>().cbrt();
    let theta = TAU * rng.random::<f32>();
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::from_spherical(r, theta, phi)
}

/// Outer radius of the foliage at height `h` above the base
pub fn cone_radius(tree: &TreeParams, h: f32) -> f32 {
    let t = (h / tree.height).clamp(0.0, 1.0);
    let tiers = tree.tiers.max(1) as f32;
    // Position inside the current tier, 0 at its bottom edge
    let local = (t * tiers).fract();
    tree.base_radius * (1.0 - t) + tree.tier_offset * (1.0 - local) * (1.0 - t)
}

/// Needle on the tiered cone with relative radius jitter
pub fn sample_needle<R: Rng>(rng: &mut R, tree: &TreeParams) -> Vec3 {
    let h = rng.random::<f32>() * tree.height;
    let jitter = 1.0 + tree.jitter * (2.0 * rng.random::<f32>() - 1.0);
    let radius = cone_radius(tree, h) * jitter;
    let angle = TAU * rng.random::<f32>();
    Vec3::from_cylindrical(radius, angle, h - tree.height / 2.0)
}

/// Height of the flared skirt at the foot of the trunk
const TRUNK_SKIRT: f32 = 2.0;

/// Point inside the trunk: a narrow cone that widens into a skirt near the ground
pub fn sample_trunk<R: Rng>(rng: &mut R, tree: &TreeParams) -> Vec3 {
    let h = rng.random::<f32>() * tree.height * 0.8;
    let y = h - tree.height / 2.0;
    let mut radius = tree.trunk_radius * (1.0 - 0.7 * h / tree.height);
    let skirt_top = -tree.height / 2.0 + TRUNK_SKIRT;
    if y < skirt_top {
        radius *= 1.0 + (skirt_top - y) / TRUNK_SKIRT;
    }
    let r = radius * rng.random::<f32>().sqrt();
    Vec3::from_cylindrical(r, TAU * rng.random::<f32>(), y)
}

/// Point just outside the foliage, for ornaments. `band` restricts the height
/// range as fractions of the tree height.
pub fn sample_cone_surface<R: Rng>(rng: &mut R, tree: &TreeParams, band: (f32, f32), lift: f32) -> Vec3 {
    let (lo, hi) = band;
    let h = tree.height * (lo + (hi - lo) * rng.random::<f32>());
    let radius = cone_radius(tree, h) + lift;
    Vec3::from_cylindrical(radius, TAU * rng.random::<f32>(), h - tree.height / 2.0)
}

/// Ribbon particle `index` of `count`: two interleaved helix strands.
///
/// Even indices wind one way, odd indices the other, shifted by half a turn.
pub fn ribbon_point(tree: &TreeParams, index: usize, count: usize) -> Vec3 {
    let per_strand = count.div_ceil(2).max(1);
    let slot = index / 2;
    let t = if per_strand > 1 {
        slot as f32 / (per_strand - 1) as f32
    } else {
        0.0
    };
    let (direction, offset) = if index % 2 == 0 { (1.0, 0.0) } else { (-1.0, PI) };

    let radius_base = tree.base_radius * 1.1;
    let radius = radius_base * (1.0 - t) + tree.ribbon_radius_tip;
    let angle = t * TAU * tree.ribbon_turns * direction + offset;
    let spread = tree.height;
    Vec3::from_cylindrical(radius, angle, t * spread - spread / 2.0)
}

/// Ornament `slot` of `count` on the photo spiral: fixed angular and height steps
pub fn photo_spiral_point(tree: &TreeParams, slot: usize, count: usize) -> (Vec3, f32) {
    let t = if count > 1 { slot as f32 / (count - 1) as f32 } else { 0.5 };
    let h = tree.height * (0.12 + 0.7 * t);
    let angle = slot as f32 * (TAU * 2.0 / count.max(1) as f32);
    let radius = cone_radius(tree, h) + 0.8;
    (Vec3::from_cylindrical(radius, angle, h - tree.height / 2.0), angle)
}

/// Vertical band that snow wraps inside
pub fn snow_band(tree: &TreeParams) -> (f32, f32) {
    (-tree.height / 2.0 - 1.0, tree.height / 2.0 + 8.0)
}

/// Point in the snow cylinder around the tree
pub fn sample_snow<R: Rng>(rng: &mut R, tree: &TreeParams) -> Vec3 {
    let (bottom, top) = snow_band(tree);
    let radius = tree.base_radius * 2.5 * rng.random::<f32>().sqrt();
    let y = bottom + (top - bottom) * rng.random::<f32>();
    Vec3::from_cylindrical(radius, TAU * rng.random::<f32>(), y)
}

/// Point in a loose shell hugging the foliage
pub fn sample_sparkle<R: Rng>(rng: &mut R, tree: &TreeParams) -> Vec3 {
    let lift = 1.0 + 2.0 * rng.random::<f32>();
    sample_cone_surface(rng, tree, (0.0, 1.05), lift)
}
