//! Deterministic, stateless per-particle motion terms.
//!
//! Everything here is a pure function of (phase, clock) so it can be
//! re-evaluated every tick without accumulating drift.

use super::Vec3;

/// Small wandering offset; each axis stays within `[-amplitude, amplitude]`
#[inline]
pub fn drift(phase: f32, time: f32, amplitude: f32, frequency: f32) -> Vec3 {
    if amplitude == 0.0 {
        return Vec3::ZERO;
    }
    let t = time * frequency;
    Vec3::new(
        (t + phase).sin(),
        (t * 0.8 + phase * 1.7).cos(),
        (t * 1.3 + phase * 2.3).sin(),
    )
    .scale(amplitude)
}

/// Brightness/scale pulse in `[1 - depth, 1]`
#[inline]
pub fn twinkle(phase: f32, time: f32, speed: f32, depth: f32) -> f32 {
    let wave = 0.5 + 0.5 * (time * speed + phase).sin();
    1.0 - depth.clamp(0.0, 1.0) * wave
}
