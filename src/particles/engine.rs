//! Per-tick exponential smoothing of every particle toward its active target.
//!
//! `current ← current + α·(target + noise − current)` is the only motion law.
//! There is no velocity state, so the blend cannot overshoot or oscillate no
//! matter how irregular the tick rate is, and a mode flip simply retargets.

use std::f32::consts::TAU;
use crate::control::Mode;
use crate::math::{drift, twinkle, Vec3};
use super::group::ParticleGroup;

/// Distance from the presentation point at which a focused particle starts growing
const FOCUS_SCALE_RADIUS: f32 = 12.0;

/// Owns the global animation clock and advances particle groups
#[derive(Debug, Clone, Default)]
pub struct InterpolationEngine {
    time: f32,
}

impl InterpolationEngine {
    pub fn new() -> Self {
        Self { time: 0.0 }
    }

    /// Seconds of animation clock elapsed
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance the clock by `dt` seconds and blend every group toward the
    /// target selected by `mode`
    pub fn tick(&mut self, dt: f32, mode: Mode, groups: &mut [ParticleGroup]) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt;
        let time = self.time;

        // Groups share nothing mutable, so they can be stepped independently
        #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
        {
            use rayon::prelude::*;
            groups.par_iter_mut().for_each(|group| step_group(group, mode, time, dt));
        }
        #[cfg(not(all(feature = "parallel", not(target_arch = "wasm32"))))]
        for group in groups.iter_mut() {
            step_group(group, mode, time, dt);
        }
    }
}

/// Blend one group and rebuild its display buffers
fn step_group(group: &mut ParticleGroup, mode: Mode, time: f32, dt: f32) {
    if !group.is_in_sync() {
        debug_assert!(false, "{} buffers out of sync with layout", group.name());
        log::warn!("{} buffers out of sync with layout, reseeding", group.name());
        group.reseed();
    }

    if mode == Mode::Formed && group.policy.spin_speed != 0.0 {
        group.spin_angle = (group.spin_angle + group.policy.spin_speed * dt).rem_euclid(TAU);
    }

    blend(group, mode, time);
    update_display(group, time);
}

fn blend(group: &mut ParticleGroup, mode: Mode, time: f32) {
    let policy = group.policy;
    let alpha = policy.alpha.clamp(0.0, 1.0);
    let focus = group.focus;
    let layout = &group.layout;
    let (target, amplitude) = match mode {
        Mode::Formed => (&layout.formed, policy.formed_noise),
        Mode::Scattered => (&layout.scattered, policy.scattered_noise),
    };

    for (i, ((current, goal), &phase)) in group
        .current
        .chunks_exact_mut(3)
        .zip(target.chunks_exact(3))
        .zip(&layout.phases)
        .enumerate()
    {
        let goal = match focus {
            Some(f) if f.index == i => f.position,
            _ => Vec3::new(goal[0], goal[1], goal[2])
                + drift(phase, time, amplitude, policy.noise_frequency),
        };
        current[0] += (goal.x - current[0]) * alpha;
        current[1] += (goal.y - current[1]) * alpha;
        current[2] += (goal.z - current[2]) * alpha;
    }
}

/// Stateless per-frame transforms on top of the blended positions
fn update_display(group: &mut ParticleGroup, time: f32) {
    let policy = group.policy;
    let spin = group.spin_angle;
    let focus = group.focus;
    let layout = &group.layout;

    for i in 0..layout.len() {
        let blended = Vec3::read(&group.current, i);
        let phase = layout.phases[i];

        let mut p = blended;
        if spin != 0.0 {
            p = p.rotate_y(spin);
        }
        if policy.bob_amplitude != 0.0 {
            p.y += policy.bob_amplitude * (time * policy.bob_frequency + phase).sin();
        }
        if policy.fall_speed != 0.0 {
            if let Some((bottom, top)) = layout.fall_band {
                // Phase spreads fall speeds over [0.6, 1.4] so flakes don't move in lockstep
                let speed = policy.fall_speed * (0.6 + 0.8 * (phase / TAU));
                p.y = wrap_fall(p.y, bottom, top, time * speed);
            }
        }
        p.write(&mut group.display_positions, i);

        let mut scale = layout.scales[i];
        if policy.twinkle_depth > 0.0 {
            scale *= twinkle(phase, time, policy.twinkle_speed, policy.twinkle_depth);
        }
        if let Some(f) = focus {
            if f.index == i {
                let closeness = (1.0 - blended.distance(&f.position) / FOCUS_SCALE_RADIUS).clamp(0.0, 1.0);
                scale *= 1.0 + (f.scale - 1.0) * closeness;
            }
        }
        group.display_scales[i] = scale;

        for axis in 0..3 {
            let k = i * 3 + axis;
            group.display_rotations[k] =
                (layout.rotations[k] + layout.rotation_speeds[k] * time).rem_euclid(TAU);
        }
    }
}

/// Move `y` down by `offset`, re-entering at the top when it leaves the band
fn wrap_fall(y: f32, bottom: f32, top: f32, offset: f32) -> f32 {
    let height = top - bottom;
    if height <= 0.0 {
        return y;
    }
    bottom + (y - bottom - offset).rem_euclid(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MotionPolicy;
    use crate::particles::{FocusOverride, GroupKind, GroupLayout};

    fn quiet_policy(alpha: f32) -> MotionPolicy {
        MotionPolicy {
            alpha,
            formed_noise: 0.0,
            scattered_noise: 0.0,
            ..MotionPolicy::default()
        }
    }

    fn test_group(policy: MotionPolicy) -> ParticleGroup {
        let mut layout = GroupLayout::with_capacity(16);
        for i in 0..16 {
            let f = i as f32;
            layout.push(
                Vec3::new(f * 2.0 - 15.0, 10.0 - f, f * 0.5),
                Vec3::new((f * 0.7).cos() * 3.0, f * 0.6, (f * 0.7).sin() * 3.0),
                Vec3::ONE,
                1.0,
                f * 0.39,
            );
        }
        ParticleGroup::new(GroupKind::Balls, layout, policy)
    }

    fn target(group: &ParticleGroup, mode: Mode, i: usize) -> Vec3 {
        match mode {
            Mode::Formed => Vec3::read(&group.layout().formed, i),
            Mode::Scattered => Vec3::read(&group.layout().scattered, i),
        }
    }

    #[test]
    fn test_distance_decreases_monotonically() {
        let mut group = test_group(quiet_policy(0.05));
        let mut engine = InterpolationEngine::new();

        let mut previous: Vec<f32> = (0..group.len())
            .map(|i| group.current_position(i).distance(&target(&group, Mode::Formed, i)))
            .collect();

        for _ in 0..100 {
            engine.tick(1.0 / 60.0, Mode::Formed, std::slice::from_mut(&mut group));
            for i in 0..group.len() {
                let d = group.current_position(i).distance(&target(&group, Mode::Formed, i));
                assert!(d <= previous[i] + 1e-5, "particle {} moved away from its target", i);
                previous[i] = d;
            }
        }
    }

    #[test]
    fn test_converges_within_bounded_ticks() {
        let alpha = 0.05f32;
        let mut group = test_group(quiet_policy(alpha));
        let mut engine = InterpolationEngine::new();

        let initial_max = (0..group.len())
            .map(|i| group.current_position(i).distance(&target(&group, Mode::Formed, i)))
            .fold(0.0f32, f32::max);
        let epsilon = 1e-3f32;
        // (1 - α)^n · d0 < ε
        let ticks = ((epsilon / initial_max).ln() / (1.0 - alpha).ln()).ceil() as usize + 1;

        for _ in 0..ticks {
            engine.tick(0.016, Mode::Formed, std::slice::from_mut(&mut group));
        }
        for i in 0..group.len() {
            let d = group.current_position(i).distance(&target(&group, Mode::Formed, i));
            assert!(d < epsilon * 1.5, "particle {} still {} away", i, d);
        }
    }

    #[test]
    fn test_mode_flip_bounded_step() {
        let alpha = 0.04;
        let mut group = test_group(quiet_policy(alpha));
        let mut engine = InterpolationEngine::new();

        for _ in 0..400 {
            engine.tick(0.016, Mode::Formed, std::slice::from_mut(&mut group));
        }

        let before: Vec<Vec3> = (0..group.len()).map(|i| group.current_position(i)).collect();
        engine.tick(0.016, Mode::Scattered, std::slice::from_mut(&mut group));

        for i in 0..group.len() {
            let step = group.current_position(i).distance(&before[i]);
            let bound = alpha * target(&group, Mode::Scattered, i).distance(&before[i]);
            assert!(step <= bound + 1e-4, "particle {} jumped {} > {}", i, step, bound);
        }
    }

    #[test]
    fn test_mode_flip_bounded_step_with_noise() {
        let alpha = 0.05;
        let noise = 0.4;
        let policy = MotionPolicy {
            alpha,
            formed_noise: 0.0,
            scattered_noise: noise,
            ..MotionPolicy::default()
        };
        let mut group = test_group(policy);
        let mut engine = InterpolationEngine::new();
        for _ in 0..300 {
            engine.tick(0.016, Mode::Formed, std::slice::from_mut(&mut group));
        }

        let before: Vec<Vec3> = (0..group.len()).map(|i| group.current_position(i)).collect();
        engine.tick(0.016, Mode::Scattered, std::slice::from_mut(&mut group));

        let noise_bound = noise * 3.0f32.sqrt();
        for i in 0..group.len() {
            let step = group.current_position(i).distance(&before[i]);
            let bound = alpha * (target(&group, Mode::Scattered, i).distance(&before[i]) + noise_bound);
            assert!(step <= bound + 1e-4);
        }
    }

    #[test]
    fn test_buffer_lengths_hold() {
        let mut groups = vec![test_group(MotionPolicy::default()), test_group(quiet_policy(1.0))];
        let mut engine = InterpolationEngine::new();
        for i in 0..50 {
            let mode = if i % 7 < 3 { Mode::Formed } else { Mode::Scattered };
            engine.tick(0.02, mode, &mut groups);
        }
        for group in &groups {
            assert!(group.is_in_sync());
            assert_eq!(group.current().len(), group.layout().formed.len());
            assert_eq!(group.current().len(), group.layout().scattered.len());
        }
    }

    #[test]
    fn test_alpha_one_snaps_to_target() {
        let mut group = test_group(quiet_policy(1.0));
        let mut engine = InterpolationEngine::new();
        engine.tick(0.016, Mode::Formed, std::slice::from_mut(&mut group));
        for i in 0..group.len() {
            assert!(group.current_position(i).distance(&target(&group, Mode::Formed, i)) < 1e-5);
        }
    }

    #[test]
    fn test_spin_not_baked_into_current() {
        let policy = MotionPolicy {
            spin_speed: 1.0,
            ..quiet_policy(1.0)
        };
        let mut group = test_group(policy);
        let mut engine = InterpolationEngine::new();

        for _ in 0..30 {
            engine.tick(0.05, Mode::Formed, std::slice::from_mut(&mut group));
        }

        // Blended state sits exactly on the formed targets
        assert_eq!(group.current(), group.layout().formed.as_slice());
        let angle = group.spin_angle();
        assert!((angle - 1.5).abs() < 1e-3);

        for i in 0..group.len() {
            let expected = group.current_position(i).rotate_y(angle);
            let shown = Vec3::read(group.positions(), i);
            assert!(shown.distance(&expected) < 1e-4);
        }
    }

    #[test]
    fn test_spin_frozen_while_scattered() {
        let policy = MotionPolicy {
            spin_speed: 2.0,
            ..quiet_policy(0.05)
        };
        let mut group = test_group(policy);
        let mut engine = InterpolationEngine::new();
        engine.tick(0.5, Mode::Formed, std::slice::from_mut(&mut group));
        let angle = group.spin_angle();
        engine.tick(0.5, Mode::Scattered, std::slice::from_mut(&mut group));
        assert_eq!(group.spin_angle(), angle);
    }

    #[test]
    fn test_bob_stays_within_amplitude() {
        let policy = MotionPolicy {
            bob_amplitude: 0.3,
            ..quiet_policy(1.0)
        };
        let mut group = test_group(policy);
        let mut engine = InterpolationEngine::new();
        for _ in 0..40 {
            engine.tick(0.07, Mode::Formed, std::slice::from_mut(&mut group));
            for i in 0..group.len() {
                let dy = group.positions()[i * 3 + 1] - group.current()[i * 3 + 1];
                assert!(dy.abs() <= 0.3 + 1e-5);
            }
        }
    }

    #[test]
    fn test_fall_wraps_inside_band() {
        assert!((wrap_fall(5.0, 0.0, 10.0, 2.0) - 3.0).abs() < 1e-5);
        assert!((wrap_fall(1.0, 0.0, 10.0, 2.0) - 9.0).abs() < 1e-5);
        assert_eq!(wrap_fall(4.0, 3.0, 3.0, 1.0), 4.0);

        let policy = MotionPolicy {
            fall_speed: 3.0,
            ..quiet_policy(1.0)
        };
        let mut group = test_group(policy);
        group.layout.fall_band = Some((-2.0, 12.0));
        let mut engine = InterpolationEngine::new();
        for _ in 0..100 {
            engine.tick(0.1, Mode::Formed, std::slice::from_mut(&mut group));
            for i in 0..group.len() {
                let y = group.positions()[i * 3 + 1];
                assert!((-2.0..12.0).contains(&y));
            }
        }
    }

    #[test]
    fn test_rotation_display_follows_speed() {
        let mut group = test_group(quiet_policy(0.05));
        group.layout.rotation_speeds[0] = 1.0;
        group.layout.rotations[0] = 0.5;
        let mut engine = InterpolationEngine::new();
        engine.tick(0.25, Mode::Formed, std::slice::from_mut(&mut group));
        assert!((group.rotations()[0] - 0.75).abs() < 1e-5);
        assert_eq!(group.rotations()[1], 0.0);
    }

    #[test]
    fn test_twinkle_modulates_display_scale_only() {
        let policy = MotionPolicy {
            twinkle_depth: 0.5,
            ..quiet_policy(0.05)
        };
        let mut group = test_group(policy);
        let mut engine = InterpolationEngine::new();
        engine.tick(0.3, Mode::Formed, std::slice::from_mut(&mut group));
        for i in 0..group.len() {
            assert!(group.scales()[i] >= 0.5 - 1e-6 && group.scales()[i] <= 1.0 + 1e-6);
            assert_eq!(group.layout().scales[i], 1.0);
        }
    }

    #[test]
    fn test_focus_override_pulls_particle() {
        let mut group = test_group(quiet_policy(0.1));
        let point = Vec3::new(0.0, 1.0, 10.0);
        group.set_focus(Some(FocusOverride { index: 3, position: point, scale: 4.0 }));
        let mut engine = InterpolationEngine::new();
        for _ in 0..200 {
            engine.tick(0.016, Mode::Scattered, std::slice::from_mut(&mut group));
        }
        assert!(group.current_position(3).distance(&point) < 1e-3);
        assert!((group.scales()[3] - 4.0).abs() < 1e-2);
        // Neighbours keep their own targets
        assert!(group.current_position(4).distance(&target(&group, Mode::Scattered, 4)) < 1e-3);
        assert!((group.scales()[4] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_dt_ignored() {
        let mut group = test_group(quiet_policy(0.05));
        let mut engine = InterpolationEngine::new();
        engine.tick(f32::NAN, Mode::Formed, std::slice::from_mut(&mut group));
        engine.tick(-1.0, Mode::Formed, std::slice::from_mut(&mut group));
        assert_eq!(engine.time(), 0.0);
        assert!(group.current().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_empty_group_ticks() {
        let mut group = ParticleGroup::new(GroupKind::Photos, GroupLayout::default(), MotionPolicy::default());
        let mut engine = InterpolationEngine::new();
        engine.tick(0.016, Mode::Formed, std::slice::from_mut(&mut group));
        assert!(group.positions().is_empty());
    }
}
