use std::f32::consts::TAU;
use crate::data::CameraParams;
use crate::math::Vec3;
use super::mode::InteractionState;

/// Orbit camera following the rotation and zoom signals
#[derive(Debug, Clone)]
pub struct CameraRig {
    params: CameraParams,
    angle: f32,
    distance: f32,
}

impl CameraRig {
    pub fn new(params: CameraParams) -> Self {
        Self {
            angle: 0.0,
            distance: params.base_distance.clamp(params.min_distance, params.max_distance),
            params,
        }
    }

    /// Integrate the orbit speed and ease the distance toward the zoom target
    pub fn update(&mut self, dt: f32, state: &InteractionState) {
        self.angle = (self.angle + state.rotation_speed * dt).rem_euclid(TAU);
        let target = self.target_distance(state.zoom_delta);
        self.distance += (target - self.distance) * self.params.smoothing;
    }

    /// Distance the camera settles at for a given zoom signal
    pub fn target_distance(&self, zoom: f32) -> f32 {
        let p = &self.params;
        (p.base_distance + zoom.clamp(-1.0, 1.0) * p.zoom_range).clamp(p.min_distance, p.max_distance)
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Camera position orbiting the origin, looking at it
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.angle.sin(),
            self.params.height,
            self.distance * self.angle.cos(),
        )
    }
}
