use std::ops::{Add, Sub, Mul, Neg};
use serde::{Serialize, Deserialize};

/// 3D vector for positions, rotations, and colors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build from spherical coordinates (radius, azimuth around Y, polar angle from +Y)
    pub fn from_spherical(r: f32, theta: f32, phi: f32) -> Self {
        Self {
            x: r * phi.sin() * theta.cos(),
            y: r * phi.cos(),
            z: r * phi.sin() * theta.sin(),
        }
    }

    /// Point on a horizontal circle at height `y`
    pub fn from_cylindrical(radius: f32, angle: f32, y: f32) -> Self {
        Self {
            x: radius * angle.cos(),
            y,
            z: radius * angle.sin(),
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn scale(&self, s: f32) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }

    /// Rotate around the vertical axis by `angle` radians
    pub fn rotate_y(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Read particle `index` out of a flat xyz buffer
    #[inline]
    pub fn read(buffer: &[f32], index: usize) -> Self {
        let i = index * 3;
        Self::new(buffer[i], buffer[i + 1], buffer[i + 2])
    }

    /// Write into particle slot `index` of a flat xyz buffer
    #[inline]
    pub fn write(&self, buffer: &mut [f32], index: usize) {
        let i = index * 3;
        buffer[i] = self.x;
        buffer[i + 1] = self.y;
        buffer[i + 2] = self.z;
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}
