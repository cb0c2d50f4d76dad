pub mod vec3;
pub mod color;
pub mod noise;

pub use vec3::Vec3;
pub use color::hsv_to_rgb;
pub use noise::{drift, twinkle};
