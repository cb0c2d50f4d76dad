pub mod config;
pub mod photos;

pub use config::{
    SceneConfig, TreeParams, GroupCounts, MotionPolicy, MotionConfig,
    GestureParams, SlideshowParams, CameraParams,
};
pub use photos::PhotoList;
