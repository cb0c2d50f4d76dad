//! Particle groups and the interpolation engine that animates them.
//!
//! Each group owns flat `[x, y, z, x, y, z, ...]` buffers so they can be
//! handed to the GPU without repacking.

mod group;
mod engine;

pub use group::{GroupKind, GroupLayout, ParticleGroup, FocusOverride};
pub use engine::InterpolationEngine;
