//! Procedural target configurations: where each particle sits when the tree
//! is formed and when it is scattered.

pub mod layouts;
mod generator;

pub use generator::ConfigurationGenerator;
