/// Errors surfaced by the scene. Input absence (no hand, no photos) is never one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("Config error: {0}")]
    Config(String),
    /// Camera or landmark model could not be used; gesture control is disabled
    #[error("Detector unavailable: {0}")]
    Detector(String),
}

impl From<serde_yaml::Error> for SceneError {
    fn from(e: serde_yaml::Error) -> Self {
        SceneError::Config(format!("YAML parse error: {}", e))
    }
}
