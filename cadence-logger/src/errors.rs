/// Errors raised while recording or exporting a session
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No viewer configured")]
    NoViewer,
    #[error("Viewer failed: {0}")]
    Viewer(String),
    #[error("Background task failed: {0}")]
    Task(String),
}

/// Errors raised while loading or validating the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}
