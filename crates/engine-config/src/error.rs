use thiserror::Error;

/// Errors raised while assembling run configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Every required key that was absent or empty.
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingVars(Vec<String>),

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },

    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),
}
