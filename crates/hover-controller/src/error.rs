use std::path::PathBuf;

/// Errors that can occur while loading or validating a controller config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and non-negative, got {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("failed to parse controller config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize controller config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("I/O error reading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Errors that prevent a controller from attaching to a character.
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error("character has no collider geometry")]
    MissingCollider,

    #[error("collider geometry is not finite (local offset {0}, center offset {1})")]
    InvalidGeometry(f32, f32),

    #[error("invalid controller config: {0}")]
    InvalidConfig(#[from] ConfigError),
}
