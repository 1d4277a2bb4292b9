//! Error types for Backdrop

use thiserror::Error;

/// The main error type for Backdrop operations
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid length '{value}' for {field}: expected pixels or a percentage like \"100%\"")]
    InvalidLength { field: String, value: String },

    #[error("Duplicate container id: {0}")]
    DuplicateContainer(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Surface error: {0}")]
    SurfaceError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias for Backdrop operations
pub type Result<T> = std::result::Result<T, BackdropError>;

impl From<toml::de::Error> for BackdropError {
    fn from(err: toml::de::Error) -> Self {
        BackdropError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for BackdropError {
    fn from(err: toml::ser::Error) -> Self {
        BackdropError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err: BackdropError = toml::from_str::<toml::value::Table>("a = ").unwrap_err().into();
        assert!(matches!(err, BackdropError::TomlParseError(_)));
    }

    #[test]
    fn invalid_length_message_names_field() {
        let err = BackdropError::InvalidLength {
            field: "hero.height".into(),
            value: "tall".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("hero.height"));
        assert!(msg.contains("tall"));
    }
}
