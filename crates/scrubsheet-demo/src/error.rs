use std::path::PathBuf;

use scrubsheet_core::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid panel configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown scenario: {name} (try `list-scenarios`)")]
    UnknownScenario { name: String },

    #[error("script not found: {path}")]
    MissingScript { path: PathBuf },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DemoError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::UnknownScenario { .. }
            | Self::MissingScript { .. }
            | Self::InvalidArgument { .. } => 2,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DemoError;
    use scrubsheet_core::ConfigError;

    #[test]
    fn invalid_constructor_formats_message() {
        let error = DemoError::invalid("fps must be positive");
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.to_string(), "invalid argument: fps must be positive");
    }

    #[test]
    fn config_errors_are_usage_errors() {
        let error = DemoError::from(ConfigError::PanelHeight(-1.0));
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("panel height"));
    }

    #[test]
    fn io_errors_exit_with_one() {
        let error = DemoError::from(std::io::Error::other("disk full"));
        assert_eq!(error.exit_code(), 1);
        assert_eq!(error.to_string(), "I/O error: disk full");
    }
}
