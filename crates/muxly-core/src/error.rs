//! Error types for muxly.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a path expression could not be resolved to an absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// `.`, `..`, `./x` or `../x`
    #[error("relative paths not allowed: {0}")]
    Relative(String),

    /// Any other form that does not resolve to an absolute path
    #[error("path type not supported: '{0}'")]
    Unsupported(String),

    /// `$VAR` or `${VAR}` referencing an unset variable
    #[error("environment variable not set: {0}")]
    UndefinedVariable(String),

    /// The home directory could not be determined
    #[error("could not determine home directory")]
    NoHomeDir,
}

/// Main error type for muxly operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Path expression could not be resolved
    #[error("Path error: {0}")]
    Path(#[from] PathError),

    /// A scan root could not be walked at all
    #[error("Cannot walk {}: {source}", root.display())]
    Walk {
        /// The scan root that failed
        root: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Configuration is invalid or ambiguous
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error("Cannot read config file {}: {source}", path.display())]
    ConfigRead {
        /// Location that was read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Invalid YAML in a config or override file
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A multiplexer primitive failed
    #[error("tmux {operation} failed: {message}")]
    Multiplexer {
        /// Primitive that failed (e.g. "new-session")
        operation: String,
        /// Stderr or spawn error text
        message: String,
    },

    /// The picker process failed (cancellation is not an error)
    #[error("Picker error: {0}")]
    Picker(String),

    /// A name did not match any entry or live session
    #[error("No entry or session named: {0}")]
    NoSuchEntry(String),

    /// A template or layout without windows reached session creation
    #[error("No windows defined for session: {0}")]
    NoWindows(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a multiplexer error for the given primitive.
    pub fn multiplexer(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Multiplexer {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
