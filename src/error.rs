//! Error types for VahanaIO

use crate::session::SessionState;
use std::path::PathBuf;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// VahanaIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Engine module could not be loaded
    #[error("Failed to load engine module {path:?}: {source}")]
    Load {
        /// Path of the module that failed to load
        path: PathBuf,
        /// Loader error
        source: libloading::Error,
    },

    /// Engine module is missing a required export
    #[error("Engine module missing symbol `{symbol}`: {source}")]
    MissingSymbol {
        /// Name of the symbol that could not be resolved
        symbol: String,
        /// Loader error
        source: libloading::Error,
    },

    /// Engine record does not match the expected layout
    #[error("Record layout mismatch: {0}")]
    RecordLayout(String),

    /// Operation not permitted in the session's current lifecycle state
    #[error("Cannot {operation} while session is {state:?}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the session was in
        state: SessionState,
    },

    /// Engine module is already driven by another live session
    #[error("Engine module already in use by another session: {0:?}")]
    ModuleInUse(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}
