//! Error types for parsing and registry mutations.

/// Why the fast-parse collaborator could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No result is available for the path.
    #[error("no parse result for {path}")]
    NotFound {
        /// The requested path.
        path: String,
    },
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The requested path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The parser ran but reported failure.
    #[error("parser failed on {path}: {reason}")]
    Failed {
        /// The requested path.
        path: String,
        /// Parser-provided reason.
        reason: String,
    },
    /// The parser output could not be decoded.
    #[error("malformed parser output for {path}: {reason}")]
    Malformed {
        /// The requested path.
        path: String,
        /// Decoder message.
        reason: String,
    },
}

/// Errors returned by registry mutations.
///
/// When a mutation returns `Err`, the registry is left exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// The collaborator produced no result; the previous state is kept.
    #[error("parse unavailable: {0}")]
    ParseUnavailable(#[from] ParseError),
    /// The path is already part of the registry.
    #[error("file {0} is already registered")]
    AlreadyRegistered(String),
    /// The path is not part of the registry.
    #[error("file {0} is not registered")]
    NotRegistered(String),
    /// No module with that name is declared in the file.
    #[error("module {name} not found in {path}")]
    ModuleNotFound {
        /// File path.
        path: String,
        /// Module name.
        name: String,
    },
}
