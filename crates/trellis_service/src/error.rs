//! Service error type.

use trellis_config::ConfigError;
use trellis_param::ParamError;

/// Errors reported by the project service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A graph mutation was rejected; the graph is unchanged.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// The project configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// `trellis.toml` names no fast-parse command.
    #[error("no fast parser configured; set [parser] command in trellis.toml")]
    NoParser,
    /// The project actor is no longer running.
    #[error("project service stopped")]
    Stopped,
}
