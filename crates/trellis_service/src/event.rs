//! File events accepted by the project service.

use trellis_config::ScopeLayout;

/// A change to the set or contents of project files.
///
/// Events for one path are applied in the order they are sent.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEvent {
    /// A file appeared.
    Add(String),
    /// A file's contents changed.
    Change(String),
    /// A file was removed.
    Unlink(String),
    /// The project configuration changed.
    ///
    /// A different layout rebuilds the graph from `files`; the same layout
    /// only adds and removes the paths that differ.
    Reconfigure {
        /// New scope layout.
        layout: ScopeLayout,
        /// Complete list of project files under the new configuration.
        files: Vec<String>,
    },
}

impl ProjectEvent {
    /// The affected path, for single-file events.
    pub fn path(&self) -> Option<&str> {
        match self {
            ProjectEvent::Add(p) | ProjectEvent::Change(p) | ProjectEvent::Unlink(p) => Some(p),
            ProjectEvent::Reconfigure { .. } => None,
        }
    }

    /// Short event kind for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ProjectEvent::Add(_) => "add",
            ProjectEvent::Change(_) => "change",
            ProjectEvent::Unlink(_) => "unlink",
            ProjectEvent::Reconfigure { .. } => "reconfigure",
        }
    }
}

/// What applying an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The graph was updated.
    Applied,
    /// The file bytes match the last applied version; nothing was done.
    Unchanged,
}
