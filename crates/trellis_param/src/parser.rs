//! The fast-parse collaborator seam.
//!
//! The registry never parses HDL text itself. It asks a [`FastParser`] for a
//! [`ParsedFile`] and treats any error as "parse unavailable": the failure is
//! logged and the graph keeps its previous state for that path.

use std::collections::HashMap;

use parking_lot::RwLock;
use trellis_source::path;

use crate::error::ParseError;
use crate::raw::ParsedFile;

/// Produces the module structure of one file.
///
/// Implementations must be safe to call repeatedly for the same path and must
/// not assume any prior state.
pub trait FastParser: Send + Sync {
    /// Parses the file at `path` (normalized, forward slashes).
    fn fast(&self, path: &str) -> Result<ParsedFile, ParseError>;
}

impl<F> FastParser for F
where
    F: Fn(&str) -> Result<ParsedFile, ParseError> + Send + Sync,
{
    fn fast(&self, path: &str) -> Result<ParsedFile, ParseError> {
        self(path)
    }
}

/// A parser that serves pre-built results from memory.
///
/// Used by tests and by tools that obtain parse results out of band. Paths
/// are normalized on insertion and lookup.
#[derive(Debug, Default)]
pub struct MemoryParser {
    files: RwLock<HashMap<String, ParsedFile>>,
}

impl MemoryParser {
    /// Creates an empty parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) the result for `path`.
    pub fn insert(&self, file_path: &str, parsed: ParsedFile) {
        self.files.write().insert(path::normalize(file_path), parsed);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(self, file_path: &str, parsed: ParsedFile) -> Self {
        self.insert(file_path, parsed);
        self
    }

    /// Forgets the result for `path`, making later parses fail.
    pub fn remove(&self, file_path: &str) -> Option<ParsedFile> {
        self.files.write().remove(&path::normalize(file_path))
    }

    /// Returns `true` if a result is stored for `path`.
    pub fn contains(&self, file_path: &str) -> bool {
        self.files.read().contains_key(&path::normalize(file_path))
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl FastParser for MemoryParser {
    fn fast(&self, file_path: &str) -> Result<ParsedFile, ParseError> {
        self.files
            .read()
            .get(&path::normalize(file_path))
            .cloned()
            .ok_or_else(|| ParseError::NotFound {
                path: file_path.to_string(),
            })
    }
}
