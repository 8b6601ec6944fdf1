//! Content hashing used to skip re-parsing files whose bytes did not change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A 128-bit XXH3 hash of a source file's bytes.
///
/// File-system watchers frequently report a change for a save that did not
/// alter the content. Comparing hashes lets the project service drop those
/// events before they reach the fast-parse collaborator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Hashes a byte slice with XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Reads a file and hashes its content.
    pub fn of_file(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}{:02x}..)", self.0[0], self.0[1], self.0[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_content_equal_hash() {
        let a = ContentHash::from_bytes(b"module top; endmodule");
        let b = ContentHash::from_bytes(b"module top; endmodule");
        assert_eq!(a, b);
    }

    #[test]
    fn whitespace_edit_changes_hash() {
        let a = ContentHash::from_bytes(b"module top; endmodule");
        let b = ContentHash::from_bytes(b"module top;  endmodule");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_hex() {
        let h = ContentHash::from_bytes(b"entity e is end;");
        let s = h.to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn file_hash_matches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.v");
        std::fs::write(&path, "module leaf; endmodule").unwrap();
        let from_file = ContentHash::of_file(&path).unwrap();
        assert_eq!(from_file, ContentHash::from_bytes(b"module leaf; endmodule"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ContentHash::of_file(Path::new("/nonexistent/trellis/file.v")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
