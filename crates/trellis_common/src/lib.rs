//! Shared foundational types used across the Trellis workspace.
//!
//! This crate provides interned identifiers for module and type names, content
//! hashing for change detection, and the internal-error result type used by
//! graph invariant checks.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{InternalError, TrellisResult};
