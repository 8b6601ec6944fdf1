//! Source locations, path normalization and language detection for HDL files.
//!
//! Every file in a project registry is keyed by its normalized absolute path
//! (see [`path::to_slash`]), and every declaration carries a [`Range`] in
//! editor coordinates (zero-based line and character).

#![warn(missing_docs)]

pub mod language;
pub mod path;
pub mod position;

pub use language::HdlLanguage;
pub use position::{Position, Range};
