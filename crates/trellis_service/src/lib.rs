//! Serialized application of file events to a project's dependency graph.
//!
//! A [`ProjectService`] owns one [`HdlParam`](trellis_param::HdlParam) behind
//! an actor task. Editor hosts forward watcher events as [`ProjectEvent`]s
//! through a [`ProjectHandle`]; the actor parses changed files with the
//! configured [`FastParser`](trellis_param::FastParser) (usually a
//! [`CommandParser`]) and applies the results one event at a time.

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod event;
pub mod project;

pub use command::CommandParser;
pub use error::ServiceError;
pub use event::{EventOutcome, ProjectEvent};
pub use project::{ProjectHandle, ProjectService};
