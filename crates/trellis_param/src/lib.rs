//! The incremental module-dependency graph of an HDL project.
//!
//! [`HdlParam`] tracks which module types each file declares, which modules
//! instantiate which others, and which modules are therefore top-level within
//! each build scope. It is updated file by file as the project changes:
//!
//! - [`HdlParam::initialize`] builds the graph for a list of files,
//! - [`HdlParam::add_hdl_file`], [`HdlParam::update_hdl_file`] and
//!   [`HdlParam::delete_hdl_file`] apply single-file events,
//! - queries such as [`HdlParam::get_all_top_modules`] and
//!   [`HdlParam::get_all_dependences`] read the current state.
//!
//! File contents are supplied by a [`FastParser`] as [`ParsedFile`] values;
//! this crate never reads HDL text itself.

#![warn(missing_docs)]

pub mod arena;
pub mod deps;
pub mod error;
pub mod file;
pub mod ids;
pub mod instance;
pub mod invariants;
pub mod module;
pub mod param;
pub mod parser;
pub mod query;
pub mod raw;
mod resolve;
mod update;

pub use deps::{Dependencies, InstanceNode, InstanceTree};
pub use error::{ParamError, ParseError};
pub use file::HdlFile;
pub use ids::{InstanceId, ModuleId};
pub use instance::{HdlInstance, ResolutionStatus};
pub use module::HdlModule;
pub use param::HdlParam;
pub use parser::{FastParser, MemoryParser};
pub use query::GraphStats;
pub use raw::{
    MacroDefine, MacroInclude, MacroTable, Param, ParsedFile, Port, PortDirection, RawInstance,
    RawModule,
};
