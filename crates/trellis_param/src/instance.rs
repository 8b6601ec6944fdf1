//! Instantiation edges.

use serde::{Deserialize, Serialize};
use trellis_common::Ident;
use trellis_source::Range;

use crate::ids::ModuleId;
use crate::raw::RawInstance;

/// Which search tier produced an instance's binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    /// Declared in the instantiating file.
    Current,
    /// Declared in a file included by the instantiating file.
    Include,
    /// Declared in some other registered file.
    Others,
    /// Not found; the instance waits in the unresolved pool.
    Unknown,
}

impl ResolutionStatus {
    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            ResolutionStatus::Current => "current",
            ResolutionStatus::Include => "include",
            ResolutionStatus::Others => "others",
            ResolutionStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One instantiation inside a module.
#[derive(Debug, Clone)]
pub struct HdlInstance {
    pub(crate) name: String,
    pub(crate) type_name: Ident,
    pub(crate) status: ResolutionStatus,
    pub(crate) target: Option<ModuleId>,
    pub(crate) target_path: Option<String>,
    /// Whether the binding was counted as a local referrer.
    pub(crate) local: bool,
    pub(crate) owner: ModuleId,
    pub(crate) instparams: Option<Range>,
    pub(crate) instports: Option<Range>,
    pub(crate) range: Range,
}

impl HdlInstance {
    pub(crate) fn new(raw: &RawInstance, type_name: Ident, owner: ModuleId) -> Self {
        Self {
            name: raw.name.clone(),
            type_name,
            status: ResolutionStatus::Unknown,
            target: None,
            target_path: None,
            local: false,
            owner,
            instparams: raw.instparams,
            instports: raw.instports,
            range: raw.range,
        }
    }

    /// Copies the argument ranges of a re-parse.
    pub(crate) fn update_ranges(&mut self, raw: &RawInstance) {
        self.instparams = raw.instparams;
        self.instports = raw.instports;
        self.range = raw.range;
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interned type name as written.
    pub fn type_name(&self) -> Ident {
        self.type_name
    }

    /// Current resolution status.
    pub fn status(&self) -> ResolutionStatus {
        self.status
    }

    /// Bound module, if resolved.
    pub fn target(&self) -> Option<ModuleId> {
        self.target
    }

    /// Path of the file declaring the bound module.
    pub fn target_path(&self) -> Option<&str> {
        self.target_path.as_deref()
    }

    /// Owning module.
    pub fn owner(&self) -> ModuleId {
        self.owner
    }

    /// Parameter-override list range.
    pub fn instparams(&self) -> Option<Range> {
        self.instparams
    }

    /// Port-connection list range.
    pub fn instports(&self) -> Option<Range> {
        self.instports
    }

    /// Range of the whole instantiation.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Returns `true` if bound to a module.
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// A found resolution candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolution {
    pub(crate) module: ModuleId,
    pub(crate) path: String,
    pub(crate) status: ResolutionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_order_is_priority_order() {
        assert!(ResolutionStatus::Current < ResolutionStatus::Include);
        assert!(ResolutionStatus::Include < ResolutionStatus::Others);
        assert!(ResolutionStatus::Others < ResolutionStatus::Unknown);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ResolutionStatus::Include).unwrap(),
            "\"include\""
        );
        assert_eq!(ResolutionStatus::Others.to_string(), "others");
    }
}
