//! Module and entity definitions.

use indexmap::{IndexMap, IndexSet};
use trellis_common::Ident;
use trellis_config::FileScope;
use trellis_source::Range;

use crate::ids::InstanceId;
use crate::raw::{Param, Port, RawModule};

/// One module/entity declaration, keyed by (owning file path, name).
#[derive(Debug, Clone)]
pub struct HdlModule {
    pub(crate) path: String,
    pub(crate) name: Ident,
    pub(crate) scope: FileScope,
    pub(crate) range: Range,
    pub(crate) ports: Vec<Port>,
    pub(crate) params: Vec<Param>,
    pub(crate) instances: IndexMap<String, InstanceId>,
    /// Every instance bound to this module.
    pub(crate) global_referrers: IndexSet<InstanceId>,
    /// Bound instances whose owner shares this module's scope.
    pub(crate) local_referrers: IndexSet<InstanceId>,
}

impl HdlModule {
    pub(crate) fn new(path: String, name: Ident, scope: FileScope, raw: &RawModule) -> Self {
        Self {
            path,
            name,
            scope,
            range: raw.range,
            ports: raw.ports.clone(),
            params: raw.params.clone(),
            instances: IndexMap::new(),
            global_referrers: IndexSet::new(),
            local_referrers: IndexSet::new(),
        }
    }

    /// Replaces the declaration data (not the instances) from a re-parse.
    pub(crate) fn update_declaration(&mut self, raw: &RawModule) {
        self.range = raw.range;
        self.ports = raw.ports.clone();
        self.params = raw.params.clone();
    }

    /// Path of the declaring file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Interned module name. Resolve it with
    /// [`HdlParam::name_of`](crate::HdlParam::name_of).
    pub fn name(&self) -> Ident {
        self.name
    }

    /// Scope of the declaring file.
    pub fn scope(&self) -> FileScope {
        self.scope
    }

    /// Declaration range.
    pub fn range(&self) -> Range {
        self.range
    }

    /// Ports.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Parameters.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Returns the instance named `name`.
    pub fn instance_id(&self, name: &str) -> Option<InstanceId> {
        self.instances.get(name).copied()
    }

    /// Instances in declaration order.
    pub fn instance_ids(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.instances.values().copied()
    }

    /// Number of instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Instances bound to this module from anywhere.
    pub fn global_referrers(&self) -> &IndexSet<InstanceId> {
        &self.global_referrers
    }

    /// Instances bound to this module from modules of the same scope.
    pub fn local_referrers(&self) -> &IndexSet<InstanceId> {
        &self.local_referrers
    }
}
