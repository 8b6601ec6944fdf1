//! Read-only queries over the registry.
//!
//! Queries never fail: unknown paths and names yield `None` or empty lists.

use serde::Serialize;
use trellis_config::FileScope;
use trellis_source::path;

use crate::file::HdlFile;
use crate::ids::{InstanceId, ModuleId};
use crate::instance::HdlInstance;
use crate::module::HdlModule;
use crate::param::HdlParam;

/// Entity counts for status output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Registered files.
    pub files: usize,
    /// Declared modules.
    pub modules: usize,
    /// Instances of all modules.
    pub instances: usize,
    /// Instances waiting in the unresolved pool.
    pub unresolved: usize,
    /// Modules in the global top set.
    pub top_modules: usize,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files, {} modules, {} instances ({} unresolved), {} top modules",
            self.files, self.modules, self.instances, self.unresolved, self.top_modules
        )
    }
}

impl HdlParam {
    /// Returns the file registered under `file_path`.
    pub fn get_hdl_file(&self, file_path: &str) -> Option<&HdlFile> {
        self.files.get(&path::normalize(file_path))
    }

    /// Returns `true` if `file_path` is registered.
    pub fn has_hdl_file(&self, file_path: &str) -> bool {
        self.get_hdl_file(file_path).is_some()
    }

    /// Registered files in registration order.
    pub fn get_all_hdl_files(&self) -> impl Iterator<Item = &HdlFile> {
        self.files.values()
    }

    /// Number of registered files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Id of the module `name` declared in `file_path`.
    pub fn module_id(&self, file_path: &str, name: &str) -> Option<ModuleId> {
        let name = self.interner.get(name)?;
        self.get_hdl_file(file_path)?.module_id(name)
    }

    /// Returns the module `name` declared in `file_path`.
    pub fn get_hdl_module(&self, file_path: &str, name: &str) -> Option<&HdlModule> {
        self.module(self.module_id(file_path, name)?)
    }

    /// Returns `true` if `file_path` declares a module `name`.
    pub fn has_hdl_module(&self, file_path: &str, name: &str) -> bool {
        self.module_id(file_path, name).is_some()
    }

    /// Looks up a module by id.
    pub fn module(&self, id: ModuleId) -> Option<&HdlModule> {
        self.modules.get(id)
    }

    /// Looks up an instance by id.
    pub fn instance(&self, id: InstanceId) -> Option<&HdlInstance> {
        self.instances.get(id)
    }

    /// Every module, by file registration order then declaration order.
    pub fn get_all_hdl_modules(&self) -> Vec<&HdlModule> {
        self.files
            .values()
            .flat_map(|f| f.module_ids())
            .filter_map(|id| self.modules.get(id))
            .collect()
    }

    /// Top modules: the global set, or the source set followed by the
    /// simulation set.
    pub fn get_all_top_modules(&self, global: bool) -> Vec<&HdlModule> {
        if global {
            self.collect(self.top_modules.iter())
        } else {
            self.collect(self.src_top_modules.iter().chain(self.sim_top_modules.iter()))
        }
    }

    /// Modules not instantiated by any non-simulation module.
    pub fn get_src_top_modules(&self) -> Vec<&HdlModule> {
        self.collect(self.src_top_modules.iter())
    }

    /// Simulation modules not instantiated by any other simulation module.
    pub fn get_sim_top_modules(&self) -> Vec<&HdlModule> {
        self.collect(self.sim_top_modules.iter())
    }

    /// Whether a module is a top module, globally or within its own scope.
    pub fn is_top_module(&self, file_path: &str, name: &str, global: bool) -> bool {
        let Some(id) = self.module_id(file_path, name) else {
            return false;
        };
        if global {
            return self.top_modules.contains(&id);
        }
        self.modules
            .get(id)
            .is_some_and(|m| self.scope_tops(m.scope).contains(&id))
    }

    /// Top modules for a scope.
    ///
    /// With a unified layout every scope sees the source and simulation sets
    /// together. Library scopes have no top modules of their own.
    pub fn get_top_modules_by_type(&self, scope: FileScope) -> Vec<&HdlModule> {
        if self.layout.is_unified() {
            return self.get_all_top_modules(false);
        }
        match scope {
            FileScope::Src => self.get_src_top_modules(),
            FileScope::Sim => self.get_sim_top_modules(),
            FileScope::LocalLib | FileScope::RemoteLib => Vec::new(),
        }
    }

    /// Number of instances waiting in the unresolved pool.
    pub fn get_unhandle_instance_number(&self) -> usize {
        self.unresolved.values().map(|set| set.len()).sum()
    }

    /// The oldest unresolved instance of type `type_name`.
    pub fn get_unhandle_instance_by_type(&self, type_name: &str) -> Option<&HdlInstance> {
        let type_name = self.interner.get(type_name)?;
        let id = self.unresolved.get(&type_name)?.first()?;
        self.instances.get(*id)
    }

    /// All unresolved instances of type `type_name`, oldest first.
    pub fn get_unhandle_instances_by_type(&self, type_name: &str) -> Vec<&HdlInstance> {
        let Some(type_name) = self.interner.get(type_name) else {
            return Vec::new();
        };
        self.unresolved
            .get(&type_name)
            .map(|set| set.iter().filter_map(|id| self.instances.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Every unresolved instance, grouped by type name.
    pub fn unresolved_instances(&self) -> Vec<(InstanceId, &HdlInstance)> {
        self.unresolved
            .values()
            .flat_map(|set| set.iter())
            .filter_map(|id| self.instances.get(*id).map(|inst| (*id, inst)))
            .collect()
    }

    /// Entity counts.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            files: self.files.len(),
            modules: self.modules.len(),
            instances: self.instances.len(),
            unresolved: self.get_unhandle_instance_number(),
            top_modules: self.top_modules.len(),
        }
    }

    fn collect<'a>(&'a self, ids: impl Iterator<Item = &'a ModuleId>) -> Vec<&'a HdlModule> {
        ids.filter_map(|id| self.modules.get(*id)).collect()
    }
}
