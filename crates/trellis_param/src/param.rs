//! The registry root: lifecycle, file registration and entity bookkeeping.
//!
//! [`HdlParam`] owns every file, module and instance of one project. Modules
//! and instances live in generational arenas and refer to each other by id;
//! resolution ([`crate::resolve`]) and re-parse diffing ([`crate::update`])
//! are implemented as further `impl HdlParam` blocks on top of the primitives
//! defined here.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use trellis_common::{Ident, Interner};
use trellis_config::{FileScope, ScopeLayout};
use trellis_source::{path, HdlLanguage};

use crate::arena::Arena;
use crate::error::ParamError;
use crate::file::HdlFile;
use crate::ids::{InstanceId, ModuleId};
use crate::instance::HdlInstance;
use crate::module::HdlModule;
use crate::parser::FastParser;
use crate::raw::{ParsedFile, RawInstance, RawModule};

/// The module-dependency graph of one project.
pub struct HdlParam {
    pub(crate) layout: ScopeLayout,
    pub(crate) interner: Interner,
    /// Registered files in registration order (the order of the `Others` tier).
    pub(crate) files: IndexMap<String, HdlFile>,
    pub(crate) modules: Arena<ModuleId, HdlModule>,
    pub(crate) instances: Arena<InstanceId, HdlInstance>,
    /// Modules with no referrers at all.
    pub(crate) top_modules: IndexSet<ModuleId>,
    /// Non-simulation modules with no same-scope referrers.
    pub(crate) src_top_modules: IndexSet<ModuleId>,
    /// Simulation modules with no same-scope referrers.
    pub(crate) sim_top_modules: IndexSet<ModuleId>,
    /// Unresolved instances keyed by the type name they wait for.
    pub(crate) unresolved: IndexMap<Ident, IndexSet<InstanceId>>,
    /// Every live instance keyed by its type name.
    pub(crate) by_type: HashMap<Ident, IndexSet<InstanceId>>,
}

impl HdlParam {
    /// Creates an empty registry that classifies files with `layout`.
    pub fn new(layout: ScopeLayout) -> Self {
        Self {
            layout,
            interner: Interner::new(),
            files: IndexMap::new(),
            modules: Arena::new(),
            instances: Arena::new(),
            top_modules: IndexSet::new(),
            src_top_modules: IndexSet::new(),
            sim_top_modules: IndexSet::new(),
            unresolved: IndexMap::new(),
            by_type: HashMap::new(),
        }
    }

    /// The layout used to classify files.
    pub fn layout(&self) -> &ScopeLayout {
        &self.layout
    }

    /// Empties the registry and switches to a new layout.
    pub fn set_layout(&mut self, layout: ScopeLayout) {
        self.dispose();
        self.layout = layout;
    }

    /// The interner holding module and type names.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Resolves an interned name.
    pub fn name_of(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    /// Builds the graph from scratch for `paths`.
    ///
    /// Every file is parsed and its modules registered before any instance is
    /// resolved, so the result does not depend on the order of `paths`.
    /// Files the parser cannot handle are logged and skipped. Returns the
    /// number of registered files.
    pub fn initialize<I, S>(&mut self, paths: I, parser: &dyn FastParser) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dispose();
        let mut pending = Vec::new();
        for p in paths {
            let key = path::normalize(p.as_ref());
            if self.files.contains_key(&key) {
                continue;
            }
            match parser.fast(&key) {
                Ok(parsed) => pending.extend(self.register_file(&key, parsed)),
                Err(err) => tracing::warn!(path = %key, error = %err, "parse unavailable, skipping file"),
            }
        }
        for (module, instances) in &pending {
            self.create_instances(*module, instances);
        }
        tracing::debug!(
            files = self.files.len(),
            modules = self.modules.len(),
            unresolved = self.get_unhandle_instance_number(),
            "registry initialized"
        );
        self.files.len()
    }

    /// Removes everything. The layout is kept.
    pub fn dispose(&mut self) {
        self.files.clear();
        self.modules.clear();
        self.instances.clear();
        self.top_modules.clear();
        self.src_top_modules.clear();
        self.sim_top_modules.clear();
        self.unresolved.clear();
        self.by_type.clear();
    }

    /// Parses and registers a new file.
    pub fn add_hdl_file(&mut self, file_path: &str, parser: &dyn FastParser) -> Result<(), ParamError> {
        let key = path::normalize(file_path);
        if self.files.contains_key(&key) {
            return Err(ParamError::AlreadyRegistered(key));
        }
        let parsed = parser.fast(&key)?;
        self.add_parsed_file(&key, parsed)
    }

    /// Registers a new file from an already obtained parse result.
    ///
    /// Instances of the new modules are resolved against the whole registry,
    /// then pending and lower-tier instances elsewhere are rebound to the new
    /// modules where they now resolve better.
    pub fn add_parsed_file(&mut self, file_path: &str, parsed: ParsedFile) -> Result<(), ParamError> {
        let key = path::normalize(file_path);
        if self.files.contains_key(&key) {
            return Err(ParamError::AlreadyRegistered(key));
        }
        let created = self.register_file(&key, parsed);
        for (module, instances) in &created {
            self.create_instances(*module, instances);
        }
        for (module, _) in created {
            self.on_module_created(module);
        }
        tracing::debug!(path = %key, "file added");
        Ok(())
    }

    /// Adds a file discovered by a project scan.
    ///
    /// Unlike [`add_hdl_file`](Self::add_hdl_file), a path that is already
    /// registered is re-parsed in place instead of rejected.
    pub fn add_hdl_path(&mut self, file_path: &str, parser: &dyn FastParser) -> Result<(), ParamError> {
        if self.has_hdl_file(file_path) {
            self.update_hdl_file(file_path, parser)
        } else {
            self.add_hdl_file(file_path, parser)
        }
    }

    /// Removes a file and every module it declares.
    ///
    /// Instances elsewhere that were bound to those modules fall through to
    /// the next matching definition or, failing that, enter the unresolved
    /// pool.
    pub fn delete_hdl_file(&mut self, file_path: &str) -> Result<(), ParamError> {
        let key = path::normalize(file_path);
        let Some(file) = self.files.get(&key) else {
            return Err(ParamError::NotRegistered(key));
        };
        let module_ids: Vec<ModuleId> = file.module_ids().collect();
        for module in &module_ids {
            self.delete_module_instances(*module);
        }
        self.files.shift_remove(&key);
        for module in module_ids {
            self.destroy_module(module);
        }
        tracing::debug!(path = %key, "file removed");
        Ok(())
    }

    /// Creates the file entry and its modules without touching instances.
    /// Returns the new modules with the instances still to be created.
    fn register_file(&mut self, key: &str, parsed: ParsedFile) -> Vec<(ModuleId, Vec<RawInstance>)> {
        let language = language_of(key, &parsed.language_id);
        let scope = self.layout.classify(key);
        self.files.insert(
            key.to_string(),
            HdlFile::new(key.to_string(), language, parsed.macro_table, scope),
        );
        let mut created = Vec::new();
        for raw in parsed.content {
            if let Some(module) = self.create_module(key, &raw) {
                created.push((module, raw.instances));
            }
        }
        created
    }

    /// Top-module set of a scope. Everything but simulation files shares the
    /// source set.
    pub(crate) fn scope_tops(&self, scope: FileScope) -> &IndexSet<ModuleId> {
        match scope {
            FileScope::Sim => &self.sim_top_modules,
            _ => &self.src_top_modules,
        }
    }

    pub(crate) fn scope_tops_mut(&mut self, scope: FileScope) -> &mut IndexSet<ModuleId> {
        match scope {
            FileScope::Sim => &mut self.sim_top_modules,
            _ => &mut self.src_top_modules,
        }
    }

    /// Declares a module in a registered file. A new module has no referrers
    /// and therefore starts in both of its top sets.
    pub(crate) fn create_module(&mut self, key: &str, raw: &RawModule) -> Option<ModuleId> {
        let name = self.interner.get_or_intern(&raw.name);
        let file = self.files.get(key)?;
        if file.has_module(name) {
            tracing::warn!(path = %key, module = %raw.name, "duplicate module name ignored");
            return None;
        }
        let scope = file.scope;
        let id = self
            .modules
            .alloc(HdlModule::new(key.to_string(), name, scope, raw));
        if let Some(file) = self.files.get_mut(key) {
            file.modules.insert(name, id);
        }
        self.top_modules.insert(id);
        self.scope_tops_mut(scope).insert(id);
        tracing::debug!(path = %key, module = %raw.name, %scope, "module created");
        Some(id)
    }

    /// Removes a module: its own instances are deleted, and every instance
    /// bound to it is detached and re-resolved against what remains.
    pub(crate) fn destroy_module(&mut self, id: ModuleId) {
        let Some(module) = self.modules.get(id) else {
            return;
        };
        let key = module.path.clone();
        let name = module.name;
        if let Some(file) = self.files.get_mut(&key) {
            file.modules.shift_remove(&name);
        }
        self.delete_module_instances(id);

        let referrers: Vec<InstanceId> = self
            .modules
            .get(id)
            .map(|m| m.global_referrers.iter().copied().collect())
            .unwrap_or_default();
        for inst in &referrers {
            self.unbind(*inst);
        }
        self.top_modules.shift_remove(&id);
        self.src_top_modules.shift_remove(&id);
        self.sim_top_modules.shift_remove(&id);
        self.modules.remove(id);
        tracing::debug!(path = %key, module = %self.name_of(name), demoted = referrers.len(), "module destroyed");

        for inst in referrers {
            if self.instances.contains(inst) {
                self.resolve_instance(inst);
            }
        }
    }

    pub(crate) fn create_instances(&mut self, owner: ModuleId, raws: &[RawInstance]) {
        for raw in raws {
            self.create_instance(owner, raw);
        }
    }

    /// Adds an instance to `owner` and resolves it.
    pub(crate) fn create_instance(&mut self, owner: ModuleId, raw: &RawInstance) -> Option<InstanceId> {
        let module = self.modules.get(owner)?;
        if module.instances.contains_key(&raw.name) {
            tracing::warn!(
                path = %module.path,
                instance = %raw.name,
                "duplicate instance name ignored"
            );
            return None;
        }
        let type_name = self.interner.get_or_intern(&raw.type_name);
        let id = self
            .instances
            .alloc(HdlInstance::new(raw, type_name, owner));
        if let Some(module) = self.modules.get_mut(owner) {
            module.instances.insert(raw.name.clone(), id);
        }
        self.by_type.entry(type_name).or_default().insert(id);
        self.resolve_instance(id);
        Some(id)
    }

    /// Unbinds and removes an instance.
    pub(crate) fn delete_instance(&mut self, id: InstanceId) {
        self.unbind(id);
        self.unpool(id);
        let Some(inst) = self.instances.remove(id) else {
            return;
        };
        if let Some(set) = self.by_type.get_mut(&inst.type_name) {
            set.shift_remove(&id);
            if set.is_empty() {
                self.by_type.remove(&inst.type_name);
            }
        }
        if let Some(owner) = self.modules.get_mut(inst.owner) {
            owner.instances.shift_remove(&inst.name);
        }
    }

    fn delete_module_instances(&mut self, id: ModuleId) {
        let own: Vec<InstanceId> = match self.modules.get(id) {
            Some(module) => module.instance_ids().collect(),
            None => return,
        };
        for inst in own {
            self.delete_instance(inst);
        }
    }
}

impl std::fmt::Debug for HdlParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdlParam")
            .field("files", &self.files.len())
            .field("modules", &self.modules.len())
            .field("instances", &self.instances.len())
            .field("unresolved", &self.get_unhandle_instance_number())
            .finish()
    }
}

/// The parser's language id, or the file extension when the id is unknown.
pub(crate) fn language_of(key: &str, language_id: &str) -> HdlLanguage {
    match HdlLanguage::from_language_id(language_id) {
        HdlLanguage::Unknown => HdlLanguage::from_path(key),
        language => language,
    }
}
