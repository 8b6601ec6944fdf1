//! Diff-based re-parse of a changed file.
//!
//! Identity is by name: modules matched by name are updated in place, and so
//! are instances matched by name within a module. Only names that appear or
//! disappear create or destroy graph entities, so an unchanged re-parse keeps
//! every id and every referrer set as it was.

use std::collections::HashSet;

use trellis_source::path;

use crate::error::ParamError;
use crate::ids::{InstanceId, ModuleId};
use crate::param::{language_of, HdlParam};
use crate::parser::FastParser;
use crate::raw::{ParsedFile, RawInstance, RawModule};

impl HdlParam {
    /// Re-parses a registered file and applies the difference.
    pub fn update_hdl_file(&mut self, file_path: &str, parser: &dyn FastParser) -> Result<(), ParamError> {
        let key = path::normalize(file_path);
        if !self.files.contains_key(&key) {
            return Err(ParamError::NotRegistered(key));
        }
        let parsed = parser.fast(&key)?;
        self.apply_file_change(&key, parsed)
    }

    /// Applies a new parse result to a registered file.
    ///
    /// The macro table is replaced first, so every surviving instance of the
    /// file is re-resolved against the new include list.
    pub fn apply_file_change(&mut self, file_path: &str, parsed: ParsedFile) -> Result<(), ParamError> {
        let key = path::normalize(file_path);
        let Some(file) = self.files.get_mut(&key) else {
            return Err(ParamError::NotRegistered(key));
        };
        file.language = language_of(&key, &parsed.language_id);
        file.update_macro(parsed.macro_table);
        let old: Vec<_> = file.modules.iter().map(|(n, m)| (*n, *m)).collect();

        let mut seen = HashSet::new();
        let mut created: Vec<(ModuleId, Vec<RawInstance>)> = Vec::new();
        for raw in parsed.content {
            let name = self.interner.get_or_intern(&raw.name);
            if !seen.insert(name) {
                tracing::warn!(path = %key, module = %raw.name, "duplicate module name ignored");
                continue;
            }
            let existing = self.files.get(&key).and_then(|f| f.module_id(name));
            match existing {
                Some(module) => self.update_module_in_place(module, &raw),
                None => {
                    if let Some(module) = self.create_module(&key, &raw) {
                        created.push((module, raw.instances));
                    }
                }
            }
        }
        for (name, module) in old {
            if !seen.contains(&name) {
                self.destroy_module(module);
            }
        }
        for (module, instances) in &created {
            self.create_instances(*module, instances);
        }
        for (module, _) in created {
            self.on_module_created(module);
        }
        tracing::debug!(path = %key, "file updated");
        Ok(())
    }

    /// Applies a re-parse of a single module declaration.
    pub fn update_module(&mut self, file_path: &str, raw: &RawModule) -> Result<(), ParamError> {
        let key = path::normalize(file_path);
        let Some(file) = self.files.get(&key) else {
            return Err(ParamError::NotRegistered(key));
        };
        let module = self
            .interner
            .get(&raw.name)
            .and_then(|name| file.module_id(name))
            .ok_or_else(|| ParamError::ModuleNotFound {
                path: key.clone(),
                name: raw.name.clone(),
            })?;
        self.update_module_in_place(module, raw);
        Ok(())
    }

    /// Replaces a module's declaration data and diffs its instances by name.
    pub(crate) fn update_module_in_place(&mut self, module: ModuleId, raw: &RawModule) {
        let Some(existing) = self.modules.get_mut(module) else {
            return;
        };
        existing.update_declaration(raw);
        let old: Vec<(String, InstanceId)> = existing
            .instances
            .iter()
            .map(|(n, i)| (n.clone(), *i))
            .collect();

        let mut seen: HashSet<&str> = HashSet::new();
        for raw_inst in &raw.instances {
            if !seen.insert(raw_inst.name.as_str()) {
                tracing::warn!(instance = %raw_inst.name, "duplicate instance name ignored");
                continue;
            }
            let matched = self
                .modules
                .get(module)
                .and_then(|m| m.instance_id(&raw_inst.name));
            match matched {
                Some(id) => self.update_instance(id, raw_inst),
                None => {
                    self.create_instance(module, raw_inst);
                }
            }
        }
        for (name, id) in old {
            if !seen.contains(name.as_str()) {
                self.delete_instance(id);
            }
        }
    }

    /// Refreshes an instance from a re-parse.
    ///
    /// A changed type name moves the instance to the new type and resolves it
    /// from scratch; otherwise the search is re-run and the binding kept when
    /// it still wins.
    fn update_instance(&mut self, id: InstanceId, raw: &RawInstance) {
        let type_name = self.interner.get_or_intern(&raw.type_name);
        let Some(inst) = self.instances.get_mut(id) else {
            return;
        };
        inst.update_ranges(raw);
        let old_type = inst.type_name;
        if old_type == type_name {
            self.rebind(id);
            return;
        }
        self.unbind(id);
        self.unpool(id);
        if let Some(set) = self.by_type.get_mut(&old_type) {
            set.shift_remove(&id);
            if set.is_empty() {
                self.by_type.remove(&old_type);
            }
        }
        self.by_type.entry(type_name).or_default().insert(id);
        if let Some(inst) = self.instances.get_mut(id) {
            inst.type_name = type_name;
        }
        self.resolve_instance(id);
    }
}
