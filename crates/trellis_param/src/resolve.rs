//! Instance resolution, referrer bookkeeping and the unresolved pool.
//!
//! An instance of type `T` in file `F` resolves to the first match of:
//! a module `T` declared in `F` (`Current`), in a file `F` includes
//! (`Include`), or in any other registered file in registration order
//! (`Others`). Binding adds the instance to the target's global referrers and,
//! when owner and target share a scope, to its local referrers; a module is a
//! top module of a set exactly while the matching referrer set is empty.

use std::collections::HashSet;

use trellis_common::Ident;

use crate::ids::{InstanceId, ModuleId};
use crate::instance::{Resolution, ResolutionStatus};
use crate::param::HdlParam;

impl HdlParam {
    /// Runs the search protocol for type `type_name` instantiated in `file_path`.
    pub(crate) fn search(&self, file_path: &str, type_name: Ident) -> Option<Resolution> {
        let file = self.files.get(file_path)?;
        if let Some(module) = file.module_id(type_name) {
            return Some(Resolution {
                module,
                path: file_path.to_string(),
                status: ResolutionStatus::Current,
            });
        }

        let mut checked: HashSet<String> = HashSet::new();
        checked.insert(file_path.to_string());
        for include in file.include_paths() {
            if !checked.insert(include.clone()) {
                continue;
            }
            if let Some(module) = self
                .files
                .get(&include)
                .and_then(|f| f.module_id(type_name))
            {
                return Some(Resolution {
                    module,
                    path: include,
                    status: ResolutionStatus::Include,
                });
            }
        }

        self.files
            .iter()
            .filter(|(p, _)| !checked.contains(p.as_str()))
            .find_map(|(p, f)| {
                f.module_id(type_name).map(|module| Resolution {
                    module,
                    path: p.clone(),
                    status: ResolutionStatus::Others,
                })
            })
    }

    /// Owning file path and type name of an instance.
    fn search_key(&self, id: InstanceId) -> Option<(String, Ident)> {
        let inst = self.instances.get(id)?;
        let owner = self.modules.get(inst.owner)?;
        Some((owner.path.clone(), inst.type_name))
    }

    /// Resolves an unbound instance: binds it or puts it in the pool.
    pub(crate) fn resolve_instance(&mut self, id: InstanceId) {
        let Some((file_path, type_name)) = self.search_key(id) else {
            return;
        };
        match self.search(&file_path, type_name) {
            Some(found) => self.bind(id, found),
            None => self.pool(id),
        }
    }

    /// Re-runs resolution for an instance that may already be bound.
    ///
    /// Leaves the instance untouched when the search yields its current
    /// binding. Returns `true` if the binding changed.
    pub(crate) fn rebind(&mut self, id: InstanceId) -> bool {
        let Some((file_path, type_name)) = self.search_key(id) else {
            return false;
        };
        let found = self.search(&file_path, type_name);
        let Some(inst) = self.instances.get(id) else {
            return false;
        };
        let current = inst.target.map(|m| (m, inst.status));
        match found {
            Some(found) if current == Some((found.module, found.status)) => false,
            Some(found) => {
                self.unbind(id);
                self.bind(id, found);
                true
            }
            None if current.is_none() => {
                self.pool(id);
                false
            }
            None => {
                self.unbind(id);
                self.pool(id);
                true
            }
        }
    }

    /// Binds an instance to a found module and counts the reference.
    pub(crate) fn bind(&mut self, id: InstanceId, found: Resolution) {
        let Some(inst) = self.instances.get(id) else {
            return;
        };
        let owner_scope = self.modules.get(inst.owner).map(|m| m.scope);
        let target_scope = self.modules.get(found.module).map(|m| m.scope);
        let local = owner_scope.is_some() && owner_scope == target_scope;
        tracing::trace!(
            instance = %inst.name,
            type_name = %self.name_of(inst.type_name),
            status = %found.status,
            path = %found.path,
            "instance resolved"
        );
        self.unpool(id);
        let module = found.module;
        if let Some(inst) = self.instances.get_mut(id) {
            inst.target = Some(module);
            inst.status = found.status;
            inst.target_path = Some(found.path);
            inst.local = local;
        }
        self.add_referrer(module, id, local);
    }

    /// Detaches an instance from its target. Returns the former target.
    pub(crate) fn unbind(&mut self, id: InstanceId) -> Option<ModuleId> {
        let inst = self.instances.get_mut(id)?;
        let target = inst.target.take()?;
        let local = std::mem::take(&mut inst.local);
        inst.status = ResolutionStatus::Unknown;
        inst.target_path = None;
        self.remove_referrer(target, id, local);
        Some(target)
    }

    /// Marks an instance unresolved and files it under its type name.
    pub(crate) fn pool(&mut self, id: InstanceId) {
        let Some(inst) = self.instances.get_mut(id) else {
            return;
        };
        inst.status = ResolutionStatus::Unknown;
        let type_name = inst.type_name;
        self.unresolved.entry(type_name).or_default().insert(id);
        tracing::trace!(instance = ?id, type_name = %self.name_of(type_name), "instance unresolved");
    }

    /// Removes an instance from the pool, if present.
    pub(crate) fn unpool(&mut self, id: InstanceId) {
        let Some(type_name) = self.instances.get(id).map(|i| i.type_name) else {
            return;
        };
        if let Some(set) = self.unresolved.get_mut(&type_name) {
            set.shift_remove(&id);
            if set.is_empty() {
                self.unresolved.shift_remove(&type_name);
            }
        }
    }

    /// Rebinds instances of the type a new module declares: pooled ones are
    /// resolved, and ones bound through a weaker tier are upgraded.
    pub(crate) fn on_module_created(&mut self, module: ModuleId) {
        let Some(name) = self.modules.get(module).map(|m| m.name) else {
            return;
        };
        let candidates: Vec<InstanceId> = self
            .by_type
            .get(&name)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        for id in candidates {
            let bound_locally = self
                .instances
                .get(id)
                .is_some_and(|i| i.status == ResolutionStatus::Current);
            if !bound_locally {
                self.rebind(id);
            }
        }
    }

    fn add_referrer(&mut self, target: ModuleId, id: InstanceId, local: bool) {
        let Some(module) = self.modules.get_mut(target) else {
            return;
        };
        module.global_referrers.insert(id);
        if local {
            module.local_referrers.insert(id);
        }
        self.sync_top_membership(target);
    }

    fn remove_referrer(&mut self, target: ModuleId, id: InstanceId, local: bool) {
        let Some(module) = self.modules.get_mut(target) else {
            return;
        };
        module.global_referrers.shift_remove(&id);
        if local {
            module.local_referrers.shift_remove(&id);
        }
        self.sync_top_membership(target);
    }

    /// Puts `module` in or out of its top sets according to its referrers.
    fn sync_top_membership(&mut self, id: ModuleId) {
        let Some(module) = self.modules.get(id) else {
            return;
        };
        let global_top = module.global_referrers.is_empty();
        let scope_top = module.local_referrers.is_empty();
        let scope = module.scope;
        if global_top {
            self.top_modules.insert(id);
        } else {
            self.top_modules.shift_remove(&id);
        }
        let scoped = self.scope_tops_mut(scope);
        if scope_top {
            scoped.insert(id);
        } else {
            scoped.shift_remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use trellis_config::ScopeLayout;

    use crate::instance::ResolutionStatus;
    use crate::param::HdlParam;
    use crate::parser::MemoryParser;
    use crate::raw::{ParsedFile, RawModule};

    fn status_of(param: &HdlParam, path: &str, module: &str, inst: &str) -> ResolutionStatus {
        let m = param.get_hdl_module(path, module).unwrap();
        let id = m.instance_id(inst).unwrap();
        param.instance(id).unwrap().status()
    }

    #[test]
    fn current_beats_include_beats_others() {
        let p = MemoryParser::new()
            .with(
                "/prj/a.v",
                ParsedFile::new("vlog")
                    .with_include("inc.v")
                    .with_module(RawModule::new("top").with_instance("u0", "leaf")),
            )
            .with("/prj/inc.v", ParsedFile::new("vlog").with_module(RawModule::new("leaf")))
            .with("/prj/other.v", ParsedFile::new("vlog").with_module(RawModule::new("leaf")));
        let mut param = HdlParam::new(ScopeLayout::single_scope("/prj"));
        param.initialize(["/prj/other.v", "/prj/a.v", "/prj/inc.v"], &p);
        assert_eq!(status_of(&param, "/prj/a.v", "top", "u0"), ResolutionStatus::Include);
        let inst = param
            .instance(param.get_hdl_module("/prj/a.v", "top").unwrap().instance_id("u0").unwrap())
            .unwrap();
        assert_eq!(inst.target_path(), Some("/prj/inc.v"));
    }

    #[test]
    fn others_follow_registration_order() {
        let p = MemoryParser::new()
            .with("/prj/a.v", ParsedFile::new("vlog").with_module(RawModule::new("top").with_instance("u0", "leaf")))
            .with("/prj/x.v", ParsedFile::new("vlog").with_module(RawModule::new("leaf")))
            .with("/prj/y.v", ParsedFile::new("vlog").with_module(RawModule::new("leaf")));
        let mut param = HdlParam::new(ScopeLayout::single_scope("/prj"));
        param.initialize(["/prj/y.v", "/prj/a.v", "/prj/x.v"], &p);
        let top = param.get_hdl_module("/prj/a.v", "top").unwrap();
        let inst = param.instance(top.instance_id("u0").unwrap()).unwrap();
        assert_eq!(inst.status(), ResolutionStatus::Others);
        assert_eq!(inst.target_path(), Some("/prj/y.v"));
        assert!(param.is_top_module("/prj/x.v", "leaf", true));
        assert!(!param.is_top_module("/prj/y.v", "leaf", true));
    }

    #[test]
    fn self_include_is_skipped() {
        let p = MemoryParser::new().with(
            "/prj/a.v",
            ParsedFile::new("vlog")
                .with_include("./a.v")
                .with_module(RawModule::new("top").with_instance("u0", "nothing")),
        );
        let mut param = HdlParam::new(ScopeLayout::single_scope("/prj"));
        param.initialize(["/prj/a.v"], &p);
        assert_eq!(status_of(&param, "/prj/a.v", "top", "u0"), ResolutionStatus::Unknown);
        assert_eq!(param.get_unhandle_instance_number(), 1);
    }

    #[test]
    fn cross_scope_reference_keeps_scope_top() {
        let p = MemoryParser::new()
            .with("/prj/sim/tb.v", ParsedFile::new("vlog").with_module(RawModule::new("tb").with_instance("dut", "core")))
            .with("/prj/src/core.v", ParsedFile::new("vlog").with_module(RawModule::new("core")));
        let mut param = HdlParam::new(ScopeLayout::new("/prj", "src", "sim"));
        param.initialize(["/prj/sim/tb.v", "/prj/src/core.v"], &p);
        assert!(!param.is_top_module("/prj/src/core.v", "core", true));
        assert!(param.is_top_module("/prj/src/core.v", "core", false));
        assert!(param.is_top_module("/prj/sim/tb.v", "tb", false));
        param.check_invariants().unwrap();
    }
}
