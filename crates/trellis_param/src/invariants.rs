//! Consistency checks over the whole graph.

use trellis_common::{InternalError, TrellisResult};
use trellis_config::FileScope;

use crate::instance::ResolutionStatus;
use crate::param::HdlParam;

fn ensure(condition: bool, message: impl FnOnce() -> String) -> TrellisResult<()> {
    if condition {
        Ok(())
    } else {
        Err(InternalError::new(message()))
    }
}

impl HdlParam {
    /// Verifies the reference-counting and pool invariants.
    ///
    /// Checks, for every entity: file and module maps agree; every referrer is
    /// a live instance bound to that module; local referrers are a subset of
    /// global ones; top-set membership matches empty referrer sets; every
    /// bound instance points at a live module that lists it; and the pool
    /// holds exactly the unbound instances. Returns the first violation.
    pub fn check_invariants(&self) -> TrellisResult<()> {
        for (key, file) in &self.files {
            for (name, id) in &file.modules {
                let module = self
                    .modules
                    .get(*id)
                    .ok_or_else(|| InternalError::new(format!("{key} lists dead module {id:?}")))?;
                ensure(module.path == *key && module.name == *name, || {
                    format!("{key} maps {} to a module of another file", self.name_of(*name))
                })?;
            }
        }

        for (id, module) in self.modules.iter() {
            let name = self.name_of(module.name);
            ensure(
                self.files
                    .get(&module.path)
                    .and_then(|f| f.module_id(module.name))
                    == Some(id),
                || format!("module {name} is not registered in {}", module.path),
            )?;
            for referrer in &module.global_referrers {
                let inst = self.instances.get(*referrer).ok_or_else(|| {
                    InternalError::new(format!("module {name} has dead referrer {referrer:?}"))
                })?;
                ensure(inst.target == Some(id), || {
                    format!("referrer {} of {name} is bound elsewhere", inst.name)
                })?;
                ensure(inst.local == module.local_referrers.contains(referrer), || {
                    format!("local flag of {} disagrees with {name}", inst.name)
                })?;
            }
            for referrer in &module.local_referrers {
                ensure(module.global_referrers.contains(referrer), || {
                    format!("local referrer {referrer:?} of {name} is not a global referrer")
                })?;
            }
            ensure(
                self.top_modules.contains(&id) == module.global_referrers.is_empty(),
                || format!("global top membership of {name} disagrees with its referrers"),
            )?;
            ensure(
                self.scope_tops(module.scope).contains(&id) == module.local_referrers.is_empty(),
                || format!("scope top membership of {name} disagrees with its referrers"),
            )?;
            let other_scope = if module.scope == FileScope::Sim {
                FileScope::Src
            } else {
                FileScope::Sim
            };
            ensure(!self.scope_tops(other_scope).contains(&id), || {
                format!("{name} is in the top set of another scope")
            })?;
            for (inst_name, inst_id) in &module.instances {
                let inst = self.instances.get(*inst_id).ok_or_else(|| {
                    InternalError::new(format!("{name} lists dead instance {inst_name}"))
                })?;
                ensure(inst.owner == id && inst.name == *inst_name, || {
                    format!("instance {inst_name} of {name} has another owner")
                })?;
            }
        }

        for top in self
            .top_modules
            .iter()
            .chain(&self.src_top_modules)
            .chain(&self.sim_top_modules)
        {
            ensure(self.modules.contains(*top), || {
                format!("top set holds dead module {top:?}")
            })?;
        }

        for (id, inst) in self.instances.iter() {
            ensure(self.modules.contains(inst.owner), || {
                format!("instance {} has a dead owner", inst.name)
            })?;
            let pooled = self
                .unresolved
                .get(&inst.type_name)
                .is_some_and(|set| set.contains(&id));
            match inst.target {
                Some(target) => {
                    let module = self.modules.get(target).ok_or_else(|| {
                        InternalError::new(format!("instance {} is bound to a dead module", inst.name))
                    })?;
                    ensure(module.global_referrers.contains(&id), || {
                        format!("instance {} is missing from its target's referrers", inst.name)
                    })?;
                    ensure(inst.status != ResolutionStatus::Unknown && inst.target_path.is_some(), || {
                        format!("bound instance {} has no resolution status", inst.name)
                    })?;
                    ensure(!pooled, || format!("bound instance {} is pooled", inst.name))?;
                }
                None => {
                    ensure(inst.status == ResolutionStatus::Unknown, || {
                        format!("unbound instance {} claims status {}", inst.name, inst.status)
                    })?;
                    ensure(pooled, || format!("unbound instance {} is not pooled", inst.name))?;
                }
            }
            ensure(
                self.by_type
                    .get(&inst.type_name)
                    .is_some_and(|set| set.contains(&id)),
                || format!("instance {} is missing from the type index", inst.name),
            )?;
        }

        for (type_name, set) in &self.unresolved {
            ensure(!set.is_empty(), || {
                format!("empty pool entry for {}", self.name_of(*type_name))
            })?;
            for id in set {
                let inst = self.instances.get(*id).ok_or_else(|| {
                    InternalError::new(format!("pool holds dead instance {id:?}"))
                })?;
                ensure(inst.type_name == *type_name, || {
                    format!("instance {} is pooled under the wrong type", inst.name)
                })?;
            }
        }
        for set in self.by_type.values() {
            for id in set {
                ensure(self.instances.contains(*id), || {
                    format!("type index holds dead instance {id:?}")
                })?;
            }
        }
        Ok(())
    }
}
