//! Transitive dependency export and the architecture tree.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::Serialize;

use crate::ids::ModuleId;
use crate::instance::ResolutionStatus;
use crate::param::HdlParam;

/// Files a module depends on, bucketed by how each edge was resolved.
///
/// Each bucket lists a path once, in first-visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependencies {
    /// Files reached through same-file edges.
    pub current: Vec<String>,
    /// Files reached through include edges.
    pub include: Vec<String>,
    /// Files reached through project-wide edges.
    pub others: Vec<String>,
}

impl Dependencies {
    /// Every path in all buckets, without duplicates.
    pub fn all_paths(&self) -> Vec<&str> {
        let mut seen = IndexSet::new();
        for p in self.current.iter().chain(&self.include).chain(&self.others) {
            seen.insert(p.as_str());
        }
        seen.into_iter().collect()
    }
}

#[derive(Default)]
struct Buckets {
    current: IndexSet<String>,
    include: IndexSet<String>,
    others: IndexSet<String>,
}

/// One node of the architecture tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceNode {
    /// Instance name.
    pub instance: String,
    /// Instantiated type name.
    pub type_name: String,
    /// How the instance was resolved.
    pub status: ResolutionStatus,
    /// File of the bound module, if resolved.
    pub path: Option<String>,
    /// Set when the bound module already appears higher up on this branch;
    /// its children are then omitted.
    pub recursive: bool,
    /// Instances of the bound module.
    pub children: Vec<InstanceNode>,
}

/// The instance hierarchy below one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceTree {
    /// Root module name.
    pub module: String,
    /// Root module file.
    pub path: String,
    /// Instances of the root module.
    pub children: Vec<InstanceNode>,
}

impl HdlParam {
    /// Collects the files every module below `name` in `file_path` is
    /// declared in, following resolved instances depth-first.
    ///
    /// Each module is expanded once, so instantiation cycles terminate.
    pub fn get_all_dependences(&self, file_path: &str, name: &str) -> Option<Dependencies> {
        let root = self.module_id(file_path, name)?;
        let mut visited = HashSet::from([root]);
        let mut buckets = Buckets::default();
        self.collect_dependences(root, &mut visited, &mut buckets);
        Some(Dependencies {
            current: buckets.current.into_iter().collect(),
            include: buckets.include.into_iter().collect(),
            others: buckets.others.into_iter().collect(),
        })
    }

    fn collect_dependences(
        &self,
        module: ModuleId,
        visited: &mut HashSet<ModuleId>,
        buckets: &mut Buckets,
    ) {
        let Some(module) = self.modules.get(module) else {
            return;
        };
        for id in module.instance_ids() {
            let Some(inst) = self.instances.get(id) else {
                continue;
            };
            let (Some(target), Some(target_path)) = (inst.target, inst.target_path.as_ref()) else {
                continue;
            };
            let bucket = match inst.status {
                ResolutionStatus::Current => &mut buckets.current,
                ResolutionStatus::Include => &mut buckets.include,
                ResolutionStatus::Others => &mut buckets.others,
                ResolutionStatus::Unknown => continue,
            };
            bucket.insert(target_path.clone());
            if visited.insert(target) {
                self.collect_dependences(target, visited, buckets);
            }
        }
    }

    /// Builds the instance hierarchy below a module for tree views.
    pub fn instance_tree(&self, file_path: &str, name: &str) -> Option<InstanceTree> {
        let root = self.module_id(file_path, name)?;
        let module = self.modules.get(root)?;
        let mut ancestors = vec![root];
        Some(InstanceTree {
            module: self.name_of(module.name).to_string(),
            path: module.path.clone(),
            children: self.tree_children(root, &mut ancestors),
        })
    }

    fn tree_children(&self, module: ModuleId, ancestors: &mut Vec<ModuleId>) -> Vec<InstanceNode> {
        let Some(module) = self.modules.get(module) else {
            return Vec::new();
        };
        let mut nodes = Vec::with_capacity(module.instance_count());
        for id in module.instance_ids() {
            let Some(inst) = self.instances.get(id) else {
                continue;
            };
            let mut node = InstanceNode {
                instance: inst.name.clone(),
                type_name: self.name_of(inst.type_name).to_string(),
                status: inst.status,
                path: inst.target_path.clone(),
                recursive: false,
                children: Vec::new(),
            };
            if let Some(target) = inst.target {
                if ancestors.contains(&target) {
                    node.recursive = true;
                } else {
                    ancestors.push(target);
                    node.children = self.tree_children(target, ancestors);
                    ancestors.pop();
                }
            }
            nodes.push(node);
        }
        nodes
    }
}
