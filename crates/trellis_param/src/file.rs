//! Registered source files.

use indexmap::IndexMap;
use trellis_common::Ident;
use trellis_config::FileScope;
use trellis_source::{path, HdlLanguage};

use crate::ids::ModuleId;
use crate::raw::MacroTable;

/// One source file and the modules it declares.
#[derive(Debug, Clone)]
pub struct HdlFile {
    pub(crate) path: String,
    pub(crate) language: HdlLanguage,
    pub(crate) macro_table: MacroTable,
    pub(crate) scope: FileScope,
    pub(crate) modules: IndexMap<Ident, ModuleId>,
}

impl HdlFile {
    pub(crate) fn new(
        path: String,
        language: HdlLanguage,
        macro_table: MacroTable,
        scope: FileScope,
    ) -> Self {
        Self {
            path,
            language,
            macro_table,
            scope,
            modules: IndexMap::new(),
        }
    }

    /// Normalized absolute path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Source language.
    pub fn language(&self) -> HdlLanguage {
        self.language
    }

    /// Scope classification.
    pub fn scope(&self) -> FileScope {
        self.scope
    }

    /// Defines and includes from the last parse.
    pub fn macro_table(&self) -> &MacroTable {
        &self.macro_table
    }

    /// Replaces the macro table.
    pub fn update_macro(&mut self, macro_table: MacroTable) {
        self.macro_table = macro_table;
    }

    /// Absolute paths of the included files, in directive order.
    ///
    /// Relative literals are resolved against this file's directory.
    pub fn include_paths(&self) -> Vec<String> {
        self.macro_table
            .includes
            .iter()
            .map(|inc| path::rel2abs(&self.path, &inc.path))
            .collect()
    }

    /// Returns the id of the module named `name`, if this file declares it.
    pub fn module_id(&self, name: Ident) -> Option<ModuleId> {
        self.modules.get(&name).copied()
    }

    /// Returns `true` if this file declares a module named `name`.
    pub fn has_module(&self, name: Ident) -> bool {
        self.modules.contains_key(&name)
    }

    /// Ids of the declared modules, in declaration order.
    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.values().copied()
    }

    /// Number of declared modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::ParsedFile;

    #[test]
    fn include_paths_resolve_relative_to_file() {
        let table = ParsedFile::new("vlog")
            .with_include("defs.vh")
            .with_include("../common/bus.vh")
            .with_include("/opt/ip/pll.v")
            .macro_table;
        let file = HdlFile::new(
            "/prj/src/top.v".into(),
            HdlLanguage::Verilog,
            table,
            FileScope::Src,
        );
        assert_eq!(
            file.include_paths(),
            vec!["/prj/src/defs.vh", "/prj/common/bus.vh", "/opt/ip/pll.v"]
        );
    }

    #[test]
    fn update_macro_replaces_table() {
        let mut file = HdlFile::new(
            "/prj/a.v".into(),
            HdlLanguage::Verilog,
            ParsedFile::new("vlog").with_include("x.vh").macro_table,
            FileScope::Src,
        );
        file.update_macro(MacroTable::default());
        assert!(file.include_paths().is_empty());
    }
}
