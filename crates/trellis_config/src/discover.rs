//! Discovery of the HDL files that make up a project.

use std::collections::BTreeSet;
use std::path::Path;

use trellis_source::{path, HdlLanguage};

use crate::error::ConfigError;
use crate::scope::ScopeLayout;

/// Collects every HDL file under the source, simulation and library roots.
///
/// Returned paths are normalized forward-slash strings, sorted and free of
/// duplicates. Roots that do not exist are skipped; a library root may also
/// name a single file.
pub fn hardware_files(layout: &ScopeLayout) -> Result<Vec<String>, ConfigError> {
    let mut roots = vec![layout.src_dir().to_string()];
    if layout.sim_dir() != layout.src_dir() {
        roots.push(layout.sim_dir().to_string());
    }
    roots.extend(layout.libraries().iter().cloned());

    let mut files = BTreeSet::new();
    for root in &roots {
        let root_path = Path::new(root);
        if root_path.is_file() {
            if HdlLanguage::is_hdl_path(root) {
                files.insert(path::normalize(root));
            }
        } else if root_path.is_dir() {
            walk_dir(root_path, &mut files)?;
        } else {
            tracing::debug!(root = %root, "hardware root does not exist, skipping");
        }
    }
    Ok(files.into_iter().collect())
}

fn walk_dir(dir: &Path, files: &mut BTreeSet<String>) -> Result<(), ConfigError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        if entry_path.is_dir() {
            walk_dir(&entry_path, files)?;
        } else {
            let p = path::to_slash(&entry_path.to_string_lossy());
            if HdlLanguage::is_hdl_path(&p) {
                files.insert(path::normalize(&p));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_files_in_all_roots() {
        let dir = tempfile::tempdir().unwrap();
        let root = path::to_slash(&dir.path().to_string_lossy());
        fs::create_dir_all(dir.path().join("user/src/sub")).unwrap();
        fs::create_dir_all(dir.path().join("user/sim")).unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("user/src/top.v"), "").unwrap();
        fs::write(dir.path().join("user/src/sub/alu.vhd"), "").unwrap();
        fs::write(dir.path().join("user/src/notes.md"), "").unwrap();
        fs::write(dir.path().join("user/sim/tb.sv"), "").unwrap();
        fs::write(dir.path().join("lib/fifo.v"), "").unwrap();

        let layout = ScopeLayout::new(&root, "user/src", "user/sim").with_library("lib");
        let files = hardware_files(&layout).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|f| f.strip_prefix(root.as_str()).unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["/lib/fifo.v", "/user/sim/tb.sv", "/user/src/sub/alu.vhd", "/user/src/top.v"]
        );
    }

    #[test]
    fn missing_roots_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = path::to_slash(&dir.path().to_string_lossy());
        let layout = ScopeLayout::new(&root, "nope", "also_nope");
        assert!(hardware_files(&layout).unwrap().is_empty());
    }

    #[test]
    fn library_root_can_be_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = path::to_slash(&dir.path().to_string_lossy());
        fs::write(dir.path().join("cells.v"), "").unwrap();
        let layout = ScopeLayout::new(&root, "src", "sim").with_library("cells.v");
        let files = hardware_files(&layout).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("/cells.v"));
    }
}
