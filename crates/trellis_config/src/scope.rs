//! File-scope classification derived from the configured project directories.

use serde::{Deserialize, Serialize};
use trellis_source::path;

use crate::types::ProjectConfig;

/// Where a file sits in the project, which decides the top-module set its
/// modules belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileScope {
    /// Under the hardware source directory.
    Src,
    /// Under the simulation directory.
    Sim,
    /// Elsewhere inside the workspace (local library).
    LocalLib,
    /// Outside the workspace (remote library).
    RemoteLib,
}

impl FileScope {
    /// Returns the display name (`src`, `sim`, `local_lib`, `remote_lib`).
    pub fn name(self) -> &'static str {
        match self {
            FileScope::Src => "src",
            FileScope::Sim => "sim",
            FileScope::LocalLib => "local_lib",
            FileScope::RemoteLib => "remote_lib",
        }
    }
}

impl std::fmt::Display for FileScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Absolute, normalized project directories used to classify files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeLayout {
    workspace: String,
    src: String,
    sim: String,
    libraries: Vec<String>,
    unified: bool,
}

impl ScopeLayout {
    /// Builds a layout from a workspace root and source/simulation directories.
    ///
    /// Relative `src`/`sim` values are joined onto `workspace`. When the two
    /// directories coincide, nest, or one of them is empty, the layout is
    /// unified: every module is treated as belonging to a single scope.
    pub fn new(workspace: &str, src: &str, sim: &str) -> Self {
        let workspace = path::normalize(workspace);
        let src = resolve_dir(&workspace, src);
        let sim = resolve_dir(&workspace, sim);
        let unified = match (&src, &sim) {
            (Some(src), Some(sim)) => path::is_under(src, sim) || path::is_under(sim, src),
            _ => true,
        };
        if unified {
            tracing::debug!(%workspace, "src and sim directories overlap, using a single scope");
        }
        let src = src.unwrap_or_else(|| workspace.clone());
        let sim = sim.unwrap_or_else(|| src.clone());
        Self {
            workspace,
            src,
            sim,
            libraries: Vec::new(),
            unified,
        }
    }

    /// Builds a layout from a loaded configuration rooted at `project_dir`.
    pub fn from_config(config: &ProjectConfig, project_dir: &str) -> Self {
        let mut layout = Self::new(
            project_dir,
            &config.arch.hardware.src,
            &config.arch.hardware.sim,
        );
        layout.libraries = config
            .library
            .paths
            .iter()
            .map(|p| path::join(&layout.workspace, p))
            .collect();
        layout
    }

    /// A layout in which every path is a source file of one scope.
    pub fn single_scope(workspace: &str) -> Self {
        Self::new(workspace, "", "")
    }

    /// Adds a library root.
    pub fn with_library(mut self, dir: &str) -> Self {
        self.libraries.push(path::join(&self.workspace, dir));
        self
    }

    /// Classifies a file path.
    ///
    /// Order: source directory, simulation directory, inside the workspace,
    /// outside the workspace. A unified layout reports `Src` for anything under
    /// either hardware directory.
    pub fn classify(&self, file: &str) -> FileScope {
        let file = path::normalize(file);
        if path::is_under(&file, &self.src) {
            return FileScope::Src;
        }
        if path::is_under(&file, &self.sim) {
            return if self.unified {
                FileScope::Src
            } else {
                FileScope::Sim
            };
        }
        if path::is_under(&file, &self.workspace) {
            FileScope::LocalLib
        } else {
            FileScope::RemoteLib
        }
    }

    /// Returns `true` when source and simulation modules share one scope.
    pub fn is_unified(&self) -> bool {
        self.unified
    }

    /// Workspace root.
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Absolute hardware source directory.
    pub fn src_dir(&self) -> &str {
        &self.src
    }

    /// Absolute simulation directory.
    pub fn sim_dir(&self) -> &str {
        &self.sim
    }

    /// Absolute library roots.
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }
}

impl Default for ScopeLayout {
    fn default() -> Self {
        Self::single_scope("/")
    }
}

fn resolve_dir(workspace: &str, dir: &str) -> Option<String> {
    if dir.trim().is_empty() {
        None
    } else {
        Some(path::join(workspace, dir))
    }
}
