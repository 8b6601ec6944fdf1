//! Shared pipeline helpers for CLI commands.
//!
//! Every query command runs the same steps: find the project root, load
//! `trellis.toml`, discover the hardware files and build the graph through the
//! configured fast parser.

use std::error::Error;
use std::path::{Path, PathBuf};

use trellis_config::{hardware_files, load_config, ScopeLayout, CONFIG_FILE};
use trellis_param::{FastParser, HdlParam};
use trellis_service::CommandParser;
use trellis_source::path;

use crate::GlobalArgs;

/// A loaded project ready for queries.
pub struct Project {
    /// Project name from `trellis.toml`.
    pub name: String,
    /// The dependency graph of every discovered file.
    pub graph: HdlParam,
}

/// Walks up from `start` looking for the nearest directory containing `trellis.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `trellis.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Turns a command-line path into the normalized absolute key the graph uses.
pub fn absolute_key(arg: &str) -> Result<String, Box<dyn Error>> {
    let slashed = path::to_slash(arg);
    if path::is_absolute(&slashed) {
        return Ok(path::normalize(&slashed));
    }
    let cwd = std::env::current_dir()?;
    Ok(path::join(&path::to_slash(&cwd.to_string_lossy()), &slashed))
}

/// Loads the project the global args point at and builds its graph.
///
/// Fails when no configuration is found or when `[parser]` names no command.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn Error>> {
    let root = resolve_project_root(global)?;
    let config = load_config(&root)?;
    let root_key = absolute_key(&root.to_string_lossy())?;
    let layout = ScopeLayout::from_config(&config, &root_key);

    let parser = CommandParser::from_config(&config.parser).ok_or_else(|| {
        format!("no fast parser configured; set [parser] command in {CONFIG_FILE}")
    })?;

    let files = hardware_files(&layout)?;
    if !global.quiet {
        eprintln!(
            "    Scanning {} ({} HDL files, parser `{}`)",
            config.project.name,
            files.len(),
            parser.program()
        );
    }
    let graph = build_graph(layout, &files, &parser);
    if !global.quiet && graph.file_count() < files.len() {
        eprintln!(
            "    Skipped {} files the parser could not handle",
            files.len() - graph.file_count()
        );
    }
    Ok(Project {
        name: config.project.name,
        graph,
    })
}

/// Builds a graph for `files` under `layout`.
pub fn build_graph(layout: ScopeLayout, files: &[String], parser: &dyn FastParser) -> HdlParam {
    let mut graph = HdlParam::new(layout);
    graph.initialize(files, parser);
    graph
}

/// Resolves `file` against the current directory and checks that `module` is
/// declared there.
pub fn require_module(graph: &HdlParam, file: &str, module: &str) -> Result<String, Box<dyn Error>> {
    let key = absolute_key(file)?;
    if !graph.has_hdl_file(&key) {
        return Err(format!("{file} is not part of the project").into());
    }
    if !graph.has_hdl_module(&key, module) {
        return Err(format!("module `{module}` is not declared in {file}").into());
    }
    Ok(key)
}
