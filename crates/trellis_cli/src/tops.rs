//! The `trellis tops` command: lists top modules.
//!
//! 1. Load the project and build the graph.
//! 2. Select the requested top-module set.
//! 3. Print one module per line, or a JSON array.

use std::error::Error;

use serde::Serialize;
use trellis_config::FileScope;
use trellis_param::{HdlModule, HdlParam};

use crate::pipeline;
use crate::{GlobalArgs, ReportFormat, TopScope, TopsArgs};

#[derive(Debug, Serialize)]
struct TopEntry<'a> {
    name: &'a str,
    path: &'a str,
    scope: &'static str,
}

/// Runs the `trellis tops` command.
pub fn run(args: &TopsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let project = pipeline::load_project(global)?;
    let tops = select(&project.graph, args.scope);
    if !global.quiet {
        eprintln!("    Found {} top modules in {}", tops.len(), project.name);
    }
    println!("{}", render(&project.graph, &tops, args.format)?);
    Ok(0)
}

fn select(graph: &HdlParam, scope: TopScope) -> Vec<&HdlModule> {
    match scope {
        TopScope::Global => graph.get_all_top_modules(true),
        TopScope::Src => graph.get_top_modules_by_type(FileScope::Src),
        TopScope::Sim => graph.get_top_modules_by_type(FileScope::Sim),
        TopScope::All => graph.get_all_top_modules(false),
    }
}

fn render(graph: &HdlParam, tops: &[&HdlModule], format: ReportFormat) -> Result<String, Box<dyn Error>> {
    let entries: Vec<TopEntry<'_>> = tops
        .iter()
        .map(|m| TopEntry {
            name: graph.name_of(m.name()),
            path: m.path(),
            scope: m.scope().name(),
        })
        .collect();
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
        ReportFormat::Text => {
            let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
            let lines: Vec<String> = entries
                .iter()
                .map(|e| format!("{:width$}  {}", e.name, e.path))
                .collect();
            Ok(lines.join("\n"))
        }
    }
}
