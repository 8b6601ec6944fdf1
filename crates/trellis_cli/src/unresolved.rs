//! The `trellis unresolved` command: lists instances whose module is missing.
//!
//! Exits with status 0 either way; the listing is informational.

use std::error::Error;

use serde::Serialize;
use trellis_param::{HdlInstance, HdlParam};

use crate::pipeline;
use crate::{GlobalArgs, ReportFormat, UnresolvedArgs};

#[derive(Debug, Serialize)]
struct PendingEntry<'a> {
    #[serde(rename = "type")]
    type_name: &'a str,
    instance: &'a str,
    module: &'a str,
    path: &'a str,
}

/// Runs the `trellis unresolved` command.
pub fn run(args: &UnresolvedArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let project = pipeline::load_project(global)?;
    let entries = collect(&project.graph, args.type_name.as_deref());
    if !global.quiet {
        eprintln!(
            "    {} of {} instances unresolved",
            project.graph.get_unhandle_instance_number(),
            project.graph.stats().instances
        );
    }
    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        ReportFormat::Text => {
            for e in &entries {
                println!("{}  {} in {} ({})", e.type_name, e.instance, e.module, e.path);
            }
        }
    }
    Ok(0)
}

fn collect<'a>(graph: &'a HdlParam, type_name: Option<&str>) -> Vec<PendingEntry<'a>> {
    let pending: Vec<&HdlInstance> = match type_name {
        Some(t) => graph.get_unhandle_instances_by_type(t),
        None => graph
            .unresolved_instances()
            .into_iter()
            .map(|(_, inst)| inst)
            .collect(),
    };
    pending
        .into_iter()
        .filter_map(|inst| {
            let owner = graph.module(inst.owner())?;
            Some(PendingEntry {
                type_name: graph.name_of(inst.type_name()),
                instance: inst.name(),
                module: graph.name_of(owner.name()),
                path: owner.path(),
            })
        })
        .collect()
}
