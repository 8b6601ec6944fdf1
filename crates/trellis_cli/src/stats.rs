//! The `trellis stats` command: one-line graph summary.

use std::error::Error;

use crate::pipeline;
use crate::{GlobalArgs, ReportFormat, StatsArgs};

/// Runs the `trellis stats` command.
pub fn run(args: &StatsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let project = pipeline::load_project(global)?;
    let stats = project.graph.stats();
    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        ReportFormat::Text => println!("{}: {stats}", project.name),
    }
    Ok(0)
}
