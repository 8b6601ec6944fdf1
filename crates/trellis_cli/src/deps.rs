//! The `trellis deps` command: exports the files a module depends on.
//!
//! 1. Load the project and build the graph.
//! 2. Locate the module in the given file.
//! 3. Print the dependency buckets (same file, includes, project-wide).

use std::error::Error;

use trellis_param::Dependencies;

use crate::pipeline;
use crate::{GlobalArgs, ModuleArgs, ReportFormat};

/// Runs the `trellis deps` command.
pub fn run(args: &ModuleArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let project = pipeline::load_project(global)?;
    let key = pipeline::require_module(&project.graph, &args.file, &args.module)?;
    let deps = project
        .graph
        .get_all_dependences(&key, &args.module)
        .ok_or_else(|| format!("module `{}` disappeared from {}", args.module, args.file))?;
    println!("{}", render(&deps, args.format)?);
    Ok(0)
}

fn render(deps: &Dependencies, format: ReportFormat) -> Result<String, Box<dyn Error>> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(deps)?),
        ReportFormat::Text => {
            let mut out = Vec::new();
            for (label, paths) in [
                ("current", &deps.current),
                ("include", &deps.include),
                ("others", &deps.others),
            ] {
                if paths.is_empty() {
                    continue;
                }
                out.push(format!("{label}:"));
                out.extend(paths.iter().map(|p| format!("  {p}")));
            }
            if out.is_empty() {
                out.push("no dependencies".to_string());
            }
            Ok(out.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps() -> Dependencies {
        Dependencies {
            current: vec!["/prj/top.v".to_string()],
            include: Vec::new(),
            others: vec!["/prj/core.v".to_string(), "/prj/alu.v".to_string()],
        }
    }

    #[test]
    fn text_skips_empty_buckets() {
        let text = render(&deps(), ReportFormat::Text).unwrap();
        assert_eq!(
            text,
            "current:\n  /prj/top.v\nothers:\n  /prj/core.v\n  /prj/alu.v"
        );
    }

    #[test]
    fn text_for_leaf_module() {
        let text = render(&Dependencies::default(), ReportFormat::Text).unwrap();
        assert_eq!(text, "no dependencies");
    }

    #[test]
    fn json_has_all_buckets() {
        let json = render(&deps(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["include"], serde_json::json!([]));
        assert_eq!(value["others"][1], "/prj/alu.v");
    }
}
