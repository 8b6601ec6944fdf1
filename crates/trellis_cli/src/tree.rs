//! The `trellis tree` command: prints the instance hierarchy below a module.

use std::error::Error;

use trellis_param::{InstanceNode, InstanceTree, ResolutionStatus};

use crate::pipeline;
use crate::{GlobalArgs, ModuleArgs, ReportFormat};

/// Runs the `trellis tree` command.
pub fn run(args: &ModuleArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let project = pipeline::load_project(global)?;
    let key = pipeline::require_module(&project.graph, &args.file, &args.module)?;
    let tree = project
        .graph
        .instance_tree(&key, &args.module)
        .ok_or_else(|| format!("module `{}` disappeared from {}", args.module, args.file))?;
    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
        ReportFormat::Text => println!("{}", render(&tree)),
    }
    Ok(0)
}

fn render(tree: &InstanceTree) -> String {
    let mut lines = vec![format!("{} ({})", tree.module, tree.path)];
    render_children(&tree.children, "", &mut lines);
    lines.join("\n")
}

fn render_children(nodes: &[InstanceNode], prefix: &str, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        lines.push(format!("{prefix}{branch}{}", label(node)));
        render_children(&node.children, &format!("{prefix}{indent}"), lines);
    }
}

fn label(node: &InstanceNode) -> String {
    let mut text = format!("{}: {}", node.instance, node.type_name);
    match (&node.path, node.status) {
        (Some(path), ResolutionStatus::Current) => text.push_str(&format!(" ({path})")),
        (Some(path), status) => text.push_str(&format!(" ({path}, {status})")),
        (None, _) => text.push_str(" [unresolved]"),
    }
    if node.recursive {
        text.push_str(" [recursive]");
    }
    text
}
