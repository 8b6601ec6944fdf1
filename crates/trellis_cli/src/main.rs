//! Trellis CLI: scans an HDL project and queries its module-dependency graph.
//!
//! `trellis tops` lists top modules, `trellis deps` exports the files a module
//! depends on, `trellis tree` prints its instance hierarchy, `trellis
//! unresolved` lists instances whose module could not be found, and `trellis
//! stats` summarizes the graph.

#![warn(missing_docs)]

mod deps;
mod pipeline;
mod stats;
mod tops;
mod tree;
mod unresolved;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Trellis: module-dependency graphs for HDL projects.
#[derive(Parser, Debug)]
#[command(name = "trellis", version, about = "HDL module-dependency graph")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `trellis.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List top modules (modules nothing instantiates).
    Tops(TopsArgs),
    /// Export the files a module transitively depends on.
    Deps(ModuleArgs),
    /// Print the instance hierarchy below a module.
    Tree(ModuleArgs),
    /// List instances whose module could not be found.
    Unresolved(UnresolvedArgs),
    /// Summarize the graph.
    Stats(StatsArgs),
}

/// Arguments for `trellis tops`.
#[derive(Parser, Debug)]
pub struct TopsArgs {
    /// Which top-module set to list.
    #[arg(short, long, value_enum, default_value_t = TopScope::Src)]
    pub scope: TopScope,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for commands that start from one module.
#[derive(Parser, Debug)]
pub struct ModuleArgs {
    /// File declaring the module (relative to the current directory).
    pub file: String,

    /// Module name.
    pub module: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `trellis unresolved`.
#[derive(Parser, Debug)]
pub struct UnresolvedArgs {
    /// Only list instances of this type.
    #[arg(long = "type")]
    pub type_name: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `trellis stats`.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Top-module set selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TopScope {
    /// Modules with no referrer anywhere in the project.
    Global,
    /// Hardware sources with no referrer from the source directory.
    Src,
    /// Testbenches with no referrer from the simulation directory.
    Sim,
    /// Union of the source and simulation sets.
    All,
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Tops(ref args) => tops::run(args, &global),
        Command::Deps(ref args) => deps::run(args, &global),
        Command::Tree(ref args) => tree::run(args, &global),
        Command::Unresolved(ref args) => unresolved::run(args, &global),
        Command::Stats(ref args) => stats::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Level used when `RUST_LOG` is unset.
fn log_level(global: &GlobalArgs) -> Level {
    if global.quiet {
        Level::ERROR
    } else if global.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(log_level(global).into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_tops_default() {
        let cli = Cli::parse_from(["trellis", "tops"]);
        match cli.command {
            Command::Tops(ref args) => {
                assert_eq!(args.scope, TopScope::Src);
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Tops command"),
        }
    }

    #[test]
    fn parse_tops_with_args() {
        let cli = Cli::parse_from(["trellis", "tops", "--scope", "sim", "--format", "json"]);
        match cli.command {
            Command::Tops(ref args) => {
                assert_eq!(args.scope, TopScope::Sim);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Tops command"),
        }
    }

    #[test]
    fn parse_deps() {
        let cli = Cli::parse_from(["trellis", "deps", "user/src/top.v", "top", "-f", "json"]);
        match cli.command {
            Command::Deps(ref args) => {
                assert_eq!(args.file, "user/src/top.v");
                assert_eq!(args.module, "top");
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Deps command"),
        }
    }

    #[test]
    fn parse_tree_requires_module() {
        assert!(Cli::try_parse_from(["trellis", "tree", "top.v"]).is_err());
        let cli = Cli::parse_from(["trellis", "tree", "top.v", "top"]);
        assert!(matches!(cli.command, Command::Tree(_)));
    }

    #[test]
    fn parse_unresolved_type_filter() {
        let cli = Cli::parse_from(["trellis", "unresolved", "--type", "fifo"]);
        match cli.command {
            Command::Unresolved(ref args) => {
                assert_eq!(args.type_name.as_deref(), Some("fifo"));
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Unresolved command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["trellis", "--quiet", "--config", "prj/trellis.toml", "stats"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("prj/trellis.toml"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["trellis", "tops", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn level_follows_flags() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: None,
        };
        assert_eq!(log_level(&global), Level::WARN);
        global.verbose = true;
        assert_eq!(log_level(&global), Level::DEBUG);
        global.quiet = true;
        assert_eq!(log_level(&global), Level::ERROR);
    }
}
