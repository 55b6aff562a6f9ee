//! CLI struct definitions for the planlint command-line interface.

use crate::core::spec::ComponentKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "planlint",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validates a planning tree's structure: component naming, frontmatter schemas, and bottom-up cross-references."
)]
pub struct Cli {
    /// Validate only one component kind.
    #[clap(long, value_enum)]
    pub component: Option<ComponentArg>,
    /// Treat warnings as errors (exit code 1 if any warnings).
    #[clap(long)]
    pub strict: bool,
    /// Auto-fix simple issues (capitalization, missing defaults).
    #[clap(long)]
    pub fix: bool,
    /// Show what would be fixed without making changes (implies --fix).
    #[clap(long)]
    pub dry_run: bool,
    /// Migrate link fields recorded on the wrong end of a relation.
    #[clap(long)]
    pub fix_links: bool,
    /// Disable colored output.
    #[clap(long)]
    pub no_color: bool,
    /// Skip the version-control governance drift check.
    #[clap(long)]
    pub no_governance_drift: bool,
    /// Root directory of the planning tree.
    #[clap(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ComponentArg {
    Req,
    Cip,
    Backlog,
    Tenet,
}

impl ComponentArg {
    pub fn kind(self) -> ComponentKind {
        match self {
            ComponentArg::Req => ComponentKind::Requirement,
            ComponentArg::Cip => ComponentKind::Cip,
            ComponentArg::Backlog => ComponentKind::Backlog,
            ComponentArg::Tenet => ComponentKind::Tenet,
        }
    }
}
