//! Planlint: structure validation for a four-layer planning tree.
//!
//! A planning tree records project governance as markdown files with YAML
//! frontmatter, layered bottom-up: tenets (principles) → requirements
//! (outcomes) → CIPs (implementation proposals) → backlog items (tasks).
//! Planlint keeps that tree structurally honest.
//!
//! # What a run does
//!
//! - Discovers each kind's files by directory and naming convention
//! - Validates frontmatter against the per-kind schema: required fields,
//!   exact-match enums, `YYYY-MM-DD` dates, human attribution
//! - Resolves every cross-reference against a pre-built id index
//! - Optionally repairs common defects (`--fix`) and migrates links recorded
//!   on the wrong end of a relation (`--fix-links`); `--dry-run` computes
//!   both without writing
//! - Advises on process drift from version-control state and on
//!   template/runtime divergence in the self-hosting repository
//!
//! Errors are structural and always fatal to the exit code; warnings are
//! advisory unless `--strict`. The rendered summary's `ERRORS (<n>)` and
//! `WARNINGS (<n>)` markers are parsed by the downstream status tool and
//! must stay stable.
//!
//! # Crate structure
//!
//! - [`cli`]: clap surface
//! - [`core`]: schema registry, frontmatter store, validator, fixers,
//!   drift detectors, reporting

pub mod cli;
pub mod core;

use crate::cli::Cli;
use crate::core::error::PlanlintError;
use crate::core::report;
use crate::core::spec::SpecRegistry;
use crate::core::validate::{self, RunOptions};
use clap::Parser;
use std::process::ExitCode;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("planlint: {err}");
            ExitCode::from(1)
        }
    }
}

fn execute(cli: Cli) -> Result<u8, PlanlintError> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let root = std::fs::canonicalize(&cli.root).map_err(|_| {
        PlanlintError::PathError(format!("root directory not found: {}", cli.root.display()))
    })?;

    let registry = SpecRegistry::standard();
    let options = RunOptions {
        component: cli.component.map(|arg| arg.kind()),
        auto_fix: cli.fix || cli.dry_run,
        dry_run: cli.dry_run,
        fix_links: cli.fix_links,
        governance_drift: !cli.no_governance_drift,
    };

    let result = validate::run_structure_validation(&root, &registry, &options);
    report::print_report(&result, cli.strict, cli.dry_run);
    Ok(report::exit_code(&result, cli.strict))
}
