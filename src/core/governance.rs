//! Advisory governance-drift detection from version-control state.
//!
//! Reads the working tree's changed paths via `git status --porcelain` with a
//! bounded timeout. Anything that prevents a verdict (no repository, git
//! missing, command failure, timeout) skips the check silently: drift
//! detection is advice, never a gate.

use crate::core::report::ValidationResult;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const GIT_STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Changed paths bucketed by planning layer; everything outside the four
/// planning directories counts as implementation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub implementation: Vec<String>,
    pub requirements: Vec<String>,
    pub cip: Vec<String>,
    pub backlog: Vec<String>,
    pub tenets: Vec<String>,
}

fn run_git_status(root: &Path) -> Result<String> {
    let mut child = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(root)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .context("spawning git status")?;

    let deadline = Instant::now() + GIT_STATUS_TIMEOUT;
    loop {
        match child.try_wait().context("polling git status")? {
            Some(status) if status.success() => {
                let mut stdout = String::new();
                if let Some(mut pipe) = child.stdout.take() {
                    pipe.read_to_string(&mut stdout)
                        .context("reading git status output")?;
                }
                return Ok(stdout);
            }
            Some(status) => anyhow::bail!("git status exited with {status}"),
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                anyhow::bail!("git status timed out after {GIT_STATUS_TIMEOUT:?}");
            }
            None => std::thread::sleep(Duration::from_millis(25)),
        }
    }
}

/// Porcelain lines → changed paths. Renames keep only the new name; blank
/// lines are dropped.
pub fn parse_changed_paths(porcelain: &str) -> Vec<String> {
    let mut paths = Vec::new();
    for line in porcelain.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(entry) = line.get(3..) else {
            continue;
        };
        let path = match entry.split_once(" -> ") {
            Some((_, renamed)) => renamed,
            None => entry,
        };
        let trimmed = path.trim().trim_matches('"');
        if !trimmed.is_empty() {
            paths.push(trimmed.to_string());
        }
    }
    paths
}

pub fn classify_changed_paths(paths: &[String]) -> ChangeSet {
    let mut changes = ChangeSet::default();
    for path in paths {
        let bucket = if path.starts_with("requirements/") {
            &mut changes.requirements
        } else if path.starts_with("cip/") {
            &mut changes.cip
        } else if path.starts_with("backlog/") {
            &mut changes.backlog
        } else if path.starts_with("tenets/") {
            &mut changes.tenets
        } else {
            &mut changes.implementation
        };
        bucket.push(path.clone());
    }
    changes
}

/// The three advisory rules. All may fire in the same run; none is an error.
pub fn drift_warnings(changes: &ChangeSet) -> Vec<String> {
    let mut warnings = Vec::new();
    if !changes.implementation.is_empty() && changes.cip.is_empty() && changes.backlog.is_empty() {
        warnings.push(format!(
            "Governance drift: {} implementation change(s) with no concurrent CIP or backlog update",
            changes.implementation.len()
        ));
    }
    if !changes.requirements.is_empty()
        && !changes.implementation.is_empty()
        && changes.cip.is_empty()
    {
        warnings.push(
            "Traceability gap: requirements and implementation changed with no CIP update"
                .to_string(),
        );
    }
    if !changes.tenets.is_empty()
        && !changes.implementation.is_empty()
        && changes.requirements.is_empty()
    {
        warnings.push(
            "Tenet→implementation gap: tenets and implementation changed with no requirement update"
                .to_string(),
        );
    }
    warnings
}

pub fn check_governance_drift(root: &Path, result: &mut ValidationResult) {
    let Ok(porcelain) = run_git_status(root) else {
        return;
    };
    let paths = parse_changed_paths(&porcelain);
    if paths.is_empty() {
        return;
    }
    for warning in drift_warnings(&classify_changed_paths(&paths)) {
        result.add_warning(warning, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn porcelain_parsing_normalizes_renames_and_blanks() {
        let porcelain = " M src/lib.rs\n\nR  cip/old.md -> cip/cip0001_new.md\n?? backlog/2026-01-03_task.md\n";
        assert_eq!(
            parse_changed_paths(porcelain),
            owned(&[
                "src/lib.rs",
                "cip/cip0001_new.md",
                "backlog/2026-01-03_task.md"
            ])
        );
    }

    #[test]
    fn classification_buckets_by_prefix() {
        let changes = classify_changed_paths(&owned(&[
            "src/lib.rs",
            "requirements/req0001_api.md",
            "cip/cip0001.md",
            "backlog/bugs/2026-01-03_fix.md",
            "tenets/simplicity.md",
            "docs/guide.md",
        ]));
        assert_eq!(changes.implementation, owned(&["src/lib.rs", "docs/guide.md"]));
        assert_eq!(changes.requirements.len(), 1);
        assert_eq!(changes.cip.len(), 1);
        assert_eq!(changes.backlog.len(), 1);
        assert_eq!(changes.tenets.len(), 1);
    }

    #[test]
    fn rules_fire_independently() {
        let changes = classify_changed_paths(&owned(&["src/lib.rs", "tenets/simplicity.md"]));
        let warnings = drift_warnings(&changes);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("Governance drift"));
        assert!(warnings[1].starts_with("Tenet→implementation gap"));

        let changes = classify_changed_paths(&owned(&[
            "src/lib.rs",
            "requirements/req0001_api.md",
            "tenets/simplicity.md",
        ]));
        let warnings = drift_warnings(&changes);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[1].starts_with("Traceability gap"));
    }

    #[test]
    fn cip_update_quiets_governance_drift() {
        let changes = classify_changed_paths(&owned(&["src/lib.rs", "cip/cip0001.md"]));
        assert!(drift_warnings(&changes).is_empty());
    }
}
