//! Template-vs-installed-copy drift for the self-hosting repository.
//!
//! The canonical sources live under `templates/`; installation copies them
//! into runtime locations. Downstream projects carry only the runtime copies
//! and no `templates/` directory, so the whole check is a no-op there.

use crate::core::report::ValidationResult;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Canonical template path → installed runtime path.
pub const TEMPLATE_RUNTIME_PAIRS: [(&str, &str); 3] = [
    ("templates/scripts/whats_next.py", "scripts/whats_next.py"),
    ("templates/backlog/update_index.py", "backlog/update_index.py"),
    ("templates/tenets/combine_tenets.py", "tenets/combine_tenets.py"),
];

/// Newline-normalized content digest, stable across platforms and editors.
fn normalized_digest(content: &str) -> [u8; 32] {
    let normalized = content.replace("\r\n", "\n");
    Sha256::digest(normalized.as_bytes()).into()
}

pub fn check_system_file_drift(root: &Path, result: &mut ValidationResult) {
    if !root.join("templates").is_dir() {
        return;
    }

    for (template_rel, runtime_rel) in TEMPLATE_RUNTIME_PAIRS {
        let template_path = root.join(template_rel);
        let runtime_path = root.join(runtime_rel);

        if !template_path.is_file() {
            result.add_error(
                format!("Missing canonical template file: {template_rel}"),
                Some(&template_path),
            );
            continue;
        }
        if !runtime_path.is_file() {
            // Runtime copy not installed in this checkout; that's fine.
            continue;
        }

        let template_content = match fs::read_to_string(&template_path) {
            Ok(content) => content,
            Err(err) => {
                result.add_warning(
                    format!("Cannot read template {template_rel}: {err}"),
                    Some(&template_path),
                );
                continue;
            }
        };
        let runtime_content = match fs::read_to_string(&runtime_path) {
            Ok(content) => content,
            Err(err) => {
                result.add_warning(
                    format!("Cannot read runtime copy {runtime_rel}: {err}"),
                    Some(&runtime_path),
                );
                continue;
            }
        };

        if normalized_digest(&template_content) == normalized_digest(&runtime_content) {
            continue;
        }

        // A runtime copy newer than its template means someone edited the
        // deployed file instead of the source of truth. An mtime lookup
        // failure falls back to the stale-copy verdict.
        let runtime_newer = match (
            fs::metadata(&template_path).and_then(|m| m.modified()),
            fs::metadata(&runtime_path).and_then(|m| m.modified()),
        ) {
            (Ok(template_mtime), Ok(runtime_mtime)) => runtime_mtime > template_mtime,
            _ => false,
        };
        if runtime_newer {
            result.add_error(
                format!(
                    "System file drift: {runtime_rel} is runtime AHEAD of templates (edit {template_rel} instead, then re-install)"
                ),
                Some(&runtime_path),
            );
        } else {
            result.add_error(
                format!(
                    "System file drift: {runtime_rel} runtime differs from templates (stale copy, re-sync from {template_rel})"
                ),
                Some(&runtime_path),
            );
        }
    }
}
