//! Reverse-link fixer: migrates link fields recorded on the wrong end of the
//! tenet→requirement→CIP→backlog chain back to their proper owners.
//!
//! Every id is handled independently: an unresolvable reference gets one
//! warning and the rest of the file's links are still fixed. Targets gain the
//! source id with a dedup-before-append, so an interrupted run (target
//! patched, source field not yet cleared) is safe to re-run.

use crate::core::discover::{self, IdIndex};
use crate::core::frontmatter::{self, scalar_to_string, string_list};
use crate::core::report::ValidationResult;
use crate::core::spec::{ComponentKind, SpecRegistry};
use serde_yaml::Value;
use std::path::Path;

/// (source kind, misdirected field, target kind, correct field).
/// A fifth component kind needs its relation added here by hand.
pub const REVERSE_RELATIONS: [(ComponentKind, &str, ComponentKind, &str); 3] = [
    (
        ComponentKind::Tenet,
        "related_requirements",
        ComponentKind::Requirement,
        "related_tenets",
    ),
    (
        ComponentKind::Requirement,
        "related_cips",
        ComponentKind::Cip,
        "related_requirements",
    ),
    (
        ComponentKind::Cip,
        "related_backlog",
        ComponentKind::Backlog,
        "related_cips",
    ),
];

/// Migrate every misdirected reference under `root` to its owning file.
///
/// Returns the number of discrete corrections made, or that would be made
/// under `dry_run`, which never writes.
pub fn fix_reverse_links(
    root: &Path,
    registry: &SpecRegistry,
    index: &IdIndex,
    result: &mut ValidationResult,
    dry_run: bool,
) -> usize {
    let mut corrections = 0usize;

    for (source_kind, misdirected_field, target_kind, target_field) in REVERSE_RELATIONS {
        let source_spec = registry.get(source_kind);
        for source_path in discover::find_component_files(root, source_spec) {
            // Frontmatter defects are the validator's concern, not ours.
            let Some(mut source_metadata) = frontmatter::extract(&source_path) else {
                continue;
            };
            let Some(misdirected) = frontmatter::field(&source_metadata, misdirected_field)
            else {
                continue;
            };
            let ids = string_list(misdirected);

            let Some(source_id) = frontmatter::field(&source_metadata, "id")
                .and_then(scalar_to_string)
            else {
                result.add_warning(
                    format!(
                        "Cannot fix reverse link: {source_kind} '{}' declares no id",
                        source_path.display()
                    ),
                    Some(&source_path),
                );
                continue;
            };

            for target_id in &ids {
                let Some(target_path) = index.path_of(target_kind, target_id) else {
                    result.add_warning(
                        format!(
                            "Cannot fix reverse link: {target_kind} '{target_id}' referenced by {source_kind} '{source_id}' does not exist"
                        ),
                        Some(&source_path),
                    );
                    continue;
                };
                let Some(mut target_metadata) = frontmatter::extract(target_path) else {
                    result.add_warning(
                        format!(
                            "Cannot fix reverse link: {target_kind} '{target_id}' has no readable frontmatter"
                        ),
                        Some(target_path),
                    );
                    continue;
                };

                let mut entries = match frontmatter::field(&target_metadata, target_field) {
                    Some(Value::Sequence(items)) => items.clone(),
                    Some(other) => scalar_to_string(other)
                        .map(|s| vec![Value::String(s)])
                        .unwrap_or_default(),
                    None => Vec::new(),
                };
                let already_present = entries
                    .iter()
                    .filter_map(scalar_to_string)
                    .any(|existing| existing == source_id);
                if already_present {
                    continue;
                }

                entries.push(Value::String(source_id.clone()));
                target_metadata.insert(target_field.into(), Value::Sequence(entries));
                if frontmatter::write(target_path, &target_metadata, dry_run) {
                    result.add_fix(
                        format!(
                            "Moved reverse link: {target_kind} '{target_id}' now lists {source_kind} '{source_id}' in {target_field}"
                        ),
                        Some(target_path),
                    );
                    corrections += 1;
                } else {
                    result.add_warning(
                        format!(
                            "Cannot fix reverse link: failed to write {target_kind} '{target_id}'"
                        ),
                        Some(target_path),
                    );
                }
            }

            frontmatter::remove_field(&mut source_metadata, misdirected_field);
            if frontmatter::write(&source_path, &source_metadata, dry_run) {
                result.add_fix(
                    format!(
                        "Removed misdirected '{misdirected_field}' from {source_kind} '{source_id}'"
                    ),
                    Some(&source_path),
                );
                corrections += 1;
            } else {
                result.add_warning(
                    format!(
                        "Cannot fix reverse link: failed to write {source_kind} '{source_id}'"
                    ),
                    Some(&source_path),
                );
            }
        }
    }

    corrections
}
