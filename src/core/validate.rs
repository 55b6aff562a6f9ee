//! Per-file structure checks and the whole-tree validation pass.
//!
//! Checks are sequential per file and accumulate into the shared result
//! instead of aborting the run; only a failed prerequisite (bad filename,
//! unreadable frontmatter) stops the remaining checks for that one file.
//!
//! # Check order
//!
//! 1. Filename against the kind's pattern
//! 2. Frontmatter extraction
//! 3. Auto-fix (when enabled), then re-extract so later checks see post-fix
//!    values
//! 4. Required fields
//! 5. Exact-match status/priority enums
//! 6. `YYYY-MM-DD` date fields
//! 7. Bottom-up violations (advisory)
//! 8. Backlog no-CIP exception
//! 9. Human attribution
//! 10. Cross-references against the id index

use crate::core::autofix;
use crate::core::discover::{self, IdIndex};
use crate::core::frontmatter::{self, scalar_to_string};
use crate::core::governance;
use crate::core::report::ValidationResult;
use crate::core::revlinks;
use crate::core::spec::{ComponentKind, ComponentSpec, SpecRegistry};
use crate::core::sysdrift;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Words that mark a machine or placeholder rather than a person.
const NON_HUMAN_MARKERS: [&str; 6] = ["ai", "assistant", "unknown", "openai", "bot", "agent"];
const PLACEHOLDER_PHRASES: [&str; 3] = ["your name here", "author name", "owner name"];

/// Target kind implied by a link field's name.
///
/// Substring matching is fragile on purpose-built schemas; it stays isolated
/// here so an explicit per-field target map can replace it without touching
/// callers.
pub fn infer_target_kind(field_name: &str) -> Option<ComponentKind> {
    if field_name.contains("tenet") {
        Some(ComponentKind::Tenet)
    } else if field_name.contains("requirement") {
        Some(ComponentKind::Requirement)
    } else if field_name.contains("cip") {
        Some(ComponentKind::Cip)
    } else if field_name.contains("backlog") {
        Some(ComponentKind::Backlog)
    } else {
        None
    }
}

pub fn validate_file_naming(
    spec: &ComponentSpec,
    path: &Path,
    result: &mut ValidationResult,
) -> bool {
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if spec.filename_pattern.is_match(filename) {
        return true;
    }
    result.add_error(
        format!(
            "File naming violation: '{}' doesn't match pattern {}",
            filename,
            spec.filename_pattern.as_str()
        ),
        Some(path),
    );
    false
}

fn validate_required_fields(
    spec: &ComponentSpec,
    metadata: &Mapping,
    path: &Path,
    result: &mut ValidationResult,
) {
    for field_name in spec.required_fields {
        if frontmatter::field(metadata, field_name).is_none() {
            result.add_error(format!("Missing required field: '{field_name}'"), Some(path));
        }
    }
}

fn validate_enum_field(
    metadata: &Mapping,
    field_name: &str,
    allowed: &[&str],
    path: &Path,
    result: &mut ValidationResult,
) {
    if allowed.is_empty() {
        return;
    }
    let Some(value) = frontmatter::field(metadata, field_name) else {
        return;
    };
    let display = scalar_to_string(value).unwrap_or_else(|| "non-scalar value".to_string());
    if !allowed.contains(&display.as_str()) {
        result.add_error(
            format!("Invalid {field_name}: '{display}'. Allowed: {allowed:?}"),
            Some(path),
        );
    }
}

fn validate_date_fields(metadata: &Mapping, path: &Path, result: &mut ValidationResult) {
    let date_format = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    for date_field in ["created", "last_updated", "last_reviewed"] {
        let Some(value) = frontmatter::field(metadata, date_field) else {
            continue;
        };
        let rendered = scalar_to_string(value).unwrap_or_default();
        if !date_format.is_match(&rendered) {
            result.add_error(
                format!(
                    "Invalid date format for '{date_field}': '{rendered}'. Expected YYYY-MM-DD"
                ),
                Some(path),
            );
        }
    }
}

fn validate_bottom_up(
    spec: &ComponentSpec,
    metadata: &Mapping,
    path: &Path,
    result: &mut ValidationResult,
) {
    for field_name in spec.should_not_have {
        if spec.kind == ComponentKind::Backlog && *field_name == "related_requirements" {
            // Routed through the no-CIP exception check instead.
            continue;
        }
        if let Some(value) = frontmatter::field(metadata, field_name) {
            if frontmatter::is_truthy(value) {
                result.add_warning(
                    format!(
                        "Violates bottom-up pattern: Has '{field_name}' field. {}s should only link upward",
                        spec.kind
                    ),
                    Some(path),
                );
            }
        }
    }
}

/// Backlog items normally must not link to requirements directly. The one
/// sanctioned shape: `related_requirements` as a list, `related_cips` present
/// as a list, and a non-empty `no_cip_reason` whenever `related_cips` is
/// non-empty.
fn validate_backlog_link_exception(
    metadata: &Mapping,
    path: &Path,
    result: &mut ValidationResult,
) {
    let Some(related_requirements) = frontmatter::field(metadata, "related_requirements") else {
        return;
    };
    if !frontmatter::is_truthy(related_requirements) {
        return;
    }

    if !matches!(related_requirements, Value::Sequence(_)) {
        result.add_error(
            "Backlog 'related_requirements' must be a list of requirement ids",
            Some(path),
        );
        return;
    }

    match frontmatter::field(metadata, "related_cips") {
        None => {
            result.add_error(
                "Backlog 'related_requirements' requires 'related_cips' to be present as a list",
                Some(path),
            );
        }
        Some(Value::Sequence(cips)) => {
            if !cips.is_empty() {
                let reason_present = matches!(
                    frontmatter::field(metadata, "no_cip_reason"),
                    Some(Value::String(reason)) if !reason.trim().is_empty()
                );
                if !reason_present {
                    result.add_error(
                        "Backlog 'related_requirements' alongside non-empty 'related_cips' requires a non-empty 'no_cip_reason'",
                        Some(path),
                    );
                }
            }
        }
        Some(_) => {
            result.add_error("Backlog 'related_cips' must be a list", Some(path));
        }
    }
}

fn validate_attribution(metadata: &Mapping, path: &Path, result: &mut ValidationResult) {
    for field_name in ["author", "owner"] {
        let Some(value) = frontmatter::field(metadata, field_name) else {
            continue;
        };
        let Value::String(raw) = value else {
            result.add_error(
                format!(
                    "Invalid {field_name}: expected a single person's name, got a non-string value"
                ),
                Some(path),
            );
            continue;
        };
        let name = raw.trim();
        let lowered = name.to_lowercase();
        if name.is_empty() {
            result.add_error(
                format!("Invalid {field_name}: must be a non-empty string"),
                Some(path),
            );
        } else if lowered == "n/a"
            || name.contains('[')
            || name.contains(']')
            || PLACEHOLDER_PHRASES.iter().any(|p| lowered.contains(p))
            || lowered
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| NON_HUMAN_MARKERS.contains(&word))
        {
            result.add_error(
                format!("Invalid {field_name}: '{name}' does not identify a human author"),
                Some(path),
            );
        } else if name.contains(',') || lowered.contains(" and ") {
            result.add_error(
                format!("Invalid {field_name}: '{name}' names more than one person"),
                Some(path),
            );
        }
    }
}

fn validate_cross_references(
    spec: &ComponentSpec,
    metadata: &Mapping,
    path: &Path,
    index: &IdIndex,
    result: &mut ValidationResult,
) {
    for link_field in spec.links_to {
        let Some(value) = frontmatter::field(metadata, link_field) else {
            continue;
        };
        let Some(target_kind) = infer_target_kind(link_field) else {
            continue;
        };
        for ref_id in frontmatter::string_list(value) {
            if !index.contains(target_kind, &ref_id) {
                result.add_warning(
                    format!(
                        "Broken reference: {link_field} references '{ref_id}' which doesn't exist"
                    ),
                    Some(path),
                );
            }
        }
    }
}

/// Run the full check sequence against one component file.
pub fn validate_component(
    registry: &SpecRegistry,
    kind: ComponentKind,
    path: &Path,
    index: &IdIndex,
    result: &mut ValidationResult,
    auto_fix: bool,
    dry_run: bool,
) {
    let spec = registry.get(kind);

    if !validate_file_naming(spec, path, result) {
        return;
    }

    let Some(mut metadata) = frontmatter::extract(path) else {
        result.add_error("Missing or invalid YAML frontmatter", Some(path));
        return;
    };

    if auto_fix {
        autofix::auto_fix(spec, path, &metadata, result, dry_run);
        if !dry_run {
            if let Some(refreshed) = frontmatter::extract(path) {
                metadata = refreshed;
            }
        }
    }

    validate_required_fields(spec, &metadata, path, result);
    validate_enum_field(&metadata, "status", spec.allowed_status, path, result);
    validate_enum_field(&metadata, "priority", spec.allowed_priority, path, result);
    validate_date_fields(&metadata, path, result);
    validate_bottom_up(spec, &metadata, path, result);
    if kind == ComponentKind::Backlog {
        validate_backlog_link_exception(&metadata, path, result);
    }
    validate_attribution(&metadata, path, result);
    validate_cross_references(spec, &metadata, path, index, result);
}

/// Knobs for one validation pass, mapped one-to-one from the CLI flags.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub component: Option<ComponentKind>,
    pub auto_fix: bool,
    pub dry_run: bool,
    pub fix_links: bool,
    pub governance_drift: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            component: None,
            auto_fix: false,
            dry_run: false,
            fix_links: false,
            governance_drift: true,
        }
    }
}

/// One read-mostly (optionally read-write) pass over the whole tree.
pub fn run_structure_validation(
    root: &Path,
    registry: &SpecRegistry,
    options: &RunOptions,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    // Built once, before any fixing begins; checks on one file never observe
    // another file's same-run writes except through this index.
    let index = IdIndex::collect(root, registry);

    if options.fix_links {
        revlinks::fix_reverse_links(root, registry, &index, &mut result, options.dry_run);
    }

    let kinds: Vec<ComponentKind> = match options.component {
        Some(kind) => vec![kind],
        None => ComponentKind::ALL.to_vec(),
    };

    for kind in kinds {
        let spec = registry.get(kind);
        let files = discover::find_component_files(root, spec);
        result.add_info(format!("Found {} {} file(s)", files.len(), kind));
        for path in files {
            validate_component(
                registry,
                kind,
                &path,
                &index,
                &mut result,
                options.auto_fix,
                options.dry_run,
            );
        }
    }

    if options.governance_drift {
        governance::check_governance_drift(root, &mut result);
    }
    sysdrift::check_system_file_drift(root, &mut result);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_kind_follows_field_name() {
        assert_eq!(
            infer_target_kind("related_tenets"),
            Some(ComponentKind::Tenet)
        );
        assert_eq!(
            infer_target_kind("related_requirements"),
            Some(ComponentKind::Requirement)
        );
        assert_eq!(infer_target_kind("related_cips"), Some(ComponentKind::Cip));
        assert_eq!(
            infer_target_kind("related_backlog"),
            Some(ComponentKind::Backlog)
        );
        assert_eq!(infer_target_kind("stakeholders"), None);
    }
}
