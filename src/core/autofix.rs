//! Fixed repair rules for common frontmatter defects.
//!
//! Each rule is independently evaluated and idempotent: a second pass over an
//! already-repaired file fires nothing. All triggered rules are applied in one
//! write; under dry-run the same fix records are produced without I/O.

use crate::core::frontmatter::{self, scalar_to_string};
use crate::core::report::ValidationResult;
use crate::core::spec::{ComponentKind, ComponentSpec};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const BACKLOG_CATEGORIES: [&str; 4] = ["documentation", "features", "bugs", "infrastructure"];

fn fix_enum_casing(
    metadata: &mut Mapping,
    field_name: &str,
    allowed: &[&str],
    fixes_made: &mut Vec<String>,
) {
    let Some(current) = frontmatter::field(metadata, field_name).and_then(scalar_to_string) else {
        return;
    };
    for allowed_value in allowed {
        if current.eq_ignore_ascii_case(allowed_value) && current != *allowed_value {
            metadata.insert(
                field_name.into(),
                Value::String((*allowed_value).to_string()),
            );
            fixes_made.push(format!(
                "Capitalized {field_name}: '{current}' → '{allowed_value}'"
            ));
            break;
        }
    }
}

/// Deepest path segment naming a backlog category wins; "features" otherwise.
fn infer_category(path: &Path) -> &'static str {
    for component in path.components().rev() {
        if let Some(name) = component.as_os_str().to_str() {
            if let Some(hit) = BACKLOG_CATEGORIES.iter().find(|c| **c == name) {
                return hit;
            }
        }
    }
    "features"
}

/// Apply every triggered repair rule to one file's metadata.
///
/// Records one fix message per fired rule and returns whether anything was
/// applied. A failed write records nothing; the caller must not assume the
/// on-disk file changed.
pub fn auto_fix(
    spec: &ComponentSpec,
    path: &Path,
    metadata: &Mapping,
    result: &mut ValidationResult,
    dry_run: bool,
) -> bool {
    let mut updated = metadata.clone();
    let mut fixes_made: Vec<String> = Vec::new();

    fix_enum_casing(&mut updated, "status", spec.allowed_status, &mut fixes_made);
    fix_enum_casing(
        &mut updated,
        "priority",
        spec.allowed_priority,
        &mut fixes_made,
    );

    if spec.required_fields.contains(&"last_updated")
        && frontmatter::field(&updated, "last_updated").is_none()
    {
        match frontmatter::field(&updated, "created").and_then(scalar_to_string) {
            Some(created) => {
                updated.insert("last_updated".into(), Value::String(created.clone()));
                fixes_made.push(format!("Added last_updated: {created} (from created)"));
            }
            None => {
                let today = chrono::Local::now().format("%Y-%m-%d").to_string();
                updated.insert("last_updated".into(), Value::String(today.clone()));
                fixes_made.push(format!("Added last_updated: {today}"));
            }
        }
    }

    if spec.kind == ComponentKind::Backlog && frontmatter::field(&updated, "category").is_none() {
        let category = infer_category(path);
        updated.insert("category".into(), Value::String(category.to_string()));
        fixes_made.push(format!("Added category: '{category}' (inferred from path)"));
    }

    if spec.kind == ComponentKind::Backlog
        && frontmatter::field(&updated, "related_cips").is_none()
    {
        updated.insert("related_cips".into(), Value::Sequence(Vec::new()));
        fixes_made.push("Added related_cips: [] (empty)".to_string());
    }

    if spec.kind == ComponentKind::Requirement
        && frontmatter::field(&updated, "related_tenets").is_none()
    {
        updated.insert("related_tenets".into(), Value::Sequence(Vec::new()));
        fixes_made.push("Added related_tenets: [] (empty)".to_string());
    }

    if fixes_made.is_empty() {
        return false;
    }

    if frontmatter::write(path, &updated, dry_run) {
        for fix in fixes_made {
            result.add_fix(fix, Some(path));
        }
        true
    } else {
        false
    }
}
