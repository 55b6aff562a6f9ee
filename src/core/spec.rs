//! Component spec registry for the four planning layers.
//!
//! One immutable table describes every component kind: where its files live,
//! how they are named, which metadata fields are mandatory, and which link
//! fields it may (or must never) carry. The registry is constructed once and
//! passed explicitly so tests can substitute alternate tables.

use regex::Regex;
use std::fmt;

/// The four planning layers, bottom of the link hierarchy first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Tenet,
    Requirement,
    Cip,
    Backlog,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Tenet,
        ComponentKind::Requirement,
        ComponentKind::Cip,
        ComponentKind::Backlog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Tenet => "tenet",
            ComponentKind::Requirement => "requirement",
            ComponentKind::Cip => "cip",
            ComponentKind::Backlog => "backlog",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema for one component kind.
///
/// `allowed_priority` is empty for kinds that carry no priority field;
/// `should_not_have` lists the downward link fields that violate the
/// bottom-up rule when present.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    pub kind: ComponentKind,
    pub dir: &'static str,
    pub filename_pattern: Regex,
    pub id_format: &'static str,
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
    pub allowed_status: &'static [&'static str],
    pub allowed_priority: &'static [&'static str],
    pub links_to: &'static [&'static str],
    pub should_not_have: &'static [&'static str],
}

/// Immutable lookup table over the four component specs.
#[derive(Debug, Clone)]
pub struct SpecRegistry {
    specs: Vec<ComponentSpec>,
}

impl SpecRegistry {
    /// The standard four-layer table. Adding a fifth kind means adding one
    /// entry here plus extending `revlinks::REVERSE_RELATIONS`.
    pub fn standard() -> Self {
        let specs = vec![
            ComponentSpec {
                kind: ComponentKind::Tenet,
                dir: "tenets",
                filename_pattern: Regex::new(r"^[\w-]+\.md$").unwrap(),
                id_format: "kebab-case",
                required_fields: &[
                    "id",
                    "title",
                    "status",
                    "created",
                    "last_reviewed",
                    "review_frequency",
                ],
                optional_fields: &["conflicts_with", "tags"],
                allowed_status: &["Active", "Under Review", "Archived"],
                allowed_priority: &[],
                // Foundation layer: nothing sits above a tenet.
                links_to: &[],
                should_not_have: &[
                    "related_requirements",
                    "related_cips",
                    "related_backlog",
                    "related_tenets",
                ],
            },
            ComponentSpec {
                kind: ComponentKind::Requirement,
                dir: "requirements",
                filename_pattern: Regex::new(r"^req([0-9A-Fa-f]{4})_[\w-]+\.md$").unwrap(),
                id_format: "XXXX (4-digit hex)",
                required_fields: &[
                    "id",
                    "title",
                    "status",
                    "priority",
                    "created",
                    "last_updated",
                    "related_tenets",
                    "stakeholders",
                ],
                optional_fields: &["related_cips", "related_backlog", "tags"],
                allowed_status: &[
                    "Proposed",
                    "Ready",
                    "In Progress",
                    "Implemented",
                    "Validated",
                    "Deferred",
                    "Rejected",
                ],
                allowed_priority: &["High", "Medium", "Low"],
                links_to: &["related_tenets"],
                should_not_have: &["related_requirements"],
            },
            ComponentSpec {
                kind: ComponentKind::Cip,
                dir: "cip",
                filename_pattern: Regex::new(r"^cip([0-9A-Fa-f]{4})(_[\w-]+)?\.md$").unwrap(),
                id_format: "XXXX (4-digit hex)",
                required_fields: &["id", "title", "status", "created", "last_updated"],
                optional_fields: &["author", "related_requirements", "related_cips", "tags"],
                allowed_status: &["Proposed", "Accepted", "Implemented", "Closed", "Rejected"],
                allowed_priority: &[],
                links_to: &["related_requirements"],
                should_not_have: &["related_backlog"],
            },
            ComponentSpec {
                kind: ComponentKind::Backlog,
                dir: "backlog",
                filename_pattern: Regex::new(r"^(\d{4})-(\d{2})-(\d{2})_[\w-]+\.md$").unwrap(),
                id_format: "YYYY-MM-DD_short-name",
                required_fields: &[
                    "id",
                    "title",
                    "status",
                    "priority",
                    "created",
                    "last_updated",
                    "category",
                    "related_cips",
                ],
                optional_fields: &[
                    "owner",
                    "dependencies",
                    "tags",
                    "related_requirements",
                    "no_cip_reason",
                ],
                allowed_status: &["Proposed", "Ready", "In Progress", "Completed", "Abandoned"],
                allowed_priority: &["High", "Medium", "Low"],
                links_to: &["related_cips"],
                // Allowed only through the no-CIP exception checked by the validator.
                should_not_have: &["related_requirements"],
            },
        ];
        SpecRegistry { specs }
    }

    pub fn get(&self, kind: ComponentKind) -> &ComponentSpec {
        self.specs
            .iter()
            .find(|s| s.kind == kind)
            .expect("registry covers every component kind")
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentSpec> {
        self.specs.iter()
    }
}
