//! Component file discovery and the by-id index.
//!
//! Discovery walks one kind's directory tree in sorted order and returns only
//! files whose name matches the kind's filename pattern; template directories
//! and README/index files are never surfaced. The id index is built once per
//! run, before any fixing begins, and backs both cross-reference membership
//! checks and owning-file lookups.

use crate::core::frontmatter;
use crate::core::spec::{ComponentKind, ComponentSpec, SpecRegistry};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn is_template_segment(segment: &str) -> bool {
    segment.eq_ignore_ascii_case("templates") || segment.eq_ignore_ascii_case("template")
}

/// List the files of one component kind under `root`, deterministically
/// ordered. Files with non-conforming names are silently ignored.
pub fn find_component_files(root: &Path, spec: &ComponentSpec) -> Vec<PathBuf> {
    let component_dir = root.join(spec.dir);
    if !component_dir.is_dir() {
        return Vec::new();
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(&component_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !is_template_segment(name))
        });
    for entry in walker {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.eq_ignore_ascii_case("README.md") || name == "index.md" {
            continue;
        }
        if spec.filename_pattern.is_match(name) {
            files.push(entry.into_path());
        }
    }
    files
}

/// Declared id → owning file, per component kind.
#[derive(Debug, Default)]
pub struct IdIndex {
    by_kind: FxHashMap<ComponentKind, FxHashMap<String, PathBuf>>,
}

impl IdIndex {
    /// One pass over every discovered file of every kind. Files without
    /// readable frontmatter or without an `id` field are skipped here; the
    /// validator reports them separately.
    pub fn collect(root: &Path, registry: &SpecRegistry) -> Self {
        let mut by_kind: FxHashMap<ComponentKind, FxHashMap<String, PathBuf>> =
            FxHashMap::default();
        for spec in registry.iter() {
            let ids = by_kind.entry(spec.kind).or_default();
            for path in find_component_files(root, spec) {
                let Some(metadata) = frontmatter::extract(&path) else {
                    continue;
                };
                let Some(id) = frontmatter::field(&metadata, "id")
                    .and_then(frontmatter::scalar_to_string)
                else {
                    continue;
                };
                ids.insert(id, path);
            }
        }
        IdIndex { by_kind }
    }

    pub fn contains(&self, kind: ComponentKind, id: &str) -> bool {
        self.by_kind
            .get(&kind)
            .is_some_and(|ids| ids.contains_key(id))
    }

    pub fn path_of(&self, kind: ComponentKind, id: &str) -> Option<&Path> {
        self.by_kind.get(&kind)?.get(id).map(PathBuf::as_path)
    }
}
