//! Frontmatter store: extract and rewrite the YAML metadata block at the top
//! of a markdown file.
//!
//! Parse failures are swallowed here and surfaced one level up as a
//! missing-frontmatter finding; the document body below the closing delimiter
//! is never touched by a rewrite.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Split `content` into (yaml source, body) when it opens with a `---` block.
fn split_metadata_block(content: &str) -> Option<(&str, &str)> {
    let after_open = content.strip_prefix("---")?;
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    let mut offset = 0usize;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Extract the metadata mapping, or None when the file is unreadable, carries
/// no block, the block does not parse, or the mapping is empty.
pub fn extract(path: &Path) -> Option<Mapping> {
    let content = fs::read_to_string(path).ok()?;
    let (yaml, _) = split_metadata_block(&content)?;
    let metadata: Mapping = serde_yaml::from_str(yaml).ok()?;
    if metadata.is_empty() {
        None
    } else {
        Some(metadata)
    }
}

/// Re-serialize the metadata block in place, preserving the body bytes.
///
/// Returns false on any read, serialization, or write failure; the caller
/// must not assume success. Under `dry_run` no I/O happens at all.
pub fn write(path: &Path, metadata: &Mapping, dry_run: bool) -> bool {
    if dry_run {
        return true;
    }
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return false,
    };
    let body = match split_metadata_block(&content) {
        Some((_, body)) => body,
        None => content.as_str(),
    };
    let yaml = match serde_yaml::to_string(metadata) {
        Ok(y) => y,
        Err(_) => return false,
    };
    fs::write(path, format!("---\n{yaml}---\n{body}")).is_ok()
}

/// Field lookup by name.
pub fn field<'a>(metadata: &'a Mapping, name: &str) -> Option<&'a Value> {
    metadata
        .iter()
        .find(|(key, _)| key.as_str() == Some(name))
        .map(|(_, value)| value)
}

/// Drop a field, keeping the remaining entries in order.
pub fn remove_field(metadata: &mut Mapping, name: &str) {
    let filtered: Mapping = metadata
        .iter()
        .filter(|(key, _)| key.as_str() != Some(name))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    *metadata = filtered;
}

/// Render a scalar metadata value in the string form used for ids, enum
/// values, and dates. Lists and mappings have no scalar form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce a link field to a list of id strings; a scalar becomes a
/// one-element list, anything unrepresentable is dropped.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

/// Truthiness for present-and-truthy checks on metadata fields.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(m) => !m.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn extract_reads_leading_block_only() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("note.md");
        fs::write(&path, "---\nid: alpha\ntags: [a, b]\n---\n# Alpha\n\n---\nnot metadata\n").unwrap();

        let metadata = extract(&path).expect("metadata");
        assert_eq!(
            field(&metadata, "id").and_then(scalar_to_string).as_deref(),
            Some("alpha")
        );
        assert_eq!(metadata.len(), 2);
    }

    #[test]
    fn extract_returns_none_without_block_or_on_bad_yaml() {
        let tmp = tempdir().expect("tempdir");

        let plain = tmp.path().join("plain.md");
        fs::write(&plain, "# Just a document\n").unwrap();
        assert!(extract(&plain).is_none());

        let broken = tmp.path().join("broken.md");
        fs::write(&broken, "---\nid: [unclosed\n---\nbody\n").unwrap();
        assert!(extract(&broken).is_none());

        let empty = tmp.path().join("empty.md");
        fs::write(&empty, "---\n---\nbody\n").unwrap();
        assert!(extract(&empty).is_none());

        assert!(extract(&tmp.path().join("missing.md")).is_none());
    }

    #[test]
    fn write_preserves_body_bytes() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("note.md");
        let body = "# Title\n\nBody with trailing spaces   \nand a final line";
        fs::write(&path, format!("---\nid: alpha\n---\n{body}")).unwrap();

        let metadata = extract(&path).expect("metadata");
        assert!(write(&path, &metadata, false));

        let rewritten = fs::read_to_string(&path).unwrap();
        let (_, rewritten_body) = split_metadata_block(&rewritten).expect("block");
        assert_eq!(rewritten_body, body);
    }

    #[test]
    fn write_dry_run_touches_nothing() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("note.md");
        fs::write(&path, "---\nid: alpha\n---\nbody\n").unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let mut metadata = extract(&path).expect("metadata");
        metadata.insert("status".into(), "Active".into());
        assert!(write(&path, &metadata, true));

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn string_list_coerces_scalars() {
        assert_eq!(string_list(&Value::String("0001".into())), vec!["0001"]);
        let seq: Value = serde_yaml::from_str("[0001a, two]").unwrap();
        assert_eq!(string_list(&seq), vec!["0001a", "two"]);
        assert!(string_list(&Value::Null).is_empty());
    }

    #[test]
    fn truthiness_follows_emptiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::String(String::new())));
        assert!(!is_truthy(&Value::Sequence(Vec::new())));
        assert!(is_truthy(&Value::String("x".into())));
        assert!(is_truthy(&serde_yaml::from_str("[a]").unwrap()));
    }
}
