//! Registry document model and persistence.
//!
//! The registry is held as a raw `serde_json::Value` rather than a fully
//! typed document: the file belongs to downstream consumers and carries
//! categories and keys this tool must pass through untouched. Only the
//! pieces the repair edits (category arrays, entry ids, dependency lists)
//! are interpreted. Saving goes through a temporary sibling file and a
//! rename so the registry is never left truncated by a failed write.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// In-memory registry document.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    doc: Value,
}

impl Registry {
    /// Wraps an already-parsed document.
    pub fn from_value(doc: Value) -> Self {
        Self { doc }
    }

    pub fn as_value(&self) -> &Value {
        &self.doc
    }

    pub fn into_value(self) -> Value {
        self.doc
    }

    /// Reads and parses the registry file.
    ///
    /// A missing or malformed file is fatal; callers propagate the error
    /// and nothing is ever written back.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc = serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self { doc })
    }

    /// Serializes with 2-space indentation and atomically replaces `path`.
    ///
    /// The document is written to a `.tmp` sibling first and renamed over
    /// the destination. The temporary file is removed when the rename
    /// cannot happen.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut body =
            serde_json::to_string_pretty(&self.doc).context("Failed to serialize registry")?;
        body.push('\n');

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).with_context(|| format!("Failed to write {}", tmp.display()))?;
        if let Err(err) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(err).with_context(|| format!("Failed to replace {}", path.display()));
        }
        Ok(())
    }

    /// Entries of a category, if the category exists and is an array.
    pub fn category(&self, name: &str) -> Option<&Vec<Value>> {
        self.doc.get("components")?.get(name)?.as_array()
    }

    /// Mutable entries of a category.
    pub fn category_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        self.doc.get_mut("components")?.get_mut(name)?.as_array_mut()
    }

    /// Mutable entries of a category, creating an empty array if absent.
    ///
    /// Fails when the document has no `components` object to attach to,
    /// or when the category exists but is not an array.
    pub fn category_mut_or_insert(&mut self, name: &str) -> Result<&mut Vec<Value>> {
        let components = self
            .doc
            .get_mut("components")
            .and_then(Value::as_object_mut)
            .context("Registry has no `components` object")?;
        components
            .entry(name.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .with_context(|| format!("Category `{}` is not an array", name))
    }

    /// Number of entries in a category (0 if absent).
    pub fn count(&self, name: &str) -> usize {
        self.category(name).map(|entries| entries.len()).unwrap_or(0)
    }

    /// Categories in document order, skipping non-array values.
    pub fn categories(&self) -> impl Iterator<Item = (&String, &Vec<Value>)> {
        self.doc
            .get("components")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|components| components.iter())
            .filter_map(|(name, value)| value.as_array().map(|entries| (name, entries)))
    }
}

/// Returns an entry's `id` when present.
pub fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

/// Prints the registry as an indented tree of categories and entry ids.
///
/// Entry ids are dimmed. `max_depth = 1` shows only category names and
/// their entry counts.
pub fn print_tree(registry: &Registry, max_depth: usize) {
    if max_depth == 0 {
        return;
    }

    for (name, entries) in registry.categories() {
        println!("{} ({})", name, entries.len());
        if max_depth < 2 {
            continue;
        }
        for entry in entries {
            println!("  {}", entry_id(entry).unwrap_or("<no id>").dimmed());
        }
    }
}
