//! Split-entry insertion.
//!
//! Appends candidate entries to a category after checking that each
//! candidate's file exists under the repository root. Candidates whose
//! file is missing are skipped and surface as warnings; ids already
//! registered are skipped so a rerun never creates duplicates.

use crate::plan::Entry;
use crate::registry::{Registry, entry_id};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// A candidate that was not added, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCandidate {
    pub id: String,
    pub path: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The candidate's file does not exist under the repository root.
    MissingFile,
    /// An entry with the same id is already registered.
    AlreadyPresent,
}

/// Outcome of one insertion pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsertReport {
    pub added: usize,
    pub skipped: Vec<SkippedCandidate>,
}

impl InsertReport {
    /// Skipped candidates whose file was missing, i.e. the warnings to print.
    pub fn missing_files(&self) -> impl Iterator<Item = &SkippedCandidate> {
        self.skipped
            .iter()
            .filter(|skipped| skipped.reason == SkipReason::MissingFile)
    }
}

/// Appends `candidates` to `category` in declared order.
///
/// Existing entries are never modified or reordered; the category array
/// is created when absent. Candidate paths are resolved against `root`.
pub fn append_candidates(
    registry: &mut Registry,
    category: &str,
    candidates: &[Entry],
    root: &Path,
) -> Result<InsertReport> {
    let mut report = InsertReport::default();

    let entries = registry.category_mut_or_insert(category)?;
    let mut present: HashSet<String> = entries
        .iter()
        .filter_map(entry_id)
        .map(str::to_string)
        .collect();

    for candidate in candidates {
        if !root.join(&candidate.path).exists() {
            report.skipped.push(SkippedCandidate {
                id: candidate.id.clone(),
                path: candidate.path.clone(),
                reason: SkipReason::MissingFile,
            });
            continue;
        }
        if present.contains(&candidate.id) {
            report.skipped.push(SkippedCandidate {
                id: candidate.id.clone(),
                path: candidate.path.clone(),
                reason: SkipReason::AlreadyPresent,
            });
            continue;
        }

        let value = serde_json::to_value(candidate)
            .with_context(|| format!("Failed to serialize candidate {}", candidate.id))?;
        entries.push(value);
        present.insert(candidate.id.clone());
        report.added += 1;
    }

    Ok(report)
}
