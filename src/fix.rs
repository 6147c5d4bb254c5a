//! The repair driver.
//!
//! Runs the three passes (prune, insert, rewrite) in fixed order and
//! accumulates their reports. Persistence stays with the caller: a
//! failure in any pass aborts before anything is written, so the on-disk
//! registry is either fully repaired or untouched.

use crate::insert::{self, InsertReport};
use crate::plan::FixPlan;
use crate::prune::{self, CategoryRemoval};
use crate::registry::Registry;
use crate::rewrite::{self, RewriteReport};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Category receiving split-file entries.
pub const CONTEXTS: &str = "contexts";

/// Combined outcome of one repair run.
#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub removed: Vec<CategoryRemoval>,
    pub inserted: InsertReport,
    pub rewritten: RewriteReport,
    /// `contexts` entry count after the run.
    pub contexts: usize,
}

/// Applies a plan to an in-memory registry.
///
/// Touches the filesystem only for candidate existence checks under
/// `root`; writing the result back is the caller's last step.
pub fn apply_plan(registry: &mut Registry, plan: &FixPlan, root: &Path) -> Result<FixReport> {
    let removed = prune::remove_denylisted(registry, &plan.prune_categories, &plan.denylist);
    let inserted = insert::append_candidates(registry, CONTEXTS, &plan.additions, root)?;
    let rewritten = rewrite::rewrite_dependencies(registry, &plan.rewrites, &plan.agent_ids);

    Ok(FixReport {
        removed,
        inserted,
        rewritten,
        contexts: registry.count(CONTEXTS),
    })
}
