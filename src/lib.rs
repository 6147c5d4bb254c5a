//! registry-fix library for repairing a JSON component registry.
//!
//! The registry maps component categories (`contexts`, `agents`, ...) to
//! lists of entries describing files on disk and their inter-dependencies.
//! After a large context file is split into several smaller ones, the
//! registry is left with entries pointing at files that no longer exist
//! and dependency references naming retired ids. The repair runs three
//! passes over one in-memory document:
//!
//! 1. **Pruning**: drop entries whose ids are on the plan's denylist
//! 2. **Insertion**: append entries for split files that exist on disk
//! 3. **Rewriting**: redirect dependency references to the replacement ids
//!
//! # Example
//!
//! ```no_run
//! use registry_fix::fix;
//! use registry_fix::plan::FixPlan;
//! use registry_fix::registry::Registry;
//! use std::path::Path;
//!
//! let path = Path::new("registry.json");
//! let mut registry = Registry::load(path).unwrap();
//!
//! let plan = FixPlan::builtin();
//! let report = fix::apply_plan(&mut registry, &plan, Path::new(".")).unwrap();
//!
//! registry.save(path).unwrap();
//! println!("{} context entries after repair", report.contexts);
//! ```

pub mod cli;
pub mod fix;
pub mod insert;
pub mod plan;
pub mod prune;
pub mod registry;
pub mod rewrite;

// Re-export commonly used types at crate root
pub use fix::FixReport;
pub use plan::{Entry, FixPlan, RewriteRule};
pub use registry::Registry;
