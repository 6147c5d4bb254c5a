//! Fix plans: the rule tables driving a repair run.
//!
//! A plan bundles everything variable about a repair (the id denylist,
//! the candidate entries, the dependency redirects) so the
//! transformation passes stay pure functions over document plus rules.
//! Alternative rule sets can be supplied from a JSON file via `--plan`
//! or constructed directly in tests.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One registry entry, fully specified.
///
/// Candidate additions use this shape. Entries already in the registry
/// are edited in place as raw JSON and never forced through it, so
/// fields this tool does not know about are never dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub description: String,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
    pub category: String,
}

/// A dependency redirect. Both sides are full `kind:id` references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub old: String,
    pub new: String,
}

impl RewriteRule {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Configuration for one repair run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixPlan {
    /// Entry ids to purge.
    pub denylist: Vec<String>,
    /// Categories the denylist applies to.
    #[serde(default = "default_prune_categories")]
    pub prune_categories: Vec<String>,
    /// Entries to append to `contexts`, in declared order.
    pub additions: Vec<Entry>,
    /// Dependency redirects, applied in order.
    pub rewrites: Vec<RewriteRule>,
    /// Ids of `agents` entries whose dependencies are rewritten.
    pub agent_ids: Vec<String>,
}

fn default_prune_categories() -> Vec<String> {
    vec!["contexts".to_string()]
}

impl FixPlan {
    /// Loads a plan from a JSON file (the `--plan` flag).
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan {}", path.display()))?;
        serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse plan {}", path.display()))
    }

    /// The built-in plan: repairs the registry after the context-file
    /// split, purging the superseded ids and registering the split files.
    pub fn builtin() -> Self {
        Self {
            denylist: [
                // Superseded by split files
                "workflows-delegation",
                "design-iteration",
                "animation-patterns",
                "adding-agent",
                "adding-skill",
                "navigation-design",
                "external-libraries",
                // Never existed on disk
                "design-assets",
                "claude-agent-skills",
                "claude-create-subagents",
                "claude-hooks",
                "claude-plugins",
                "navigation",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            prune_categories: default_prune_categories(),
            additions: builtin_additions(),
            rewrites: vec![
                RewriteRule::new(
                    "context:workflows-delegation",
                    "context:task-delegation-basics",
                ),
                RewriteRule::new(
                    "context:external-libraries",
                    "context:external-libraries-workflow",
                ),
                RewriteRule::new("context:adding-agent", "context:adding-agent-basics"),
                RewriteRule::new("context:adding-skill", "context:adding-skill-basics"),
            ],
            agent_ids: vec!["opencoder".to_string()],
        }
    }
}

fn split_context(id: &str, name: &str, path: &str, description: &str, tags: &[&str]) -> Entry {
    Entry {
        id: id.to_string(),
        name: name.to_string(),
        kind: "context".to_string(),
        path: path.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        dependencies: Vec::new(),
        category: "standard".to_string(),
    }
}

/// Entries for the files the split produced, in registration order.
fn builtin_additions() -> Vec<Entry> {
    vec![
        // Task delegation
        split_context(
            "task-delegation-basics",
            "Task Delegation Basics",
            ".opencode/context/core/workflows/task-delegation-basics.md",
            "Task delegation fundamentals and basic usage patterns",
            &["workflows", "delegation"],
        ),
        split_context(
            "task-delegation-specialists",
            "Task Delegation Specialists",
            ".opencode/context/core/workflows/task-delegation-specialists.md",
            "Specialist subagents for task delegation workflows",
            &["workflows", "delegation", "subagents"],
        ),
        split_context(
            "task-delegation-caching",
            "Task Delegation Caching",
            ".opencode/context/core/workflows/task-delegation-caching.md",
            "Caching strategies for task delegation workflows",
            &["workflows", "delegation", "caching"],
        ),
        // Design iteration
        split_context(
            "design-iteration-overview",
            "Design Iteration Overview",
            ".opencode/context/core/workflows/design-iteration-overview.md",
            "Overview of the design iteration workflow process",
            &["workflows", "design", "iteration"],
        ),
        split_context(
            "design-iteration-plan-file",
            "Design Iteration Plan File",
            ".opencode/context/core/workflows/design-iteration-plan-file.md",
            "Structure and format for design iteration plan files",
            &["workflows", "design", "planning"],
        ),
        split_context(
            "design-iteration-plan-iterations",
            "Design Iteration Plan Iterations",
            ".opencode/context/core/workflows/design-iteration-plan-iterations.md",
            "Planning iterations in the design workflow",
            &["workflows", "design", "planning"],
        ),
        split_context(
            "design-iteration-stage-layout",
            "Design Iteration Stage - Layout",
            ".opencode/context/core/workflows/design-iteration-stage-layout.md",
            "Layout stage guidelines for design iteration",
            &["workflows", "design", "layout"],
        ),
        split_context(
            "design-iteration-stage-theme",
            "Design Iteration Stage - Theme",
            ".opencode/context/core/workflows/design-iteration-stage-theme.md",
            "Theme stage guidelines for design iteration",
            &["workflows", "design", "theme"],
        ),
        split_context(
            "design-iteration-stage-implementation",
            "Design Iteration Stage - Implementation",
            ".opencode/context/core/workflows/design-iteration-stage-implementation.md",
            "Implementation stage guidelines for design iteration",
            &["workflows", "design", "implementation"],
        ),
        split_context(
            "design-iteration-stage-animation",
            "Design Iteration Stage - Animation",
            ".opencode/context/core/workflows/design-iteration-stage-animation.md",
            "Animation stage guidelines for design iteration",
            &["workflows", "design", "animation"],
        ),
        split_context(
            "design-iteration-visual-content",
            "Design Iteration Visual Content",
            ".opencode/context/core/workflows/design-iteration-visual-content.md",
            "Visual content guidelines for design iteration",
            &["workflows", "design", "visual"],
        ),
        split_context(
            "design-iteration-best-practices",
            "Design Iteration Best Practices",
            ".opencode/context/core/workflows/design-iteration-best-practices.md",
            "Best practices for design iteration workflows",
            &["workflows", "design", "best-practices"],
        ),
        // External libraries
        split_context(
            "external-libraries-workflow",
            "External Libraries Workflow",
            ".opencode/context/core/workflows/external-libraries-workflow.md",
            "Workflow for managing external library dependencies",
            &["workflows", "external", "libraries"],
        ),
        split_context(
            "external-libraries-scenarios",
            "External Libraries Scenarios",
            ".opencode/context/core/workflows/external-libraries-scenarios.md",
            "Common scenarios for external library integration",
            &["workflows", "external", "libraries", "scenarios"],
        ),
        split_context(
            "external-libraries-faq",
            "External Libraries FAQ",
            ".opencode/context/core/workflows/external-libraries-faq.md",
            "Frequently asked questions about external libraries",
            &["workflows", "external", "libraries", "faq"],
        ),
        // Adding agents
        split_context(
            "adding-agent-basics",
            "Adding Agent - Basics",
            ".opencode/context/openagents-repo/guides/adding-agent-basics.md",
            "Basic guide for adding new agents",
            &["guides", "agents", "basics"],
        ),
        split_context(
            "adding-agent-testing",
            "Adding Agent - Testing",
            ".opencode/context/openagents-repo/guides/adding-agent-testing.md",
            "Testing guide for new agents",
            &["guides", "agents", "testing"],
        ),
        // Adding skills
        split_context(
            "adding-skill-basics",
            "Adding Skill - Basics",
            ".opencode/context/openagents-repo/guides/adding-skill-basics.md",
            "Basic guide for adding new skills",
            &["guides", "skills", "basics"],
        ),
        split_context(
            "adding-skill-implementation",
            "Adding Skill - Implementation",
            ".opencode/context/openagents-repo/guides/adding-skill-implementation.md",
            "Implementation guide for new skills",
            &["guides", "skills", "implementation"],
        ),
        split_context(
            "adding-skill-example",
            "Adding Skill - Example",
            ".opencode/context/openagents-repo/guides/adding-skill-example.md",
            "Example of adding a new skill",
            &["guides", "skills", "examples"],
        ),
        // Navigation design
        split_context(
            "navigation-design-basics",
            "Navigation Design Basics",
            ".opencode/context/core/context-system/guides/navigation-design-basics.md",
            "Basics of designing navigation files",
            &["context-system", "navigation", "design"],
        ),
        split_context(
            "navigation-templates",
            "Navigation Templates",
            ".opencode/context/core/context-system/guides/navigation-templates.md",
            "Templates for navigation files",
            &["context-system", "navigation", "templates"],
        ),
        // Animation patterns
        split_context(
            "animation-basics",
            "Animation Basics",
            ".opencode/context/ui/web/animation-basics.md",
            "Basic animation patterns and guidelines",
            &["ui", "web", "animation"],
        ),
        split_context(
            "animation-advanced",
            "Animation Advanced",
            ".opencode/context/ui/web/animation-advanced.md",
            "Advanced animation patterns and techniques",
            &["ui", "web", "animation"],
        ),
        split_context(
            "animation-components",
            "Animation Components",
            ".opencode/context/ui/web/animation-components.md",
            "Component-specific animation patterns",
            &["ui", "web", "animation", "components"],
        ),
        split_context(
            "animation-forms",
            "Animation Forms",
            ".opencode/context/ui/web/animation-forms.md",
            "Animation patterns for forms",
            &["ui", "web", "animation", "forms"],
        ),
        split_context(
            "animation-chat",
            "Animation Chat",
            ".opencode/context/ui/web/animation-chat.md",
            "Animation patterns for chat interfaces",
            &["ui", "web", "animation", "chat"],
        ),
        split_context(
            "animation-loading",
            "Animation Loading",
            ".opencode/context/ui/web/animation-loading.md",
            "Loading animation patterns",
            &["ui", "web", "animation", "loading"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_plan_is_well_formed() {
        let plan = FixPlan::builtin();
        assert_eq!(plan.denylist.len(), 13);
        assert_eq!(plan.additions.len(), 28);
        assert_eq!(plan.rewrites.len(), 4);
        assert_eq!(plan.agent_ids, vec!["opencoder"]);
        assert_eq!(plan.prune_categories, vec!["contexts"]);
    }

    #[test]
    fn builtin_additions_have_unique_ids() {
        let plan = FixPlan::builtin();
        let ids: HashSet<_> = plan.additions.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids.len(), plan.additions.len());
    }

    #[test]
    fn builtin_additions_are_context_entries() {
        for entry in FixPlan::builtin().additions {
            assert_eq!(entry.kind, "context");
            assert_eq!(entry.category, "standard");
            assert!(entry.dependencies.is_empty());
            assert!(entry.path.ends_with(".md"), "unexpected path {}", entry.path);
        }
    }

    #[test]
    fn builtin_rewrites_target_denylisted_ids() {
        let plan = FixPlan::builtin();
        for rule in &plan.rewrites {
            let old_id = rule.old.strip_prefix("context:").unwrap();
            assert!(
                plan.denylist.iter().any(|id| id == old_id),
                "rewrite source {} is not denylisted",
                rule.old
            );
        }
    }

    #[test]
    fn builtin_rewrite_targets_are_registered() {
        let plan = FixPlan::builtin();
        for rule in &plan.rewrites {
            let new_id = rule.new.strip_prefix("context:").unwrap();
            assert!(
                plan.additions.iter().any(|entry| entry.id == new_id),
                "rewrite target {} has no addition",
                rule.new
            );
        }
    }

    #[test]
    fn entry_serializes_with_type_field() {
        let entry = split_context("a", "A", "a.md", "desc", &["t"]);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "context");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn plan_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let plan = FixPlan::builtin();
        fs::write(&path, serde_json::to_string_pretty(&plan).unwrap()).unwrap();
        let loaded = FixPlan::from_path(&path).unwrap();
        assert_eq!(plan, loaded);
    }

    #[test]
    fn plan_prune_categories_default_to_contexts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        fs::write(
            &path,
            r#"{ "denylist": [], "additions": [], "rewrites": [], "agent_ids": [] }"#,
        )
        .unwrap();
        let plan = FixPlan::from_path(&path).unwrap();
        assert_eq!(plan.prune_categories, vec!["contexts"]);
    }

    #[test]
    fn missing_plan_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FixPlan::from_path(&dir.path().join("plan.json")).is_err());
    }
}
