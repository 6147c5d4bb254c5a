//! Dependency rewriting.
//!
//! Redirects dependency references from retired ids to their
//! replacements. A rule fires only when the whole `kind:id` string
//! equals the rule's `old` reference: substring matching would also hit
//! longer ids sharing the prefix (rewriting `context:adding-agent` must
//! leave `context:adding-agent-extra` alone) and would grow references
//! like `context:external-libraries-workflow` again on every rerun.

use crate::plan::RewriteRule;
use crate::registry::{Registry, entry_id};
use serde::Serialize;
use serde_json::Value;

/// Outcome of one rewrite pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteReport {
    /// Ids of `agents` entries that had at least one dependency rewritten.
    pub agents_updated: Vec<String>,
    /// Number of dependency strings changed, across both scopes.
    pub refs_rewritten: usize,
}

/// Applies `rules` to the selected agents and to every `contexts` entry
/// that carries a `dependencies` field. Other categories are untouched.
pub fn rewrite_dependencies(
    registry: &mut Registry,
    rules: &[RewriteRule],
    agent_ids: &[String],
) -> RewriteReport {
    let mut report = RewriteReport::default();

    if let Some(agents) = registry.category_mut("agents") {
        for agent in agents.iter_mut() {
            let Some(id) = entry_id(agent).map(str::to_string) else {
                continue;
            };
            if !agent_ids.contains(&id) {
                continue;
            }
            let changed = rewrite_entry(agent, rules);
            if changed > 0 {
                report.refs_rewritten += changed;
                report.agents_updated.push(id);
            }
        }
    }

    if let Some(contexts) = registry.category_mut("contexts") {
        for context in contexts.iter_mut() {
            report.refs_rewritten += rewrite_entry(context, rules);
        }
    }

    report
}

/// Rewrites one entry's `dependencies` array in place, returning how many
/// references changed. Entries without the field are left untouched.
fn rewrite_entry(entry: &mut Value, rules: &[RewriteRule]) -> usize {
    let Some(deps) = entry.get_mut("dependencies").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut changed = 0;
    for dep in deps.iter_mut() {
        let Some(current) = dep.as_str() else {
            continue;
        };
        let rewritten = apply_rules(rules, current);
        if rewritten != current {
            changed += 1;
            *dep = Value::String(rewritten);
        }
    }
    changed
}

/// Applies each rule in sequence to a single reference.
///
/// Exact whole-reference matches only. Because rules are applied in
/// order, a later rule can redirect the output of an earlier one.
pub fn apply_rules(rules: &[RewriteRule], reference: &str) -> String {
    let mut current = reference.to_string();
    for rule in rules {
        if current == rule.old {
            current = rule.new.clone();
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules(items: &[(&str, &str)]) -> Vec<RewriteRule> {
        items
            .iter()
            .map(|(old, new)| RewriteRule::new(*old, *new))
            .collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn deps(registry: &Registry, category: &str, index: usize) -> Value {
        registry.category(category).unwrap()[index]["dependencies"].clone()
    }

    #[test]
    fn rewrites_exact_agent_dependency() {
        let mut registry = Registry::from_value(json!({
            "components": {
                "agents": [{
                    "id": "opencoder",
                    "dependencies": ["context:workflows-delegation", "skill:review"]
                }]
            }
        }));
        let report = rewrite_dependencies(
            &mut registry,
            &rules(&[("context:workflows-delegation", "context:task-delegation-basics")]),
            &strings(&["opencoder"]),
        );
        assert_eq!(report.refs_rewritten, 1);
        assert_eq!(report.agents_updated, vec!["opencoder"]);
        assert_eq!(
            deps(&registry, "agents", 0),
            json!(["context:task-delegation-basics", "skill:review"])
        );
    }

    #[test]
    fn agents_outside_the_selection_are_untouched() {
        let mut registry = Registry::from_value(json!({
            "components": {
                "agents": [{
                    "id": "other",
                    "dependencies": ["context:workflows-delegation"]
                }]
            }
        }));
        let report = rewrite_dependencies(
            &mut registry,
            &rules(&[("context:workflows-delegation", "context:task-delegation-basics")]),
            &strings(&["opencoder"]),
        );
        assert_eq!(report.refs_rewritten, 0);
        assert!(report.agents_updated.is_empty());
        assert_eq!(deps(&registry, "agents", 0), json!(["context:workflows-delegation"]));
    }

    #[test]
    fn rewrites_every_context_with_dependencies() {
        let mut registry = Registry::from_value(json!({
            "components": {
                "contexts": [
                    { "id": "a", "dependencies": ["context:adding-agent"] },
                    { "id": "b", "dependencies": ["context:adding-skill", "context:adding-agent"] },
                    { "id": "c" }
                ]
            }
        }));
        let report = rewrite_dependencies(
            &mut registry,
            &rules(&[
                ("context:adding-agent", "context:adding-agent-basics"),
                ("context:adding-skill", "context:adding-skill-basics"),
            ]),
            &[],
        );
        assert_eq!(report.refs_rewritten, 3);
        assert_eq!(deps(&registry, "contexts", 0), json!(["context:adding-agent-basics"]));
        assert_eq!(
            deps(&registry, "contexts", 1),
            json!(["context:adding-skill-basics", "context:adding-agent-basics"])
        );
    }

    #[test]
    fn prefix_sharing_references_are_not_corrupted() {
        let mut registry = Registry::from_value(json!({
            "components": {
                "contexts": [{
                    "id": "a",
                    "dependencies": [
                        "context:adding-agent-extra",
                        "context:external-libraries-workflow"
                    ]
                }]
            }
        }));
        let report = rewrite_dependencies(
            &mut registry,
            &rules(&[
                ("context:adding-agent", "context:adding-agent-basics"),
                ("context:external-libraries", "context:external-libraries-workflow"),
            ]),
            &[],
        );
        assert_eq!(report.refs_rewritten, 0);
        assert_eq!(
            deps(&registry, "contexts", 0),
            json!([
                "context:adding-agent-extra",
                "context:external-libraries-workflow"
            ])
        );
    }

    #[test]
    fn rewriting_twice_is_a_no_op() {
        let mut registry = Registry::from_value(json!({
            "components": {
                "contexts": [{ "id": "a", "dependencies": ["context:external-libraries"] }]
            }
        }));
        let table = rules(&[("context:external-libraries", "context:external-libraries-workflow")]);
        let first = rewrite_dependencies(&mut registry, &table, &[]);
        assert_eq!(first.refs_rewritten, 1);
        let second = rewrite_dependencies(&mut registry, &table, &[]);
        assert_eq!(second.refs_rewritten, 0);
        assert_eq!(
            deps(&registry, "contexts", 0),
            json!(["context:external-libraries-workflow"])
        );
    }

    #[test]
    fn rules_chain_in_declared_order() {
        let chained = rules(&[("context:a", "context:b"), ("context:b", "context:c")]);
        assert_eq!(apply_rules(&chained, "context:a"), "context:c");

        let reversed = rules(&[("context:b", "context:c"), ("context:a", "context:b")]);
        assert_eq!(apply_rules(&reversed, "context:a"), "context:b");
    }

    #[test]
    fn non_string_dependencies_are_skipped() {
        let mut registry = Registry::from_value(json!({
            "components": {
                "contexts": [{ "id": "a", "dependencies": [7, "context:adding-agent"] }]
            }
        }));
        let report = rewrite_dependencies(
            &mut registry,
            &rules(&[("context:adding-agent", "context:adding-agent-basics")]),
            &[],
        );
        assert_eq!(report.refs_rewritten, 1);
        assert_eq!(
            deps(&registry, "contexts", 0),
            json!([7, "context:adding-agent-basics"])
        );
    }

    #[test]
    fn other_categories_are_untouched() {
        let mut registry = Registry::from_value(json!({
            "components": {
                "skills": [{ "id": "s", "dependencies": ["context:adding-agent"] }]
            }
        }));
        let report = rewrite_dependencies(
            &mut registry,
            &rules(&[("context:adding-agent", "context:adding-agent-basics")]),
            &[],
        );
        assert_eq!(report.refs_rewritten, 0);
        assert_eq!(deps(&registry, "skills", 0), json!(["context:adding-agent"]));
    }
}
