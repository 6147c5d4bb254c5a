//! Dead-entry removal.
//!
//! Purges entries whose ids appear on a plan's denylist. Only the
//! categories the plan names are touched; everything else in the
//! document passes through untouched. The denylist is a closed set;
//! no discovery of actually-missing files happens here.

use crate::registry::{Registry, entry_id};
use serde::Serialize;
use std::collections::HashSet;

/// Removal count for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRemoval {
    pub category: String,
    pub removed: usize,
}

/// Drops denylisted entries from the named categories, preserving the
/// order of survivors.
///
/// Returns one count per category that actually lost entries. Denylisted
/// ids that are already absent are simply not found, which is what makes
/// a second run a no-op.
pub fn remove_denylisted(
    registry: &mut Registry,
    categories: &[String],
    denylist: &[String],
) -> Vec<CategoryRemoval> {
    let deny: HashSet<&str> = denylist.iter().map(String::as_str).collect();
    let mut removals = Vec::new();

    for category in categories {
        let Some(entries) = registry.category_mut(category) else {
            continue;
        };
        let before = entries.len();
        entries.retain(|entry| entry_id(entry).is_none_or(|id| !deny.contains(id)));
        let removed = before - entries.len();
        if removed > 0 {
            removals.push(CategoryRemoval {
                category: category.clone(),
                removed,
            });
        }
    }

    removals
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Registry {
        Registry::from_value(json!({
            "components": {
                "contexts": [
                    { "id": "workflows-delegation" },
                    { "id": "task-delegation-basics" },
                    { "id": "design-iteration" },
                    { "id": "animation-basics" }
                ],
                "agents": [
                    { "id": "workflows-delegation" }
                ]
            }
        }))
    }

    #[test]
    fn removes_denylisted_entries_in_order() {
        let mut registry = sample();
        let removals = remove_denylisted(
            &mut registry,
            &strings(&["contexts"]),
            &strings(&["workflows-delegation", "design-iteration"]),
        );
        assert_eq!(
            removals,
            vec![CategoryRemoval {
                category: "contexts".to_string(),
                removed: 2
            }]
        );
        let survivors: Vec<_> = registry
            .category("contexts")
            .unwrap()
            .iter()
            .filter_map(entry_id)
            .collect();
        assert_eq!(survivors, vec!["task-delegation-basics", "animation-basics"]);
    }

    #[test]
    fn unlisted_categories_are_untouched() {
        let mut registry = sample();
        remove_denylisted(
            &mut registry,
            &strings(&["contexts"]),
            &strings(&["workflows-delegation"]),
        );
        // The agents entry shares the denylisted id but its category was not named.
        assert_eq!(registry.count("agents"), 1);
    }

    #[test]
    fn absent_denylist_ids_report_nothing() {
        let mut registry = sample();
        let removals = remove_denylisted(
            &mut registry,
            &strings(&["contexts"]),
            &strings(&["no-such-id"]),
        );
        assert!(removals.is_empty());
        assert_eq!(registry.count("contexts"), 4);
    }

    #[test]
    fn missing_category_is_skipped() {
        let mut registry = sample();
        let removals = remove_denylisted(
            &mut registry,
            &strings(&["skills"]),
            &strings(&["workflows-delegation"]),
        );
        assert!(removals.is_empty());
    }

    #[test]
    fn entries_without_an_id_survive() {
        let mut registry = Registry::from_value(json!({
            "components": {
                "contexts": [
                    { "name": "anonymous" },
                    { "id": "stale" }
                ]
            }
        }));
        remove_denylisted(&mut registry, &strings(&["contexts"]), &strings(&["stale"]));
        assert_eq!(registry.count("contexts"), 1);
    }
}
