//! CB-004: Recipe resolution — weighted depth-first flattening.
//!
//! Expands a recipe into its total cook time and the merged quantities of
//! every base ingredient. Each component's quantity is scaled by the product
//! of all ancestor quantities. Expansion runs on an explicit work stack in
//! list order, so ingredient totals come out in first-encountered order.
//!
//! Any failure aborts the whole expansion: a missing reference at any depth,
//! a recipe that re-enters its own expansion path, nesting beyond the depth
//! limit, or arithmetic overflow.

use super::error::CookbookError;
use super::registry::Registry;
use super::types::{Entity, RecipeSummary, RequiredItem, DEFAULT_MAX_DEPTH};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Resolver limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Maximum number of nested recipes on one expansion path (root included)
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A recipe being expanded: remaining components and their scale factor.
struct Frame<'a> {
    recipe: &'a str,
    items: std::slice::Iter<'a, RequiredItem>,
    scale: u64,
}

/// Resolve a recipe with default limits.
pub fn resolve(registry: &Registry, name: &str) -> Result<RecipeSummary, CookbookError> {
    resolve_with(registry, name, &ResolveOptions::default())
}

/// Resolve a recipe under a single read lock, so concurrent inserts are
/// never observed partway through.
pub fn resolve_with(
    registry: &Registry,
    name: &str,
    options: &ResolveOptions,
) -> Result<RecipeSummary, CookbookError> {
    let view = registry.read();
    let result = resolve_in(view.entries(), name, options);
    match &result {
        Ok(summary) => debug!(
            recipe = name,
            cook_time = summary.cook_time,
            ingredients = summary.ingredients.len(),
            "recipe resolved"
        ),
        Err(e) => debug!(recipe = name, error = %e, "recipe resolution failed"),
    }
    result
}

/// Flatten `name` against a plain entity map.
pub fn resolve_in(
    entries: &IndexMap<String, Entity>,
    name: &str,
    options: &ResolveOptions,
) -> Result<RecipeSummary, CookbookError> {
    let (root, root_items) = match entries.get_key_value(name) {
        Some((key, Entity::Recipe { required_items })) => (key.as_str(), required_items),
        Some((_, Entity::Ingredient { .. })) | None => {
            return Err(CookbookError::NotFound(name.to_string()))
        }
    };

    let mut cook_time: u64 = 0;
    let mut ingredients: IndexMap<String, u64> = IndexMap::new();

    let mut on_path: FxHashSet<&str> = FxHashSet::default();
    on_path.insert(root);
    let mut stack = vec![Frame {
        recipe: root,
        items: root_items.iter(),
        scale: 1,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(item) = frame.items.next() else {
            on_path.remove(frame.recipe);
            stack.pop();
            continue;
        };
        let quantity = item
            .quantity
            .checked_mul(frame.scale)
            .ok_or_else(|| CookbookError::QuantityOverflow(item.name.clone()))?;

        let (key, entity) = entries
            .get_key_value(item.name.as_str())
            .ok_or_else(|| CookbookError::NotFound(item.name.clone()))?;

        match entity {
            Entity::Ingredient { cook_time: unit } => {
                let overflow = || CookbookError::QuantityOverflow(item.name.clone());
                cook_time = unit
                    .checked_mul(quantity)
                    .and_then(|t| cook_time.checked_add(t))
                    .ok_or_else(overflow)?;
                let total = ingredients.entry(key.clone()).or_insert(0);
                *total = total.checked_add(quantity).ok_or_else(overflow)?;
            }
            Entity::Recipe { required_items } => {
                if !on_path.insert(key.as_str()) {
                    return Err(CookbookError::CyclicReference(key.clone()));
                }
                if stack.len() >= options.max_depth {
                    return Err(CookbookError::DepthExceeded(options.max_depth));
                }
                stack.push(Frame {
                    recipe: key.as_str(),
                    items: required_items.iter(),
                    scale: quantity,
                });
            }
        }
    }

    Ok(RecipeSummary {
        name: name.to_string(),
        cook_time,
        ingredients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CookbookEntry;

    fn registry(entries: &[CookbookEntry]) -> Registry {
        let reg = Registry::new();
        for e in entries {
            reg.insert(e).unwrap();
        }
        reg
    }

    fn pancake_registry() -> Registry {
        registry(&[
            CookbookEntry::ingredient("Egg", 6),
            CookbookEntry::ingredient("Flour", 3),
            CookbookEntry::recipe("Batter", &[("Egg", 2), ("Flour", 1)]),
            CookbookEntry::recipe("Pancake", &[("Batter", 2), ("Egg", 1)]),
        ])
    }

    fn lines(summary: &RecipeSummary) -> Vec<(&str, u64)> {
        summary
            .ingredients
            .iter()
            .map(|(k, &v)| (k.as_str(), v))
            .collect()
    }

    #[test]
    fn test_cb004_pancake_arithmetic() {
        let reg = pancake_registry();
        let summary = resolve(&reg, "Pancake").unwrap();
        assert_eq!(summary.name, "Pancake");
        assert_eq!(summary.cook_time, 2 * (2 * 6 + 3) + 6);
        assert_eq!(summary.cook_time, 36);
        assert_eq!(lines(&summary), vec![("Egg", 5), ("Flour", 2)]);
    }

    #[test]
    fn test_cb004_nested_first_encountered_order() {
        let reg = registry(&[
            CookbookEntry::ingredient("Beef", 5),
            CookbookEntry::ingredient("Egg", 3),
            CookbookEntry::ingredient("Flour", 0),
            CookbookEntry::ingredient("Tomato", 2),
            CookbookEntry::recipe("Meatball", &[("Beef", 2), ("Egg", 1)]),
            CookbookEntry::recipe("Pasta", &[("Flour", 3), ("Egg", 1)]),
            CookbookEntry::recipe(
                "Skibidi Spaghetti",
                &[("Meatball", 3), ("Pasta", 1), ("Tomato", 2)],
            ),
        ]);
        let summary = resolve(&reg, "Skibidi Spaghetti").unwrap();
        assert_eq!(summary.cook_time, 46);
        assert_eq!(
            lines(&summary),
            vec![("Beef", 6), ("Egg", 4), ("Flour", 3), ("Tomato", 2)]
        );
    }

    #[test]
    fn test_cb004_single_ingredient() {
        let reg = registry(&[
            CookbookEntry::recipe("Skibidi", &[("Bruh", 1)]),
            CookbookEntry::ingredient("Bruh", 2),
        ]);
        let summary = resolve(&reg, "Skibidi").unwrap();
        assert_eq!(summary.cook_time, 2);
        assert_eq!(lines(&summary), vec![("Bruh", 1)]);
    }

    #[test]
    fn test_cb004_large_quantity() {
        let reg = registry(&[
            CookbookEntry::ingredient("Sugar", 1),
            CookbookEntry::recipe("Cake", &[("Sugar", 1000)]),
        ]);
        let summary = resolve(&reg, "Cake").unwrap();
        assert_eq!(summary.cook_time, 1000);
        assert_eq!(lines(&summary), vec![("Sugar", 1000)]);
    }

    #[test]
    fn test_cb004_empty_recipe() {
        let reg = registry(&[CookbookEntry::recipe("Air", &[])]);
        let summary = resolve(&reg, "Air").unwrap();
        assert_eq!(summary.cook_time, 0);
        assert!(summary.ingredients.is_empty());
    }

    #[test]
    fn test_cb004_missing_root() {
        let reg = Registry::new();
        assert_eq!(
            resolve(&reg, "nothing"),
            Err(CookbookError::NotFound("nothing".to_string()))
        );
    }

    #[test]
    fn test_cb004_ingredient_root_is_not_found() {
        let reg = registry(&[CookbookEntry::ingredient("beef", 2)]);
        assert_eq!(
            resolve(&reg, "beef"),
            Err(CookbookError::NotFound("beef".to_string()))
        );
    }

    #[test]
    fn test_cb004_forward_reference_resolves_later() {
        let reg = registry(&[CookbookEntry::recipe("Cheese", &[("Milk", 2)])]);
        assert_eq!(
            resolve(&reg, "Cheese"),
            Err(CookbookError::NotFound("Milk".to_string()))
        );
        reg.insert(&CookbookEntry::ingredient("Milk", 4)).unwrap();
        let summary = resolve(&reg, "Cheese").unwrap();
        assert_eq!(summary.cook_time, 8);
        assert_eq!(lines(&summary), vec![("Milk", 2)]);
    }

    #[test]
    fn test_cb004_deep_missing_reference_fails_fast() {
        // Many valid branches resolve before the missing leaf is reached.
        let mut entries = vec![CookbookEntry::ingredient("Salt", 1)];
        let mut top: Vec<(String, i64)> = Vec::new();
        for i in 0..20 {
            let name = format!("Branch {i}");
            let leaf = if i == 17 { "Ghost" } else { "Salt" };
            entries.push(CookbookEntry::recipe(&name, &[(leaf, 2)]));
            top.push((name, 1));
        }
        let top_refs: Vec<(&str, i64)> = top.iter().map(|(n, q)| (n.as_str(), *q)).collect();
        entries.push(CookbookEntry::recipe("Feast", &top_refs));
        let reg = registry(&entries);

        let result = resolve(&reg, "Feast");
        assert_eq!(result, Err(CookbookError::NotFound("Ghost".to_string())));
    }

    #[test]
    fn test_cb004_self_cycle() {
        let reg = registry(&[CookbookEntry::recipe("Sourdough", &[("Sourdough", 1)])]);
        assert_eq!(
            resolve(&reg, "Sourdough"),
            Err(CookbookError::CyclicReference("Sourdough".to_string()))
        );
    }

    #[test]
    fn test_cb004_mutual_cycle() {
        let reg = registry(&[
            CookbookEntry::ingredient("Water", 1),
            CookbookEntry::recipe("Starter", &[("Water", 1), ("Levain", 1)]),
            CookbookEntry::recipe("Levain", &[("Starter", 1)]),
            CookbookEntry::recipe("Bread", &[("Starter", 1)]),
        ]);
        assert_eq!(
            resolve(&reg, "Bread"),
            Err(CookbookError::CyclicReference("Starter".to_string()))
        );
    }

    #[test]
    fn test_cb004_diamond_is_not_a_cycle() {
        let reg = registry(&[
            CookbookEntry::ingredient("Butter", 2),
            CookbookEntry::recipe("Roux", &[("Butter", 1)]),
            CookbookEntry::recipe("Bechamel", &[("Roux", 1)]),
            CookbookEntry::recipe("Veloute", &[("Roux", 2)]),
            CookbookEntry::recipe("Mother Sauces", &[("Bechamel", 1), ("Veloute", 1)]),
        ]);
        let summary = resolve(&reg, "Mother Sauces").unwrap();
        assert_eq!(summary.cook_time, 6);
        assert_eq!(lines(&summary), vec![("Butter", 3)]);
    }

    #[test]
    fn test_cb004_depth_limit() {
        let mut entries = vec![CookbookEntry::ingredient("Grain", 1)];
        entries.push(CookbookEntry::recipe("Level 0", &[("Grain", 1)]));
        for i in 1..10 {
            let below = format!("Level {}", i - 1);
            entries.push(CookbookEntry::recipe(&format!("Level {i}"), &[(below.as_str(), 1)]));
        }
        let reg = registry(&entries);

        // Level 9 nests ten recipes, root included.
        let ok = resolve_with(&reg, "Level 9", &ResolveOptions { max_depth: 10 }).unwrap();
        assert_eq!(ok.cook_time, 1);
        assert_eq!(
            resolve_with(&reg, "Level 9", &ResolveOptions { max_depth: 9 }),
            Err(CookbookError::DepthExceeded(9))
        );
    }

    #[test]
    fn test_cb004_quantity_overflow() {
        let big = i64::MAX;
        let reg = registry(&[
            CookbookEntry::ingredient("Atom", 0),
            CookbookEntry::recipe("Molecule", &[("Atom", big)]),
            CookbookEntry::recipe("Universe", &[("Molecule", big)]),
        ]);
        assert_eq!(
            resolve(&reg, "Universe"),
            Err(CookbookError::QuantityOverflow("Atom".to_string()))
        );
    }

    #[test]
    fn test_cb004_cook_time_overflow() {
        let reg = registry(&[
            CookbookEntry::ingredient("Slow", i64::MAX),
            CookbookEntry::recipe("Slower", &[("Slow", 3)]),
        ]);
        assert_eq!(
            resolve(&reg, "Slower"),
            Err(CookbookError::QuantityOverflow("Slow".to_string()))
        );
    }

    #[test]
    fn test_cb004_resolve_in_plain_map() {
        let mut entries = IndexMap::new();
        entries.insert("Rice".to_string(), Entity::Ingredient { cook_time: 15 });
        entries.insert(
            "Sushi".to_string(),
            Entity::Recipe {
                required_items: vec![RequiredItem::new("Rice", 2)],
            },
        );
        let summary = resolve_in(&entries, "Sushi", &ResolveOptions::default()).unwrap();
        assert_eq!(summary.cook_time, 30);
    }

    #[test]
    fn test_cb004_concurrent_resolve_and_insert() {
        let reg = Registry::new();
        reg.insert(&CookbookEntry::recipe("Cheese", &[("Milk", 2)]))
            .unwrap();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..500 {
                        match resolve(&reg, "Cheese") {
                            Err(e) => assert_eq!(e, CookbookError::NotFound("Milk".to_string())),
                            Ok(summary) => {
                                assert_eq!(summary.cook_time, 8);
                                assert_eq!(lines(&summary), vec![("Milk", 2)]);
                            }
                        }
                    }
                });
            }
            s.spawn(|| {
                std::thread::yield_now();
                reg.insert(&CookbookEntry::ingredient("Milk", 4)).unwrap();
            });
        });
        let summary = resolve(&reg, "Cheese").unwrap();
        assert_eq!(summary.cook_time, 8);
        assert_eq!(lines(&summary), vec![("Milk", 2)]);
    }
}
