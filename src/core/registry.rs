//! CB-003: Entity registry — validated, insert-only store of ingredients and recipes.
//!
//! Validation runs completely before the map is touched, so a rejected entry
//! leaves no trace. Recipes may reference names that are not registered yet;
//! those references are checked lazily by the resolver.

use super::error::CookbookError;
use super::types::{CookbookEntry, Entity, EntryKind, RequiredItem};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, info};

/// Shared, uniquely-keyed entity store.
///
/// Inserts take the write lock; readers hold a [`RegistryView`] for as long as
/// they need a consistent picture.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<IndexMap<String, Entity>>,
}

/// Read-locked snapshot of the registry.
pub struct RegistryView<'a> {
    guard: RwLockReadGuard<'a, IndexMap<String, Entity>>,
}

impl RegistryView<'_> {
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.guard.get(name)
    }

    /// Underlying map, in insertion order.
    pub fn entries(&self) -> &IndexMap<String, Entity> {
        &self.guard
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a proposed entry.
    pub fn insert(&self, entry: &CookbookEntry) -> Result<(), CookbookError> {
        // The map is never half-updated, so a poisoned lock still holds valid data.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entity = match validate_entry(entry, &entries) {
            Ok(entity) => entity,
            Err(e) => {
                debug!(name = %entry.name, kind = %entry.kind_label(), error = %e, "entry rejected");
                return Err(e);
            }
        };
        info!(name = %entry.name, kind = %entity.kind(), "entry registered");
        entries.insert(entry.name.clone(), entity);
        Ok(())
    }

    /// Take a read lock for a consistent multi-lookup traversal.
    pub fn read(&self) -> RegistryView<'_> {
        RegistryView {
            guard: self.entries.read().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Clone of a single entity.
    pub fn get(&self, name: &str) -> Option<Entity> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.read().entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check a proposed entry against the current registry contents.
///
/// Order: kind, name, uniqueness, then kind-specific fields. A missing or
/// non-string `type` is an invalid type.
pub fn validate_entry(
    entry: &CookbookEntry,
    existing: &IndexMap<String, Entity>,
) -> Result<Entity, CookbookError> {
    let kind = entry
        .entry_kind()
        .ok_or_else(|| CookbookError::InvalidType(entry.kind_label()))?;

    if entry.name.is_empty() {
        return Err(CookbookError::EmptyName);
    }
    if existing.contains_key(&entry.name) {
        return Err(CookbookError::DuplicateName(entry.name.clone()));
    }

    match kind {
        EntryKind::Ingredient => {
            let cook_time = entry
                .cook_time
                .as_ref()
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| CookbookError::InvalidCookTime(entry.name.clone()))?;
            Ok(Entity::Ingredient { cook_time })
        }
        EntryKind::Recipe => {
            let proposed = entry.required_items.as_deref().unwrap_or_default();
            let mut seen: FxHashSet<&str> = FxHashSet::default();
            let mut required_items = Vec::with_capacity(proposed.len());

            for item in proposed {
                let quantity = item
                    .quantity
                    .as_ref()
                    .and_then(serde_json::Value::as_u64)
                    .filter(|&q| q > 0);
                let (name, quantity) = match (item.name_str(), quantity) {
                    (Some(name), Some(q)) if seen.insert(name) => (name, q),
                    _ => {
                        return Err(CookbookError::DuplicateOrInvalidRequiredItem {
                            recipe: entry.name.clone(),
                            item: item.name_label(),
                        })
                    }
                };
                required_items.push(RequiredItem::new(name, quantity));
            }

            Ok(Entity::Recipe { required_items })
        }
    }
}
