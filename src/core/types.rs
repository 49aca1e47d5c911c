//! CB-000: Cookbook types — file schema, proposed entries, entities, summaries.
//!
//! Wire and file field names are camelCase (`cookTime`, `requiredItems`) so
//! the same entry document works in a cookbook file and in a register request.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Cookbook file
// ============================================================================

/// Root configuration — a cookbook seeded into the registry at startup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CookbookFile {
    /// Schema version (must be "1.0")
    pub version: String,

    /// Human-readable cookbook name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Resolver settings
    #[serde(default)]
    pub settings: Settings,

    /// Entries, registered in order
    #[serde(default)]
    pub entries: Vec<CookbookEntry>,
}

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    /// Maximum recipe nesting depth during expansion
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Default recipe nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

// ============================================================================
// Proposed entries (unvalidated)
// ============================================================================

/// A proposed cookbook entry, before registry validation.
///
/// Numeric fields stay untyped so that bad values are reported as
/// registration errors rather than decode errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CookbookEntry {
    /// Entry kind: "ingredient" or "recipe"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<serde_json::Value>,

    /// Unique entry name
    #[serde(default)]
    pub name: String,

    /// Ingredient cook time (non-negative integer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<serde_json::Value>,

    /// Recipe components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_items: Option<Vec<RequiredItemEntry>>,
}

impl CookbookEntry {
    /// Build an ingredient entry.
    pub fn ingredient(name: &str, cook_time: i64) -> Self {
        Self {
            kind: Some(EntryKind::Ingredient.to_string().into()),
            name: name.to_string(),
            cook_time: Some(serde_json::Value::from(cook_time)),
            required_items: None,
        }
    }

    /// Build a recipe entry from `(name, quantity)` pairs.
    pub fn recipe(name: &str, items: &[(&str, i64)]) -> Self {
        Self {
            kind: Some(EntryKind::Recipe.to_string().into()),
            name: name.to_string(),
            cook_time: None,
            required_items: Some(
                items
                    .iter()
                    .map(|(n, q)| RequiredItemEntry {
                        name: Some(serde_json::Value::from(*n)),
                        quantity: Some(serde_json::Value::from(*q)),
                    })
                    .collect(),
            ),
        }
    }

    /// Recognized kind, if `type` is one of the two known strings.
    pub fn entry_kind(&self) -> Option<EntryKind> {
        self.kind
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(EntryKind::parse)
    }

    /// The `type` value as written, for diagnostics.
    pub fn kind_label(&self) -> String {
        value_label(self.kind.as_ref())
    }
}

/// A proposed recipe component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RequiredItemEntry {
    /// Referenced entry name (may not exist yet)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<serde_json::Value>,

    /// Positive integer quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<serde_json::Value>,
}

impl RequiredItemEntry {
    /// Referenced name, if present as a non-empty string.
    pub fn name_str(&self) -> Option<&str> {
        self.name
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .filter(|n| !n.is_empty())
    }

    /// The `name` value as written, for diagnostics.
    pub fn name_label(&self) -> String {
        value_label(self.name.as_ref())
    }
}

fn value_label(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}

/// Recognized entry kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Ingredient,
    Recipe,
}

impl EntryKind {
    /// Parse the `type` discriminator. Exact, case-sensitive match.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ingredient" => Some(Self::Ingredient),
            "recipe" => Some(Self::Recipe),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingredient => write!(f, "ingredient"),
            Self::Recipe => write!(f, "recipe"),
        }
    }
}

// ============================================================================
// Registered entities
// ============================================================================

/// A validated, registered entity. The name is the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Ingredient {
        #[serde(rename = "cookTime")]
        cook_time: u64,
    },
    Recipe {
        #[serde(rename = "requiredItems")]
        required_items: Vec<RequiredItem>,
    },
}

impl Entity {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Ingredient { .. } => EntryKind::Ingredient,
            Self::Recipe { .. } => EntryKind::Recipe,
        }
    }
}

/// A `(name, quantity)` pair — a recipe component or a summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredItem {
    pub name: String,
    pub quantity: u64,
}

impl RequiredItem {
    pub fn new(name: &str, quantity: u64) -> Self {
        Self {
            name: name.to_string(),
            quantity,
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Flattened expansion of one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    /// Root recipe name
    pub name: String,

    /// Total cook time of every scaled ingredient occurrence
    pub cook_time: u64,

    /// Base ingredient totals, in first-encountered order
    #[serde(with = "ingredient_lines")]
    pub ingredients: IndexMap<String, u64>,
}

impl RecipeSummary {
    /// Ingredient totals as `(name, quantity)` lines.
    pub fn lines(&self) -> Vec<RequiredItem> {
        self.ingredients
            .iter()
            .map(|(name, &quantity)| RequiredItem::new(name, quantity))
            .collect()
    }
}

/// Serialize the ingredient map as an ordered list of `{name, quantity}`.
mod ingredient_lines {
    use super::RequiredItem;
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &IndexMap<String, u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let lines: Vec<RequiredItem> = map
            .iter()
            .map(|(name, &quantity)| RequiredItem::new(name, quantity))
            .collect();
        lines.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, u64>, D::Error> {
        let lines = Vec::<RequiredItem>::deserialize(deserializer)?;
        let mut map = IndexMap::with_capacity(lines.len());
        for line in lines {
            *map.entry(line.name).or_insert(0) += line.quantity;
        }
        Ok(map)
    }
}

// ============================================================================
// Tests
// ============================================================================
