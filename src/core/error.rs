//! CB-002: Error taxonomy for normalization, registration, and resolution.

use thiserror::Error;

/// Every failure the cookbook core can report.
///
/// Registration errors are raised before the registry is touched; resolution
/// errors abort the whole expansion and never carry a partial summary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CookbookError {
    /// Input text normalized to an empty name
    #[error("'{0}' does not contain a valid name")]
    InvalidName(String),

    /// Entry `type` is neither `ingredient` nor `recipe`
    #[error("invalid type '{0}': expected 'ingredient' or 'recipe'")]
    InvalidType(String),

    /// Entry name is empty
    #[error("entry name must not be empty")]
    EmptyName,

    /// An entity with this name is already registered
    #[error("entry names must be unique: '{0}' already exists")]
    DuplicateName(String),

    /// Ingredient cook time missing, non-integer, or negative
    #[error("ingredient '{0}' needs a non-negative integer cookTime")]
    InvalidCookTime(String),

    /// Required item repeated, unnamed, or without a positive integer quantity
    #[error("recipe '{recipe}' has an invalid or duplicate required item '{item}'")]
    DuplicateOrInvalidRequiredItem { recipe: String, item: String },

    /// Root is absent or an ingredient, or a transitive reference is missing
    #[error("recipe not found: '{0}'")]
    NotFound(String),

    /// Scaled quantity or cook time does not fit in 64 bits
    #[error("quantity overflow while expanding '{0}'")]
    QuantityOverflow(String),

    /// A recipe appears again on its own expansion path
    #[error("cyclic reference: '{0}' requires itself")]
    CyclicReference(String),

    /// Recipe nesting is deeper than the configured limit
    #[error("recipe nesting exceeds depth limit of {0}")]
    DepthExceeded(usize),
}

impl CookbookError {
    /// Stable kind name, used on the wire by the dispatch layer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "InvalidName",
            Self::InvalidType(_) => "InvalidType",
            Self::EmptyName => "EmptyName",
            Self::DuplicateName(_) => "DuplicateName",
            Self::InvalidCookTime(_) => "InvalidCookTime",
            Self::DuplicateOrInvalidRequiredItem { .. } => "DuplicateOrInvalidRequiredItem",
            Self::NotFound(_) => "NotFound",
            Self::QuantityOverflow(_) => "QuantityOverflow",
            Self::CyclicReference(_) => "CyclicReference",
            Self::DepthExceeded(_) => "DepthExceeded",
        }
    }
}
