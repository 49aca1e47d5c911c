//! CB-005: Cookbook file parsing, validation, and registry seeding.
//!
//! Parses cookbook.yaml (or a `.toml` equivalent) and validates:
//! - Version must be "1.0"
//! - Name must not be empty
//! - settings.max_depth must be positive
//! - Every entry must pass registry validation, in file order

use super::registry::Registry;
use super::resolver::ResolveOptions;
use super::types::*;
use std::path::Path;

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse a cookbook file from disk. `.toml` files are read as TOML,
/// everything else as YAML.
pub fn parse_cookbook_file(path: &Path) -> Result<CookbookFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_cookbook_toml(&content),
        _ => parse_cookbook(&content),
    }
}

/// Parse a cookbook from a YAML string.
pub fn parse_cookbook(yaml: &str) -> Result<CookbookFile, String> {
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Parse a cookbook from a TOML string.
pub fn parse_cookbook_toml(content: &str) -> Result<CookbookFile, String> {
    toml::from_str(content).map_err(|e| format!("TOML parse error: {}", e))
}

/// Validate the cookbook header. Returns a list of errors (empty = valid).
pub fn validate_cookbook(book: &CookbookFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if book.version != "1.0" {
        errors.push(ValidationError {
            message: format!("version must be \"1.0\", got \"{}\"", book.version),
        });
    }

    if book.name.is_empty() {
        errors.push(ValidationError {
            message: "name must not be empty".to_string(),
        });
    }

    if book.settings.max_depth == 0 {
        errors.push(ValidationError {
            message: "settings.max_depth must be greater than 0".to_string(),
        });
    }

    errors
}

/// Register every entry into `registry`, in order. Rejected entries are
/// reported and skipped; accepted ones stay registered.
pub fn seed_registry(book: &CookbookFile, registry: &Registry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, entry) in book.entries.iter().enumerate() {
        if let Err(e) = registry.insert(entry) {
            errors.push(ValidationError {
                message: format!("entry #{} ('{}'): {}", index + 1, entry.name, e),
            });
        }
    }
    errors
}

/// Validate a cookbook and build a registry from it. All header and entry
/// errors are collected before failing.
pub fn build_registry(
    book: &CookbookFile,
) -> Result<(Registry, ResolveOptions), Vec<ValidationError>> {
    let mut errors = validate_cookbook(book);
    let registry = Registry::new();
    errors.extend(seed_registry(book, &registry));

    if errors.is_empty() {
        let options = ResolveOptions {
            max_depth: book.settings.max_depth,
        };
        Ok((registry, options))
    } else {
        Err(errors)
    }
}
