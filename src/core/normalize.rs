//! CB-001: Name normalization — turn handwritten entry names into display names.
//!
//! Separators (`-`, `_`) become spaces, anything that is not an ASCII letter
//! or whitespace is dropped, whitespace is collapsed, and every word is
//! title-cased. `"alpHa-alFRedo"` becomes `"Alpha Alfredo"`.

use super::error::CookbookError;
use regex::Regex;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_]").unwrap());
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize free text into a canonical display name.
///
/// Fails with [`CookbookError::InvalidName`] when nothing usable remains.
pub fn normalize(text: &str) -> Result<String, CookbookError> {
    let spaced = SEPARATORS.replace_all(text, " ");
    let letters = DISALLOWED.replace_all(&spaced, "");
    let collapsed = WHITESPACE.replace_all(&letters, " ");
    let trimmed = collapsed.trim();

    if trimmed.is_empty() {
        return Err(CookbookError::InvalidName(text.to_string()));
    }

    Ok(trimmed
        .split(' ')
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" "))
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
        None => String::new(),
    }
}
