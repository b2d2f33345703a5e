//! URL slug normalization.

use lazy_static::lazy_static;
use regex::Regex;

/// Longest slug kept after normalization.
pub const MAX_SLUG_LEN: usize = 120;

lazy_static! {
    static ref NON_ALPHANUMERIC_RUN: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Normalizes free text into a slug.
///
/// Lowercases, replaces every run of characters outside `[a-z0-9]` with a
/// single `-`, strips leading and trailing dashes and truncates to
/// [`MAX_SLUG_LEN`]. Falls back to `fallback` when nothing is left.
pub fn normalize_slug(value: &str, fallback: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let dashed = NON_ALPHANUMERIC_RUN.replace_all(&lowered, "-");
    let trimmed = dashed.trim_matches('-');
    // Output is ASCII only, so byte truncation is safe.
    let truncated = &trimmed[..trimmed.len().min(MAX_SLUG_LEN)];

    if truncated.is_empty() {
        fallback.to_string()
    } else {
        truncated.to_string()
    }
}

/// The n-th candidate when resolving collisions: `base`, `base-1`, `base-2`, ...
pub fn candidate_slug(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}
