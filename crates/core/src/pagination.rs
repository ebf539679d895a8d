//! Pagination and search-limit helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository and service layers. Clamping is applied by the
//! service layer; repositories execute whatever window they are handed.

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Default number of rows per list page.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum number of rows per list page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;

/// Maximum number of search results.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Resolve a requested limit against `[1, max]`.
///
/// Out-of-range or unspecified values fall back to `default` rather than
/// being silently clamped to the nearest bound.
pub fn clamp_limit(requested: Option<i64>, default: i64, max: i64) -> i64 {
    match requested {
        Some(v) if (1..=max).contains(&v) => v,
        _ => default,
    }
}

// ---------------------------------------------------------------------------
// Page window
// ---------------------------------------------------------------------------

/// A resolved, 1-indexed pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl Page {
    /// Resolve raw request values. Pages below 1 become page 1; the page
    /// size goes through [`clamp_limit`].
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p >= 1).unwrap_or(1),
            page_size: clamp_limit(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

// ---------------------------------------------------------------------------
// LIKE pattern escaping
// ---------------------------------------------------------------------------

/// Escape `%`, `_`, and `\` so user input matches literally inside an
/// ILIKE pattern.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
