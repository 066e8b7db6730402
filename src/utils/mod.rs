//! Small shared helpers.

use scraper::Selector;

/// Parses a CSS selector, falling back to a match-nothing selector if the
/// source is invalid. Selector strings in this crate are compile-time
/// literals, so the fallback only fires on a programming error; degrading to
/// an empty match keeps analysis running instead of panicking.
pub(crate) fn parse_selector(source: &str) -> Selector {
    Selector::parse(source).unwrap_or_else(|e| {
        log::error!("Failed to parse selector '{source}': {e}");
        Selector::parse("*:not(*)").unwrap_or_else(|_| unreachable!("fallback selector is valid"))
    })
}

/// Parses a leading integer out of an HTML dimension attribute.
///
/// Accepts plain numbers and values with trailing units (`"1400px"` -> 1400).
/// Returns `None` for missing, empty, or non-numeric values, matching how
/// unparseable dimensions are treated as unknown.
pub(crate) fn parse_dimension(attr: &str) -> Option<u32> {
    let digits: String = attr.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Rounds to two decimal places.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Rounds to one decimal place.
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
