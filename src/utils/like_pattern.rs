//! Substring patterns for `ILIKE` filters.

/// Escape character used by every `ILIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Builds a `%term%` pattern that matches `term` literally.
///
/// `%`, `_` and the escape character itself are escaped so user input never
/// acts as a wildcard.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
