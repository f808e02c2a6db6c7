//! Scanned-code normalization.
//!
//! Scanner payloads arrive with stray whitespace (hand-typed codes, CR/LF
//! suffixes from keyboard-wedge scanners) and inconsistent casing. Numbering
//! schemes are case-insensitive, so lookups run against the normalized form.

/// Trims, strips all interior whitespace, and uppercases a scanned code.
///
/// Returns `None` when nothing scannable remains.
pub fn normalize_code(raw: &str) -> Option<String> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
