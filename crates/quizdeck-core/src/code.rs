//! Question code normalization.
//!
//! Question files and answer files do not always agree on zero padding
//! (`회계_12_08번` vs `회계_12_8번`), so both sides are normalized before they
//! are joined.

/// Marker glyph that ends an ordinal code suffix (`_<digits>번`).
pub const ORDINAL_SUFFIX: char = '번';

/// Produce the canonical join key for a raw code.
///
/// Trims surrounding whitespace, then rewrites a trailing `_<digits>번` with the
/// leading zeros of the digits removed. Anything else passes through.
pub fn normalize_code(code: &str) -> String {
    let s = code.trim();

    let Some(stem) = s.strip_suffix(ORDINAL_SUFFIX) else {
        return s.to_string();
    };
    let digits_at = stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (head, digits) = stem.split_at(digits_at);
    if digits.is_empty() {
        return s.to_string();
    }
    let Some(prefix) = head.strip_suffix('_') else {
        return s.to_string();
    };

    let unpadded = digits.trim_start_matches('0');
    let number = if unpadded.is_empty() { "0" } else { unpadded };
    format!("{prefix}_{number}{ORDINAL_SUFFIX}")
}
