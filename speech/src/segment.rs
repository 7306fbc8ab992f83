//! Cut sanitized text into speakable sentence units.

use regex::Regex;

/// Split `text` into ordered sentence units, keeping each unit's terminal
/// punctuation.
///
/// Whitespace runs are normalized before matching. Text without any
/// terminator is returned whole as a single unit; blank input yields
/// nothing. A trailing fragment with no terminator after the last matched
/// sentence is not spoken.
pub fn segment(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Vec::new();
    }

    let re = Regex::new(r"[^.!?]+[.!?]+").unwrap();
    let units: Vec<String> = re
        .find_iter(&normalized)
        .map(|m| m.as_str().trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    if units.is_empty() {
        return vec![normalized];
    }
    units
}
