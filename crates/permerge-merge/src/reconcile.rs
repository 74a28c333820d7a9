//! Field-level reconciliation of two entries with the same identity.
//!
//! Booleans follow least-restrictive-wins: a permission enabled on either
//! side is enabled in the result. Any other conflict keeps the target value.

use permerge_types::FieldMap;

/// Returns `true` if `value` is `true` or `false`, ignoring case and
/// surrounding whitespace.
pub fn is_boolean_like(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Least-restrictive combination of two boolean-like values.
pub fn least_restrictive(a: &str, b: &str) -> &'static str {
    if is_true(a) || is_true(b) {
        "true"
    } else {
        "false"
    }
}

/// Merge the fields of a source entry into those of the matching target
/// entry.
///
/// The result starts as a copy of `target` (same order). Each source field
/// then is
/// - appended if the target lacks it,
/// - combined with [`least_restrictive`] if both values are boolean-like,
/// - ignored otherwise, leaving the target value in place.
///
/// No field of either input is dropped.
pub fn reconcile(target: &FieldMap, source: &FieldMap) -> FieldMap {
    let mut merged = target.clone();
    for (name, source_value) in source.iter() {
        let resolved = match merged.get(name) {
            None => Some(source_value.to_string()),
            Some(target_value)
                if is_boolean_like(target_value) && is_boolean_like(source_value) =>
            {
                Some(least_restrictive(target_value, source_value).to_string())
            }
            Some(_) => None,
        };
        if let Some(value) = resolved {
            merged.insert(name, value);
        }
    }
    merged
}
