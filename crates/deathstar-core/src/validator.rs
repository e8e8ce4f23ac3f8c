//! Required-property validation for untyped mappings.

use serde_json::{Map, Value};

/// Untyped key/value mapping decoded from a JSON object body.
///
/// Key order follows the order of the original document.
pub type RawMapping = Map<String, Value>;

/// Check that `data` contains every key in `required`.
///
/// Returns `None` when validation passes, otherwise a message listing the
/// missing keys in the order they were declared. Duplicate entries in
/// `required` are reported once per occurrence.
///
/// # Examples
///
/// ```
/// use deathstar_core::{validate_properties, RawMapping};
///
/// let mut data = RawMapping::new();
/// data.insert("cell".into(), "2187".into());
///
/// assert_eq!(
///     validate_properties(&["name", "cell"], &data).as_deref(),
///     Some("Missing value for name")
/// );
/// ```
#[must_use]
pub fn validate_properties(required: &[&str], data: &RawMapping) -> Option<String> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|key| !data.contains_key(*key))
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(format!("Missing value for {}", missing.join(", ")))
    }
}
