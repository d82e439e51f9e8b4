//! Split-name encoding and the retained-split resolver.
//!
//! Split names travel between pipeline stages as a JSON-encoded list on the
//! artifact descriptor rather than as payload data; the encoding here is the
//! same one the upstream statistics generator uses, so descriptors round-trip
//! verbatim.

use crate::error::{Result, ValidatorError};
use tracing::debug;

/// Encodes an ordered split-name list into its descriptor form.
pub fn encode_split_names<S: AsRef<str>>(splits: &[S]) -> String {
    let names: Vec<&str> = splits.iter().map(AsRef::as_ref).collect();
    // Vec<&str> -> JSON array cannot fail.
    serde_json::to_string(&names).expect("split name list is always serializable")
}

/// Decodes a descriptor's split-name list, preserving order.
///
/// # Errors
///
/// Returns [`ValidatorError::Config`] when the encoded list is malformed.
pub fn decode_split_names(encoded: &str) -> Result<Vec<String>> {
    serde_json::from_str(encoded)
        .map_err(|e| ValidatorError::config(format!("invalid encoded split names {encoded:?}: {e}")))
}

/// Computes the ordered list of retained splits: bundle splits minus the
/// excluded set, preserving the bundle's original ordering.
///
/// Excluding a split that does not exist in the bundle is a configuration
/// error rather than a no-op: a typo in the exclusion list would otherwise
/// silently leave an unintended split in the retained set.
///
/// # Errors
///
/// Returns [`ValidatorError::Config`] when an excluded name is not present in
/// `bundle_splits`.
pub fn resolve_splits<S, E>(bundle_splits: &[S], excluded: &[E]) -> Result<Vec<String>>
where
    S: AsRef<str>,
    E: AsRef<str>,
{
    for excluded_name in excluded {
        let excluded_name = excluded_name.as_ref();
        if !bundle_splits.iter().any(|s| s.as_ref() == excluded_name) {
            return Err(ValidatorError::config(format!(
                "excluded split '{excluded_name}' does not exist in the statistics bundle"
            )));
        }
    }

    let retained: Vec<String> = bundle_splits
        .iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| !excluded.iter().any(|e| e.as_ref() == s))
        .collect();

    debug!(
        splits.bundle = bundle_splits.len(),
        splits.excluded = excluded.len(),
        splits.retained = retained.len(),
        "Resolved retained splits"
    );
    Ok(retained)
}
