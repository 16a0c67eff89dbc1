//! Cast/writer split validation.

use crate::error::SplitError;

/// Check that the cast and writer lists can be paired positionally.
///
/// Rules, first failure wins:
///
/// - both lists must be non-empty (`cast` is checked first), else [`SplitError::MissingField`]
/// - both lists must have the same length, else [`SplitError::CountMismatch`]
///
/// Entry contents are not inspected.
pub fn validate_split(cast_names: &[String], writer_names: &[String]) -> Result<(), SplitError> {
    if cast_names.is_empty() {
        return Err(SplitError::MissingField { field: "cast" });
    }
    if writer_names.is_empty() {
        return Err(SplitError::MissingField { field: "writer" });
    }
    if cast_names.len() != writer_names.len() {
        return Err(SplitError::CountMismatch {
            cast: cast_names.len(),
            writers: writer_names.len(),
        });
    }
    Ok(())
}
