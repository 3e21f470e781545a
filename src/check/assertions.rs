use crate::error::{HarnessError, Result};

/// Absolute tolerance used when comparing simulated quantities.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Returns `true` when `actual` is within `tolerance` of `expected`.
///
/// # Examples
///
/// ```
/// use antares_nr::check::assertions::is_close;
///
/// assert!(is_close(1000.0, 1000.0009, 0.001));
/// assert!(!is_close(1000.0, 1000.002, 0.001));
/// ```
pub fn is_close(expected: f64, actual: f64, tolerance: f64) -> bool {
    (expected - actual).abs() <= tolerance
}

/// Fails `check` when `actual` is not within `tolerance` of `expected`.
///
/// # Errors
///
/// Returns [`HarnessError::CheckFailed`] describing the mismatch.
pub fn assert_double_close(
    check: &str,
    what: &str,
    expected: f64,
    actual: f64,
    tolerance: f64,
) -> Result<()> {
    if is_close(expected, actual, tolerance) {
        return Ok(());
    }
    Err(HarnessError::check_failed(
        check,
        format!("{what}: expected {expected} (+/- {tolerance}), got {actual}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_inclusive() {
        assert!(is_close(1.0, 1.0 + 0.0005, DEFAULT_TOLERANCE));
        assert!(is_close(-5.0, -5.0, 0.0));
    }

    #[test]
    fn mismatch_names_the_quantity() {
        let err = assert_double_close("annual-cost", "EXP", 10.0, 10.5, DEFAULT_TOLERANCE)
            .expect_err("0.5 is outside tolerance");
        assert!(err.is_check_failure());
        let msg = err.to_string();
        assert!(msg.contains("annual-cost"));
        assert!(msg.contains("EXP"));
        assert!(msg.contains("10.5"));
    }
}
