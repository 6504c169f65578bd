//! Conversion analytics derived from a form's counters.

/// Rate reported when a form has neither views nor interactions yet.
pub const EMPTY_CONVERSION_RATE: &str = "0%";

/// Compute the conversion rate as submissions over views plus interactions.
///
/// Returns [`EMPTY_CONVERSION_RATE`] when the denominator is zero, otherwise
/// the percentage with exactly two decimals and a `%` suffix.
///
/// # Examples
///
/// ```
/// use leadform_core::analytics::conversion_rate;
///
/// assert_eq!(conversion_rate(0, 0, 0), "0%");
/// assert_eq!(conversion_rate(10, 0, 5), "50.00%");
/// assert_eq!(conversion_rate(6, 2, 1), "12.50%");
/// ```
pub fn conversion_rate(viewed: i64, interacted: i64, submitted: i64) -> String {
    let total = viewed + interacted;
    if total == 0 {
        return EMPTY_CONVERSION_RATE.to_string();
    }
    let rate = (submitted as f64 / total as f64) * 100.0;
    // Ties round away from zero; `{:.2}` alone would round them to even.
    let rate = (rate * 100.0).round() / 100.0;
    format!("{rate:.2}%")
}
