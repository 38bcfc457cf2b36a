//! Release year extraction from loosely formatted dates

/// Extract the year from a "YYYY", "YYYY-MM" or "YYYY-MM-DD" date
///
/// Returns `None` for missing, empty, malformed or non-numeric input. The
/// segment before the first `-` must be exactly four ASCII digits.
pub fn extract_year(date: Option<&str>) -> Option<i32> {
    let date = date?;
    let head = date.split('-').next()?;

    if head.len() == 4 && head.bytes().all(|b| b.is_ascii_digit()) {
        head.parse().ok()
    } else {
        None
    }
}
