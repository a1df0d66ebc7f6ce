use crate::error::TypeError;

/// Earliest year a submission may reference.
pub const MIN_YEAR: i32 = 1900;

/// Latest year a submission may reference.
pub const MAX_YEAR: i32 = 2100;

/// Validate that a year falls inside the plausible submission range.
///
/// This is a sanity bound on stored data, not the report display range —
/// report year clamping lives in `fauna-reports`.
pub fn check_year(year: i32) -> Result<i32, TypeError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(TypeError::YearOutOfRange(year))
    }
}
