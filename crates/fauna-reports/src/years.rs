use chrono::{Datelike, Utc};

/// First year the deployment tracks populations for.
pub const FIRST_TRACKED_YEAR: i32 = 2023;

/// Valid year range for report queries: the first tracked year through the
/// current calendar year. Out-of-range requests are clamped for display,
/// never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportYears {
    first: i32,
}

impl ReportYears {
    pub fn new(first: i32) -> Self {
        Self { first }
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    /// The current calendar year (never below `first`).
    pub fn last(&self) -> i32 {
        Utc::now().year().max(self.first)
    }

    /// Clamp a requested year into `[first, last]`.
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.first, self.last())
    }

    /// Selectable report years, newest first.
    pub fn options(&self) -> Vec<i32> {
        (self.first..=self.last()).rev().collect()
    }
}

impl Default for ReportYears {
    fn default() -> Self {
        Self::new(FIRST_TRACKED_YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_both_bounds() {
        let years = ReportYears::default();
        assert_eq!(years.clamp(1990), FIRST_TRACKED_YEAR);
        assert_eq!(years.clamp(9999), years.last());
    }

    #[test]
    fn in_range_years_pass_through() {
        let years = ReportYears::default();
        assert_eq!(years.clamp(FIRST_TRACKED_YEAR), FIRST_TRACKED_YEAR);
        assert_eq!(years.clamp(years.last()), years.last());
    }

    #[test]
    fn options_are_newest_first() {
        let years = ReportYears::default();
        let options = years.options();
        assert_eq!(options.first(), Some(&years.last()));
        assert_eq!(options.last(), Some(&FIRST_TRACKED_YEAR));
        assert!(options.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn first_year_in_the_future_still_yields_one_option() {
        let years = ReportYears::new(9999);
        assert_eq!(years.last(), 9999);
        assert_eq!(years.options(), vec![9999]);
    }
}
