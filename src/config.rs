//! Options that change how the dashboard summarises expenses.

use clap::ValueEnum;

/// Decides which expenses count towards the "This Month" summary card.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MonthScope {
    /// Any expense in the same calendar month as the reference date counts,
    /// whatever its year. January 2023 counts towards January 2024.
    #[default]
    MonthOfYear,
    /// Only expenses in the same month of the same year count.
    CalendarMonth,
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::MonthScope;

    #[test]
    fn default_ignores_year() {
        assert_eq!(MonthScope::default(), MonthScope::MonthOfYear);
    }

    #[test]
    fn parses_kebab_case_names() {
        assert_eq!(
            MonthScope::from_str("calendar-month", false),
            Ok(MonthScope::CalendarMonth)
        );
        assert_eq!(
            MonthScope::from_str("month-of-year", false),
            Ok(MonthScope::MonthOfYear)
        );
    }
}
