use serde::{Deserialize, Serialize};

/// A year of daily contribution counts for one user, ready for rendering.
///
/// Week and day ordering is preserved exactly as GitHub returns it:
/// weeks chronological, days Sunday-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionCalendar {
    pub total_contributions: u32,
    pub weeks: Vec<ContributionWeek>,
}

/// One column of the calendar grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionWeek {
    pub days: Vec<ContributionDay>,
}

/// A single day cell.
///
/// `level` is computed client-side from `count`; the GraphQL source only
/// provides raw counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionDay {
    /// ISO date, e.g. "2025-06-01".
    pub date: String,
    pub count: u32,
    /// 0 = Sunday .. 6 = Saturday, as reported by GitHub.
    pub weekday: u8,
    /// Intensity bucket 0-4.
    pub level: u8,
}
