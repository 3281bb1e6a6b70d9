//! Fixed-size month grids.
use chrono::{Days, NaiveDate, Weekday};

use crate::date::{CalendarDate, roll_month};

/// Number of columns in a month grid.
pub const DAYS_PER_WEEK: usize = 7;
/// Number of rows in a month grid.
pub const WEEKS_PER_MONTH: usize = 6;

/// A 6 × 7 grid of consecutive dates covering one month plus the leading
/// and trailing days of its neighbours.
///
/// The grid always has 42 cells so the rendered height never changes
/// between months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthMatrix {
    weeks: [[CalendarDate; DAYS_PER_WEEK]; WEEKS_PER_MONTH],
}

impl MonthMatrix {
    /// Returns the grid rows, each starting on the configured first weekday.
    pub fn weeks(&self) -> &[[CalendarDate; DAYS_PER_WEEK]; WEEKS_PER_MONTH] {
        &self.weeks
    }

    /// Iterates all 42 cells in display order.
    pub fn iter(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.weeks.iter().flatten().copied()
    }

    /// Returns the top-left cell.
    pub fn first(&self) -> CalendarDate {
        self.weeks[0][0]
    }

    /// Returns the bottom-right cell.
    pub fn last(&self) -> CalendarDate {
        self.weeks[WEEKS_PER_MONTH - 1][DAYS_PER_WEEK - 1]
    }

    /// Returns true when the date is rendered somewhere in the grid.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.first() <= date && date <= self.last()
    }
}

impl Default for MonthMatrix {
    /// The grid of January 1970 with weeks starting on Sunday.
    fn default() -> Self {
        // 1970-01-01 is a Thursday.
        let start = NaiveDate::default() - Days::new(4);
        let weeks = std::array::from_fn(|row| {
            std::array::from_fn(|column| {
                let index = (row * DAYS_PER_WEEK + column) as u64;
                CalendarDate::from_naive(start + Days::new(index))
            })
        });
        MonthMatrix { weeks }
    }
}

/// Zero-based column of `weekday` in a week that starts on `week_starts_on`.
pub fn weekday_position(weekday: Weekday, week_starts_on: Weekday) -> u32 {
    (weekday.num_days_from_sunday() + 7 - week_starts_on.num_days_from_sunday()) % 7
}

/// Maps a numeric week start (0 = Sunday … 6 = Saturday) to a weekday.
///
/// Values above 6 wrap around.
pub fn week_start_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// Builds the month grid for `month` (1-12) of `year`.
///
/// Months outside 1-12 roll into neighbouring years. Returns `None` only
/// when the grid would leave the representable date range.
pub fn generate_month_matrix(year: i32, month: u32, week_starts_on: Weekday) -> Option<MonthMatrix> {
    let (year, month) = roll_month(year, i64::from(month) - 1)?;
    let first_of_month = CalendarDate::new(year, month, 1)?;
    let offset = weekday_position(first_of_month.weekday(), week_starts_on);
    let mut cursor = first_of_month.shift_days(-i64::from(offset))?;

    let mut weeks = [[CalendarDate::default(); DAYS_PER_WEEK]; WEEKS_PER_MONTH];
    for (index, cell) in weeks.iter_mut().flatten().enumerate() {
        if index > 0 {
            cursor = cursor.shift_days(1)?;
        }
        *cell = cursor;
    }
    Some(MonthMatrix { weeks })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matrix_is_january_1970() {
        assert_eq!(
            Some(MonthMatrix::default()),
            generate_month_matrix(1970, 1, Weekday::Sun)
        );
    }

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid test date")
    }

    #[test]
    fn test_matrix_is_42_consecutive_days() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                for start in 0..7 {
                    let week_start = week_start_from_index(start);
                    let matrix = generate_month_matrix(year, month, week_start).expect("grid");
                    let cells: Vec<_> = matrix.iter().collect();
                    assert_eq!(cells.len(), 42);
                    for pair in cells.windows(2) {
                        assert_eq!(pair[0].shift_days(1), Some(pair[1]));
                    }
                    assert_eq!(matrix.first().weekday(), week_start);
                    assert!(matrix.contains(date(year, month, 1)));
                }
            }
        }
    }

    #[test]
    fn test_matrix_march_2024_monday_start() {
        let matrix = generate_month_matrix(2024, 3, Weekday::Mon).expect("grid");
        assert_eq!(matrix.first(), date(2024, 2, 26));
        assert_eq!(matrix.last(), date(2024, 4, 7));
        assert_eq!(matrix.weeks()[0][4], date(2024, 3, 1));
    }

    #[test]
    fn test_matrix_month_starting_on_week_start_has_no_leading_days() {
        // 2024-09-01 is a Sunday.
        let matrix = generate_month_matrix(2024, 9, Weekday::Sun).expect("grid");
        assert_eq!(matrix.first(), date(2024, 9, 1));
        assert_eq!(matrix.last(), date(2024, 10, 12));
    }

    #[test]
    fn test_matrix_rolls_month_overflow() {
        assert_eq!(
            generate_month_matrix(2024, 13, Weekday::Sun),
            generate_month_matrix(2025, 1, Weekday::Sun)
        );
        assert_eq!(
            generate_month_matrix(2024, 0, Weekday::Sun),
            generate_month_matrix(2023, 12, Weekday::Sun)
        );
    }

    #[test]
    fn test_weekday_position() {
        assert_eq!(weekday_position(Weekday::Sun, Weekday::Sun), 0);
        assert_eq!(weekday_position(Weekday::Sun, Weekday::Mon), 6);
        assert_eq!(weekday_position(Weekday::Wed, Weekday::Mon), 2);
        assert_eq!(weekday_position(Weekday::Fri, Weekday::Sat), 6);
        assert_eq!(week_start_from_index(8), Weekday::Mon);
    }
}
