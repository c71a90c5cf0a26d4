use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{Error, ErrorKind};

pub const COLUMNS: usize = 7;

/// A month rendered as whole calendar weeks, Monday-first.
///
/// Column `c` always holds weekday `c` (Monday = 0); rows cover the span from
/// the Monday on or before the 1st through the Sunday on or after the last day
/// of the month, so a grid has 4, 5 or 6 rows and nothing beyond what the
/// month needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    year: i32,
    month: u32,
    weeks: Vec<[NaiveDate; COLUMNS]>,
}

impl Grid {
    pub fn build(year: i32, month: u32) -> Result<Grid, Error> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                &format!("{}-{} is not a calendar month", year, month),
            )
        })?;
        let last = last_of_month(first).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                &format!("year {} is out of range", year),
            )
        })?;

        // Monday on or before the 1st is the top-left cell.
        let mut cursor = first - Duration::days(first.weekday().num_days_from_monday() as i64);

        let mut weeks = Vec::with_capacity(6);
        loop {
            let mut week = [cursor; COLUMNS];
            for slot in week.iter_mut() {
                *slot = cursor;
                cursor = cursor.succ_opt().ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidArgument,
                        &format!("year {} is out of range", year),
                    )
                })?;
            }
            let done = week[COLUMNS - 1] >= last;
            weeks.push(week);
            if done {
                break;
            }
        }

        Ok(Grid { year, month, weeks })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn rows(&self) -> usize {
        self.weeks.len()
    }

    pub fn week(&self, row: usize) -> &[NaiveDate; COLUMNS] {
        &self.weeks[row]
    }

    pub fn cell(&self, row: usize, col: usize) -> NaiveDate {
        self.weeks[row][col]
    }

    /// ISO week number of a row, taken from its Monday cell.
    pub fn week_number(&self, row: usize) -> u32 {
        self.weeks[row][0].iso_week().week()
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[NaiveDate; COLUMNS]> {
        self.weeks.iter()
    }
}

/// Cell classification used for anchoring and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Weekday,
    Saturday,
    Sunday,
    Overflow,
}

impl CellKind {
    /// Overflow dominates: a Saturday belonging to the adjacent month is
    /// `Overflow`, not `Saturday`.
    pub fn classify(date: NaiveDate, target_month: u32) -> CellKind {
        if date.month() != target_month {
            CellKind::Overflow
        } else {
            match date.weekday() {
                Weekday::Sat => CellKind::Saturday,
                Weekday::Sun => CellKind::Sunday,
                _ => CellKind::Weekday,
            }
        }
    }
}

fn last_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    next.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn february_2021_needs_four_rows() {
        let grid = Grid::build(2021, 2).unwrap();

        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cell(0, 0), date(2021, 2, 1));
        assert_eq!(grid.cell(3, 6), date(2021, 2, 28));

        // starts on Monday, ends on Sunday: no overflow at all
        assert!(grid
            .weeks()
            .flatten()
            .all(|d| CellKind::classify(*d, 2) != CellKind::Overflow));
    }

    #[test]
    fn january_2024_needs_five_rows() {
        let grid = Grid::build(2024, 1).unwrap();

        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.cell(0, 0), date(2024, 1, 1));
        // the fifth week is completed by four February days
        let trailing: Vec<_> = grid
            .week(4)
            .iter()
            .filter(|d| d.month() == 2)
            .cloned()
            .collect();
        assert_eq!(
            trailing,
            vec![date(2024, 2, 1), date(2024, 2, 2), date(2024, 2, 3), date(2024, 2, 4)]
        );
    }

    #[test]
    fn august_2021_needs_six_rows() {
        let grid = Grid::build(2021, 8).unwrap();

        assert_eq!(grid.rows(), 6);
        // six leading days from July, five trailing from September
        let leading = grid.week(0).iter().filter(|d| d.month() == 7).count();
        let trailing = grid.week(5).iter().filter(|d| d.month() == 9).count();
        assert_eq!(leading, 6);
        assert_eq!(trailing, 5);
        assert_eq!(grid.cell(0, 6), date(2021, 8, 1));
    }

    #[test]
    fn rows_are_contiguous_and_cover_the_month() {
        for &(year, month) in &[(2021, 2), (2021, 8), (2024, 1), (2023, 6), (2020, 12)] {
            let grid = Grid::build(year, month).unwrap();

            assert!((4..=6).contains(&grid.rows()));
            assert_eq!(grid.cell(0, 0).weekday(), Weekday::Mon);
            assert_eq!(grid.cell(grid.rows() - 1, 6).weekday(), Weekday::Sun);

            // chronologically contiguous across row boundaries
            let cells: Vec<NaiveDate> = grid.weeks().flatten().cloned().collect();
            for pair in cells.windows(2) {
                assert_eq!(pair[0].succ_opt().unwrap(), pair[1]);
            }

            // every day of the month appears exactly once
            let last = last_of_month(date(year, month, 1)).unwrap();
            for day in 1..=last.day() {
                assert_eq!(
                    cells.iter().filter(|d| **d == date(year, month, day)).count(),
                    1
                );
            }

            // minimal covering rectangle: day 1 sits in the first row, the
            // last day in the last row
            assert!(grid.week(0).contains(&date(year, month, 1)));
            assert!(grid.week(grid.rows() - 1).contains(&last));
        }
    }

    #[test]
    fn building_twice_yields_the_same_grid() {
        assert_eq!(Grid::build(2022, 3).unwrap(), Grid::build(2022, 3).unwrap());
    }

    #[test]
    fn invalid_months_are_rejected() {
        assert!(Grid::build(2021, 0).is_err());
        assert!(Grid::build(2021, 13).is_err());
    }

    #[test]
    fn classification_follows_weekday_within_the_month() {
        // August 1st 2021 is an in-month Sunday
        assert_eq!(CellKind::classify(date(2021, 8, 1), 8), CellKind::Sunday);
        // July 31st 2021 is a Saturday, but it overflows into August's grid
        assert_eq!(CellKind::classify(date(2021, 7, 31), 8), CellKind::Overflow);
        assert_eq!(CellKind::classify(date(2021, 8, 7), 8), CellKind::Saturday);
        assert_eq!(CellKind::classify(date(2021, 8, 4), 8), CellKind::Weekday);
    }

    #[test]
    fn every_cell_gets_exactly_one_kind() {
        let grid = Grid::build(2021, 8).unwrap();
        for day in grid.weeks().flatten() {
            let kind = CellKind::classify(*day, 8);
            if day.month() != 8 {
                assert_eq!(kind, CellKind::Overflow);
            } else {
                assert_ne!(kind, CellKind::Overflow);
            }
        }
    }

    #[test]
    fn iso_week_numbers_come_from_the_monday_cell() {
        let grid = Grid::build(2024, 1).unwrap();
        let weeks: Vec<u32> = (0..grid.rows()).map(|r| grid.week_number(r)).collect();
        assert_eq!(weeks, vec![1, 2, 3, 4, 5]);

        let grid = Grid::build(2021, 8).unwrap();
        assert_eq!(grid.week_number(0), 30);
    }
}
