//! Month grid arithmetic for the calendar view.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::warn;

use crate::domain::reservation::{IsoDate, Reservation};
use crate::domain::{DomainError, DomainResult};

/// 6 weeks × 7 days
pub const GRID_CELLS: usize = 42;
pub const DAYS_PER_WEEK: usize = 7;

pub const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// Display name of a zero-based month.
pub fn month_label(month0: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month0 as usize).copied()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    /// Padding before the 1st or after the last day
    Empty,
    Day { date: IsoDate, day: u32 },
}

impl CalendarCell {
    pub fn date(&self) -> Option<&IsoDate> {
        match self {
            Self::Day { date, .. } => Some(date),
            Self::Empty => None,
        }
    }

    /// Day number as text, `None` for padding cells.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::Day { day, .. } => Some(day.to_string()),
            Self::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A fully laid out month, Monday-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    /// Zero-based (0 = January)
    pub month0: u32,
    /// Grid position of the 1st, Monday = 0 .. Sunday = 6
    pub offset: u32,
    pub days_in_month: u32,
    cells: Vec<CalendarCell>,
}

impl MonthGrid {
    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn days(&self) -> impl Iterator<Item = &IsoDate> {
        self.cells.iter().filter_map(CalendarCell::date)
    }

    pub fn label(&self) -> &'static str {
        MONTH_NAMES[self.month0 as usize]
    }
}

/// Lay out `month0` of `year` on a 42-cell grid.
///
/// Months outside `0..=11` roll into neighbouring years (12 is January of
/// the next year, -1 is December of the previous one).
pub fn build_month(year: i32, month0: i32) -> DomainResult<MonthGrid> {
    let (year, month0) = normalize(year, month0)?;

    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .ok_or_else(|| out_of_range(year, month0))?;
    let offset = first.weekday().num_days_from_monday();
    let days_in_month = days_in_month(year, month0)?;

    let cells = (0..GRID_CELLS as i64)
        .map(|i| {
            let day = i - offset as i64 + 1;
            if day < 1 || day > days_in_month as i64 {
                Ok(CalendarCell::Empty)
            } else {
                let day = day as u32;
                IsoDate::from_ymd(year, month0 + 1, day).map(|date| CalendarCell::Day { date, day })
            }
        })
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(MonthGrid {
        year,
        month0,
        offset,
        days_in_month,
        cells,
    })
}

/// Number of days in zero-based `month0`: the day before the 1st of the next month.
pub fn days_in_month(year: i32, month0: u32) -> DomainResult<u32> {
    let (next_year, next_month) = if month0 >= 11 {
        (year + 1, 1)
    } else {
        (year, month0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .ok_or_else(|| out_of_range(year, month0))
}

/// The reservation covering `day`, if any.
///
/// Stored reservations never overlap, so at most one should match. If several
/// do, the one with the earliest `start_date` wins (first seen among equals)
/// and the anomaly is logged instead of failing the render.
pub fn reservation_for_day<'a>(day: &IsoDate, reservations: &'a [Reservation]) -> Option<&'a Reservation> {
    let mut matches = reservations.iter().filter(|r| r.contains(day));
    let mut chosen = matches.next()?;
    let mut count = 1usize;

    for r in matches {
        count += 1;
        if r.start_date < chosen.start_date {
            chosen = r;
        }
    }

    if count > 1 {
        warn!(
            day = %day,
            matches = count,
            chosen = %chosen.id,
            "Overlapping reservations cover the same day"
        );
    }

    Some(chosen)
}

fn normalize(year: i32, month0: i32) -> DomainResult<(i32, u32)> {
    let total = year as i64 * 12 + month0 as i64;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    if !(0..=9999).contains(&year) {
        return Err(DomainError::OutOfRange(format!(
            "year {} is outside 0000..=9999",
            year
        )));
    }
    Ok((year as i32, month0))
}

fn out_of_range(year: i32, month0: u32) -> DomainError {
    DomainError::OutOfRange(format!("no calendar for {}-{:02}", year, month0 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::ReservationDraft;

    fn reservation(id: &str, name: &str, start: &str, end: &str) -> Reservation {
        let mut r = Reservation::new(ReservationDraft::new(name, start, end).validate().unwrap());
        r.id = id.to_string();
        r
    }

    fn first_day_index(grid: &MonthGrid) -> usize {
        grid.cells().iter().position(|c| !c.is_empty()).unwrap()
    }

    #[test]
    fn february_2026_has_28_days_starting_sunday() {
        let grid = build_month(2026, 1).unwrap();
        assert_eq!(grid.cells().len(), GRID_CELLS);
        assert_eq!(grid.days().count(), 28);
        // 2026-02-01 is a Sunday
        assert_eq!(first_day_index(&grid), 6);
        assert_eq!(grid.offset, 6);
        assert_eq!(grid.cells()[6].date().unwrap().as_str(), "2026-02-01");
        assert_eq!(grid.cells()[6].label().as_deref(), Some("1"));
        assert_eq!(grid.days().last().unwrap().as_str(), "2026-02-28");
    }

    #[test]
    fn february_2028_is_a_leap_month() {
        let grid = build_month(2028, 1).unwrap();
        assert_eq!(grid.cells().len(), GRID_CELLS);
        assert_eq!(grid.days().count(), 29);
        // 2028-02-01 is a Tuesday
        assert_eq!(first_day_index(&grid), 1);
        assert_eq!(grid.days().last().unwrap().as_str(), "2028-02-29");
    }

    #[test]
    fn century_rules_apply() {
        assert_eq!(days_in_month(1900, 1).unwrap(), 28);
        assert_eq!(days_in_month(2000, 1).unwrap(), 29);
        assert_eq!(days_in_month(2026, 11).unwrap(), 31);
        assert_eq!(days_in_month(2026, 3).unwrap(), 30);
    }

    #[test]
    fn month_starting_monday_has_no_leading_padding() {
        // 2026-06-01 is a Monday
        let grid = build_month(2026, 5).unwrap();
        assert_eq!(grid.offset, 0);
        assert_eq!(grid.cells()[0].date().unwrap().as_str(), "2026-06-01");
        assert_eq!(grid.days().count(), 30);
        assert!(grid.cells()[30..].iter().all(CalendarCell::is_empty));
    }

    #[test]
    fn grid_has_six_rows_of_seven() {
        let grid = build_month(2026, 2).unwrap();
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.len() == DAYS_PER_WEEK));
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(build_month(2026, 9).unwrap(), build_month(2026, 9).unwrap());
    }

    #[test]
    fn month_overflow_rolls_into_next_year() {
        let grid = build_month(2026, 12).unwrap();
        assert_eq!((grid.year, grid.month0), (2027, 0));
        let grid = build_month(2026, -1).unwrap();
        assert_eq!((grid.year, grid.month0), (2025, 11));
        assert_eq!(grid.label(), "Décembre");
    }

    #[test]
    fn years_without_four_digits_are_rejected() {
        assert!(matches!(build_month(10_000, 0), Err(DomainError::OutOfRange(_))));
        assert!(matches!(build_month(0, -1), Err(DomainError::OutOfRange(_))));
    }

    #[test]
    fn month_labels_are_french() {
        assert_eq!(month_label(0), Some("Janvier"));
        assert_eq!(month_label(7), Some("Août"));
        assert_eq!(month_label(12), None);
    }

    #[test]
    fn reservation_for_day_is_inclusive() {
        let rs = vec![
            reservation("1", "Alice", "2026-03-01", "2026-03-05"),
            reservation("2", "Carol", "2026-03-06", "2026-03-10"),
        ];
        let day = |s| IsoDate::parse(s).unwrap();
        assert_eq!(reservation_for_day(&day("2026-03-05"), &rs).unwrap().name, "Alice");
        assert_eq!(reservation_for_day(&day("2026-03-06"), &rs).unwrap().name, "Carol");
        assert!(reservation_for_day(&day("2026-03-11"), &rs).is_none());
    }

    #[test]
    fn reservation_for_day_picks_earliest_start_on_overlap() {
        let rs = vec![
            reservation("late", "Bob", "2026-03-03", "2026-03-10"),
            reservation("early", "Alice", "2026-03-01", "2026-03-05"),
            reservation("tie", "Dup", "2026-03-01", "2026-03-04"),
        ];
        let day = IsoDate::parse("2026-03-04").unwrap();
        assert_eq!(reservation_for_day(&day, &rs).unwrap().id, "early");
    }
}
