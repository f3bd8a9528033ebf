//! Calendar view state shared by the month endpoint and interactive clients.
//!
//! Holds the selected month and a snapshot of reservations. `precheck` runs
//! the same rules as the server against that snapshot; it is only an early
//! hint, the snapshot may be stale by the time the request is committed.

use crate::domain::calendar::{build_month, reservation_for_day, CalendarCell, MonthGrid};
use crate::domain::reservation::{check_candidate, Reservation, ReservationDraft, ValidReservation};
use crate::domain::DomainResult;

use super::reservation::sort_by_start;

/// One rendered grid cell with the reservation covering it.
#[derive(Debug, Clone, Copy)]
pub struct DayView<'a> {
    pub cell: &'a CalendarCell,
    pub reservation: Option<&'a Reservation>,
}

#[derive(Debug, Clone)]
pub struct CalendarView {
    grid: MonthGrid,
    reservations: Vec<Reservation>,
}

impl CalendarView {
    pub fn new(year: i32, month0: i32) -> DomainResult<Self> {
        Ok(Self {
            grid: build_month(year, month0)?,
            reservations: Vec::new(),
        })
    }

    pub fn with_reservations(mut self, reservations: Vec<Reservation>) -> Self {
        self.set_reservations(reservations);
        self
    }

    /// Replace the snapshot (e.g. after reloading from the server).
    pub fn set_reservations(&mut self, mut reservations: Vec<Reservation>) {
        sort_by_start(&mut reservations);
        self.reservations = reservations;
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn year(&self) -> i32 {
        self.grid.year
    }

    pub fn month0(&self) -> u32 {
        self.grid.month0
    }

    pub fn select(&mut self, year: i32, month0: i32) -> DomainResult<()> {
        self.grid = build_month(year, month0)?;
        Ok(())
    }

    pub fn next_month(&mut self) -> DomainResult<()> {
        self.select(self.grid.year, self.grid.month0 as i32 + 1)
    }

    pub fn previous_month(&mut self) -> DomainResult<()> {
        self.select(self.grid.year, self.grid.month0 as i32 - 1)
    }

    pub fn days(&self) -> Vec<DayView<'_>> {
        self.grid
            .cells()
            .iter()
            .map(|cell| DayView {
                cell,
                reservation: cell
                    .date()
                    .and_then(|date| reservation_for_day(date, &self.reservations)),
            })
            .collect()
    }

    /// Optimistic create/edit check against the local snapshot.
    pub fn precheck(
        &self,
        draft: &ReservationDraft,
        editing_id: Option<&str>,
    ) -> DomainResult<ValidReservation> {
        check_candidate(
            &draft.name,
            &draft.start_date,
            &draft.end_date,
            &self.reservations,
            editing_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    fn reservation(id: &str, name: &str, start: &str, end: &str) -> Reservation {
        let mut r = Reservation::new(ReservationDraft::new(name, start, end).validate().unwrap());
        r.id = id.to_string();
        r
    }

    fn march() -> CalendarView {
        CalendarView::new(2026, 2).unwrap().with_reservations(vec![
            reservation("c", "Carol", "2026-03-06", "2026-03-10"),
            reservation("a", "Alice", "2026-03-01", "2026-03-05"),
        ])
    }

    #[test]
    fn snapshot_is_sorted_by_start() {
        let view = march();
        let names: Vec<_> = view.reservations().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
    }

    #[test]
    fn days_carry_covering_reservation() {
        let view = march();
        let days = view.days();
        assert_eq!(days.len(), 42);

        let name_on = |date: &str| {
            days.iter()
                .find(|d| d.cell.date().map(|x| x.as_str()) == Some(date))
                .and_then(|d| d.reservation)
                .map(|r| r.name.clone())
        };
        assert_eq!(name_on("2026-03-05").as_deref(), Some("Alice"));
        assert_eq!(name_on("2026-03-06").as_deref(), Some("Carol"));
        assert_eq!(name_on("2026-03-11"), None);
        assert!(days.iter().filter(|d| d.cell.is_empty()).all(|d| d.reservation.is_none()));
    }

    #[test]
    fn navigation_wraps_years() {
        let mut view = CalendarView::new(2026, 11).unwrap();
        view.next_month().unwrap();
        assert_eq!((view.year(), view.month0()), (2027, 0));
        view.previous_month().unwrap();
        view.previous_month().unwrap();
        assert_eq!((view.year(), view.month0()), (2026, 10));
    }

    #[test]
    fn precheck_matches_server_rules() {
        let view = march();
        let bob = ReservationDraft::new("Bob", "2026-03-03", "2026-03-10");
        assert!(matches!(
            view.precheck(&bob, None),
            Err(DomainError::Conflict { ref name, .. }) if name == "Alice"
        ));

        let edit = ReservationDraft::new("Alice", "2026-03-01", "2026-03-02");
        assert!(view.precheck(&edit, Some("a")).is_ok());

        let blank = ReservationDraft::new("", "2026-04-01", "2026-04-02");
        assert_eq!(view.precheck(&blank, None), Err(DomainError::EmptyName));
    }
}
