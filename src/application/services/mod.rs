//! Application services

mod calendar;
mod reservation;

pub use calendar::{CalendarView, DayView};
pub use reservation::{sort_by_start, ReservationService};
