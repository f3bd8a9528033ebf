pub mod services;

pub use services::{CalendarView, DayView, ReservationService};
