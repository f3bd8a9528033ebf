//! Domain layer: pure booking rules and calendar arithmetic.
//!
//! Nothing here performs I/O; persistence is reached only through
//! [`ReservationRepository`].

pub mod calendar;
pub mod reservation;

pub use calendar::{build_month, reservation_for_day, CalendarCell, MonthGrid};
pub use reservation::{
    IsoDate, Reservation, ReservationDraft, ReservationRepository, ValidReservation,
};

pub use crate::shared::errors::{DomainError, DomainResult, ErrorKind};
