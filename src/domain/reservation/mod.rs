//! Reservation aggregate
//!
//! Contains the Reservation entity, the overlap/validation rules, and the
//! repository interface.

pub mod model;
pub mod repository;
pub mod rules;

pub use model::{IsoDate, Reservation, ReservationDraft, ValidReservation};
pub use repository::ReservationRepository;
pub use rules::{check_candidate, find_conflict, overlaps, validate};
