//! Validation and overlap rules shared by the server commit path and the
//! client-side pre-check.
//!
//! Ranges are inclusive on both ends. A day that is one reservation's end and
//! another's start (turnover day) counts as an overlap: there is no same-day
//! handover.

use super::model::{IsoDate, Reservation, ValidReservation};
use crate::domain::{DomainError, DomainResult};

/// `[a_start, a_end]` and `[b_start, b_end]` share at least one day.
pub fn overlaps<T>(a_start: &T, a_end: &T, b_start: &T, b_end: &T) -> bool
where
    T: PartialOrd + ?Sized,
{
    !(a_end < b_start || a_start > b_end)
}

/// Check the raw fields of a create/edit request.
///
/// Reports the first failure in this order: empty name, malformed start or
/// end date, end before start.
pub fn validate(name: &str, start_date: &str, end_date: &str) -> DomainResult<ValidReservation> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::EmptyName);
    }

    let start_date = IsoDate::parse(start_date)?;
    let end_date = IsoDate::parse(end_date)?;

    if end_date < start_date {
        return Err(DomainError::InvertedRange {
            start: start_date.into(),
            end: end_date.into(),
        });
    }

    Ok(ValidReservation {
        name: name.to_string(),
        start_date,
        end_date,
    })
}

/// First reservation overlapping `[start, end]`, skipping `exclude_id`.
pub fn find_conflict<'a, I>(
    start: &IsoDate,
    end: &IsoDate,
    existing: I,
    exclude_id: Option<&str>,
) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    existing
        .into_iter()
        .filter(|r| exclude_id != Some(r.id.as_str()))
        .find(|r| overlaps(start, end, &r.start_date, &r.end_date))
}

impl ValidReservation {
    /// Fail with [`DomainError::Conflict`] naming the colliding reservation.
    pub fn ensure_free<'a, I>(&self, existing: I, exclude_id: Option<&str>) -> DomainResult<()>
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        match find_conflict(&self.start_date, &self.end_date, existing, exclude_id) {
            Some(other) => Err(conflict_with(other)),
            None => Ok(()),
        }
    }
}

pub fn conflict_with(other: &Reservation) -> DomainError {
    DomainError::Conflict {
        name: other.name.clone(),
        start: other.start_date.to_string(),
        end: other.end_date.to_string(),
    }
}

/// Full create/update protocol against a snapshot: validate the fields, then
/// look for a conflict among every reservation other than `exclude_id`.
pub fn check_candidate(
    name: &str,
    start_date: &str,
    end_date: &str,
    existing: &[Reservation],
    exclude_id: Option<&str>,
) -> DomainResult<ValidReservation> {
    let candidate = validate(name, start_date, end_date)?;
    candidate.ensure_free(existing, exclude_id)?;
    Ok(candidate)
}
