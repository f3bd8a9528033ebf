//! Reservation domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Calendar date written as `YYYY-MM-DD`.
///
/// Only the shape is checked (four digits, dash, two digits, dash, two
/// digits); `2026-02-31` is accepted. Fixed width makes the lexical order of
/// the string identical to chronological order, so `Ord` compares strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoDate(String);

impl IsoDate {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        if Self::has_iso_shape(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::MalformedDate(raw.to_string()))
        }
    }

    /// Build from numeric parts. Fails when the year needs more than four digits.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> DomainResult<Self> {
        if !(0..=9999).contains(&year) {
            return Err(DomainError::OutOfRange(format!(
                "year {} cannot be written as YYYY",
                year
            )));
        }
        Self::parse(&format!("{:04}-{:02}-{:02}", year, month, day))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn has_iso_shape(raw: &str) -> bool {
        let bytes = raw.as_bytes();
        bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            })
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for IsoDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for IsoDate {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IsoDate> for String {
    fn from(date: IsoDate) -> Self {
        date.0
    }
}

impl AsRef<str> for IsoDate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A booking of the shared calendar for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Opaque identifier assigned by the store
    pub id: String,
    /// Holder name (trimmed, non-empty)
    pub name: String,
    pub start_date: IsoDate,
    /// Inclusive
    pub end_date: IsoDate,
    /// Assigned by the store on insert
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Materialize an accepted candidate with a fresh identifier.
    pub fn new(candidate: ValidReservation) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: candidate.name,
            start_date: candidate.start_date,
            end_date: candidate.end_date,
            created_at: Utc::now(),
        }
    }

    /// Apply an accepted edit, keeping identity and creation time.
    pub fn apply(&mut self, candidate: ValidReservation) {
        self.name = candidate.name;
        self.start_date = candidate.start_date;
        self.end_date = candidate.end_date;
    }

    pub fn contains(&self, day: &IsoDate) -> bool {
        self.start_date <= *day && *day <= self.end_date
    }
}

/// Raw create/edit input, exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDraft {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

impl ReservationDraft {
    pub fn new(
        name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<ValidReservation> {
        super::rules::validate(&self.name, &self.start_date, &self.end_date)
    }
}

/// Well-formed candidate: trimmed non-empty name and `start_date <= end_date`.
///
/// Can only be obtained through [`rules::validate`](super::rules::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReservation {
    pub(crate) name: String,
    pub(crate) start_date: IsoDate,
    pub(crate) end_date: IsoDate,
}

impl ValidReservation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_date(&self) -> &IsoDate {
        &self.start_date
    }

    pub fn end_date(&self) -> &IsoDate {
        &self.end_date
    }
}
