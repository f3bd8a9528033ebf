//! Reservation DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::reservation::{Reservation, ReservationDraft};

/// Create or edit a reservation.
///
/// Missing or `null` fields are read as empty strings and then rejected by
/// the booking rules with a specific message.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ReservationRequest {
    /// Holder name, trimmed before storage
    #[serde(default)]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    #[serde(default)]
    pub end_date: Option<String>,
    /// On edit, must match the id in the path when present
    #[serde(default)]
    pub id: Option<String>,
}

impl ReservationRequest {
    pub fn into_draft(self) -> ReservationDraft {
        ReservationDraft::new(
            self.name.unwrap_or_default(),
            self.start_date.unwrap_or_default(),
            self.end_date.unwrap_or_default(),
        )
    }
}

/// Reservation details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    /// RFC 3339
    pub created_at: String,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            name: r.name,
            start_date: r.start_date.into(),
            end_date: r.end_date.into(),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}
