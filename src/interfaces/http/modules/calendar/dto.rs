//! Calendar month DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::services::DayView;

/// Month selection; both default to the current month.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    /// Zero-based month (0 = January). Values outside 0..=11 roll over.
    pub month: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookedByDto {
    pub id: String,
    pub name: String,
}

/// One of the 42 grid cells. Padding cells have every field `null`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayCellDto {
    pub date: Option<String>,
    /// Day of month as text
    pub label: Option<String>,
    pub reservation: Option<BookedByDto>,
}

impl From<DayView<'_>> for DayCellDto {
    fn from(day: DayView<'_>) -> Self {
        Self {
            date: day.cell.date().map(|d| d.to_string()),
            label: day.cell.label(),
            reservation: day.reservation.map(|r| BookedByDto {
                id: r.id.clone(),
                name: r.name.clone(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthDto {
    pub year: i32,
    /// Zero-based
    pub month: u32,
    pub label: String,
    /// Monday-first, 6 rows of 7
    pub cells: Vec<DayCellDto>,
}
