//! Reservation repository interface

use async_trait::async_trait;

use super::model::{Reservation, ValidReservation};
use crate::domain::DomainResult;

/// Persistence port for reservations.
///
/// `insert` and `update` are conditional writes: an implementation must
/// re-check for overlaps against its current contents and fail with
/// `DomainError::Conflict` as part of the same atomic step as the write, so
/// two concurrent requests can never both persist overlapping ranges.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All reservations, in no particular order
    async fn list_all(&self) -> DomainResult<Vec<Reservation>>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// Persist a new reservation, assigning `id` and `created_at`
    async fn insert(&self, candidate: ValidReservation) -> DomainResult<Reservation>;

    /// Replace name and dates of an existing reservation
    async fn update(&self, id: &str, candidate: ValidReservation) -> DomainResult<Reservation>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
