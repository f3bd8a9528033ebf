//! In-memory reservation store for development and testing

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::reservation::rules::conflict_with;
use crate::domain::reservation::{Reservation, ReservationRepository, ValidReservation};
use crate::domain::{DomainError, DomainResult};

/// Reads go straight to the map; every write holds `write_gate` across
/// "check for overlap + write", which gives the same all-or-nothing
/// guarantee as the SQL store's transaction.
pub struct InMemoryReservationRepository {
    reservations: DashMap<String, Reservation>,
    write_gate: Mutex<()>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self {
            reservations: DashMap::new(),
            write_gate: Mutex::new(()),
        }
    }

    fn snapshot(&self) -> Vec<Reservation> {
        self.reservations.iter().map(|e| e.value().clone()).collect()
    }

    fn ensure_free(&self, candidate: &ValidReservation, exclude_id: Option<&str>) -> DomainResult<()> {
        let clash = self
            .reservations
            .iter()
            .find(|e| {
                exclude_id != Some(e.key().as_str())
                    && crate::domain::reservation::overlaps(
                        candidate.start_date(),
                        candidate.end_date(),
                        &e.value().start_date,
                        &e.value().end_date,
                    )
            })
            .map(|e| conflict_with(e.value()));

        match clash {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryReservationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn list_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.snapshot())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(id).map(|r| r.clone()))
    }

    async fn insert(&self, candidate: ValidReservation) -> DomainResult<Reservation> {
        let _gate = self.write_gate.lock().await;
        self.ensure_free(&candidate, None)?;

        let reservation = Reservation::new(candidate);
        self.reservations
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn update(&self, id: &str, candidate: ValidReservation) -> DomainResult<Reservation> {
        let _gate = self.write_gate.lock().await;
        if !self.reservations.contains_key(id) {
            return Err(DomainError::reservation_not_found(id));
        }
        self.ensure_free(&candidate, Some(id))?;

        let mut entry = self
            .reservations
            .get_mut(id)
            .ok_or_else(|| DomainError::reservation_not_found(id))?;
        entry.apply(candidate);
        Ok(entry.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let _gate = self.write_gate.lock().await;
        self.reservations
            .remove(id)
            .ok_or_else(|| DomainError::reservation_not_found(id))?;
        Ok(())
    }
}
