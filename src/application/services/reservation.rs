//! Reservation use cases: list, create, edit, delete.
//!
//! Each write runs the shared rules twice: once here against a fresh
//! snapshot (which yields a readable conflict message early) and once inside
//! the repository's atomic conditional write, which is what actually keeps
//! concurrent requests from persisting overlapping ranges.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::reservation::{Reservation, ReservationDraft, ReservationRepository};
use crate::domain::{DomainError, DomainResult, ErrorKind};

pub struct ReservationService {
    repo: Arc<dyn ReservationRepository>,
}

impl ReservationService {
    pub fn new(repo: Arc<dyn ReservationRepository>) -> Self {
        Self { repo }
    }

    /// All reservations ordered by `start_date`.
    pub async fn list(&self) -> DomainResult<Vec<Reservation>> {
        let mut reservations = self.repo.list_all().await?;
        sort_by_start(&mut reservations);
        Ok(reservations)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Reservation> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::reservation_not_found(id))
    }

    pub async fn create(&self, draft: ReservationDraft) -> DomainResult<Reservation> {
        let candidate = draft.validate().map_err(|e| rejected("create", e))?;

        let snapshot = self.repo.list_all().await?;
        candidate
            .ensure_free(&snapshot, None)
            .map_err(|e| rejected("create", e))?;

        let created = self
            .repo
            .insert(candidate)
            .await
            .map_err(|e| rejected("create", e))?;

        metrics::counter!("booking_reservations_total", "op" => "create").increment(1);
        info!(
            id = %created.id,
            name = %created.name,
            start = %created.start_date,
            end = %created.end_date,
            "Reservation created"
        );
        Ok(created)
    }

    /// Edit name and dates; the reservation never conflicts with itself.
    pub async fn update(&self, id: &str, draft: ReservationDraft) -> DomainResult<Reservation> {
        let candidate = draft.validate().map_err(|e| rejected("update", e))?;

        let snapshot = self.repo.list_all().await?;
        if !snapshot.iter().any(|r| r.id == id) {
            return Err(rejected("update", DomainError::reservation_not_found(id)));
        }
        candidate
            .ensure_free(&snapshot, Some(id))
            .map_err(|e| rejected("update", e))?;

        let updated = self
            .repo
            .update(id, candidate)
            .await
            .map_err(|e| rejected("update", e))?;

        metrics::counter!("booking_reservations_total", "op" => "update").increment(1);
        info!(
            id = %updated.id,
            name = %updated.name,
            start = %updated.start_date,
            end = %updated.end_date,
            "Reservation updated"
        );
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| rejected("delete", e))?;

        metrics::counter!("booking_reservations_total", "op" => "delete").increment(1);
        info!(id = %id, "Reservation deleted");
        Ok(())
    }
}

/// Stable sort, so reservations sharing a start date keep store order.
pub fn sort_by_start(reservations: &mut [Reservation]) {
    reservations.sort_by(|a, b| a.start_date.cmp(&b.start_date));
}

fn rejected(op: &'static str, e: DomainError) -> DomainError {
    match e.kind() {
        ErrorKind::Conflict => {
            metrics::counter!("booking_conflicts_total", "op" => op).increment(1);
            info!(op, reason = %e, "Reservation rejected");
        }
        ErrorKind::Validation | ErrorKind::NotFound => {
            debug!(op, reason = %e, "Reservation rejected");
        }
        ErrorKind::Unavailable => {
            warn!(op, error = %e, "Reservation store failure");
        }
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryReservationRepository;

    fn service() -> ReservationService {
        ReservationService::new(Arc::new(InMemoryReservationRepository::new()))
    }

    fn draft(name: &str, start: &str, end: &str) -> ReservationDraft {
        ReservationDraft::new(name, start, end)
    }

    fn conflict_name(e: DomainError) -> String {
        match e {
            DomainError::Conflict { name, .. } => name,
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn alice_bob_carol_scenario() {
        let svc = service();

        let alice = svc.create(draft("Alice", "2026-03-01", "2026-03-05")).await.unwrap();
        assert_eq!(alice.name, "Alice");

        let err = svc
            .create(draft("Bob", "2026-03-03", "2026-03-10"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(conflict_name(err), "Alice");

        let carol = svc.create(draft("Carol", "2026-03-06", "2026-03-10")).await.unwrap();
        assert_eq!(carol.start_date.as_str(), "2026-03-06");

        let names: Vec<_> = svc.list().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
    }

    #[tokio::test]
    async fn turnover_day_is_rejected() {
        let svc = service();
        svc.create(draft("Alice", "2026-03-01", "2026-03-05")).await.unwrap();
        let err = svc
            .create(draft("Dan", "2026-03-05", "2026-03-08"))
            .await
            .unwrap_err();
        assert_eq!(conflict_name(err), "Alice");
    }

    #[tokio::test]
    async fn editing_against_self_and_others() {
        let svc = service();
        let alice = svc.create(draft("Alice", "2026-03-01", "2026-03-05")).await.unwrap();
        svc.create(draft("Carol", "2026-03-06", "2026-03-10")).await.unwrap();

        let shrunk = svc
            .update(&alice.id, draft("Alice", "2026-03-01", "2026-03-02"))
            .await
            .unwrap();
        assert_eq!(shrunk.id, alice.id);
        assert_eq!(shrunk.end_date.as_str(), "2026-03-02");
        assert_eq!(shrunk.created_at, alice.created_at);

        let err = svc
            .update(&alice.id, draft("Alice", "2026-03-01", "2026-03-07"))
            .await
            .unwrap_err();
        assert_eq!(conflict_name(err), "Carol");

        // the failed edit left the stored range untouched
        assert_eq!(svc.get(&alice.id).await.unwrap().end_date.as_str(), "2026-03-02");
    }

    #[tokio::test]
    async fn validation_errors_surface_before_store_access() {
        let svc = service();
        assert_eq!(
            svc.create(draft("  ", "2026-01-01", "2026-01-05")).await,
            Err(DomainError::EmptyName)
        );
        assert!(matches!(
            svc.create(draft("Al", "2026-01-10", "2026-01-01")).await,
            Err(DomainError::InvertedRange { .. })
        ));
        assert!(matches!(
            svc.create(draft("Al", "2026/01/10", "2026-01-12")).await,
            Err(DomainError::MalformedDate(_))
        ));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn name_is_stored_trimmed() {
        let svc = service();
        let r = svc.create(draft("  Alice ", "2026-03-01", "2026-03-05")).await.unwrap();
        assert_eq!(r.name, "Alice");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let svc = service();
        let e = svc
            .update("missing", draft("Al", "2026-01-01", "2026-01-02"))
            .await
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::NotFound);
        assert_eq!(svc.delete("missing").await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(svc.get("missing").await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_frees_the_dates() {
        let svc = service();
        let alice = svc.create(draft("Alice", "2026-03-01", "2026-03-05")).await.unwrap();
        svc.delete(&alice.id).await.unwrap();
        svc.create(draft("Bob", "2026-03-03", "2026-03-10")).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_overlapping_creates_accept_exactly_one() {
        let svc = Arc::new(service());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let svc = svc.clone();
                tokio::spawn(async move {
                    svc.create(draft(&format!("Guest {i}"), "2026-07-01", "2026-07-14"))
                        .await
                })
            })
            .collect();

        let mut accepted = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(e) => assert_eq!(e.kind(), ErrorKind::Conflict),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(svc.list().await.unwrap().len(), 1);
    }
}
