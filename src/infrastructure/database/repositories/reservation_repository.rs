//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::reservation::rules::conflict_with;
use crate::domain::reservation::{IsoDate, Reservation, ReservationRepository, ValidReservation};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;
use crate::infrastructure::database::migrator::OVERLAP_VIOLATION;
use crate::shared::errors::InfraError;

/// Writes run "look for an overlapping row + write" inside one transaction,
/// one writer at a time. The overlap triggers installed by the migrations
/// back this up for any writer that does not go through this repository.
pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
    /// SQLite cannot upgrade two deferred read transactions to writers at
    /// once; the loser gets `database is locked` instead of waiting.
    write_gate: Mutex<()>,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_gate: Mutex::new(()),
        }
    }

    /// Turn a failed write into a conflict when it lost to an overlapping
    /// row (overlap trigger or lock contention), otherwise into a store failure.
    async fn write_error(
        &self,
        e: sea_orm::DbErr,
        candidate: &ValidReservation,
        exclude_id: Option<&str>,
    ) -> DomainError {
        let overlap_guard = e.to_string().contains(OVERLAP_VIOLATION);
        if !overlap_guard && !is_lock_contention(&e) {
            return db_err(e);
        }
        warn!(error = %e, "Write rejected by the database after passing transactional check");
        match find_overlap(&self.db, candidate, exclude_id).await {
            Ok(Some(other)) => conflict_with(&other),
            Ok(None) if overlap_guard => {
                DomainError::StoreFailure("overlap guard rejected the write".to_string())
            }
            Ok(None) => db_err(e),
            Err(lookup) => lookup,
        }
    }
}

/// SQLITE_BUSY / SQLITE_LOCKED, or Postgres serialization failure.
fn is_lock_contention(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("(code: 5)")
        || msg.contains("(code: 6)")
        || msg.contains("could not serialize access")
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let parse = |raw: &str| {
        IsoDate::parse(raw).map_err(|_| {
            DomainError::StoreFailure(format!("reservation {} has corrupt date '{}'", m.id, raw))
        })
    };
    Ok(Reservation {
        start_date: parse(&m.start_date)?,
        end_date: parse(&m.end_date)?,
        id: m.id,
        name: m.name,
        created_at: m.created_at,
    })
}

fn domain_to_active(r: &Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(r.id.clone()),
        name: Set(r.name.clone()),
        start_date: Set(r.start_date.to_string()),
        end_date: Set(r.end_date.to_string()),
        created_at: Set(r.created_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

/// Earliest stored reservation overlapping the candidate, skipping `exclude_id`.
async fn find_overlap<C: ConnectionTrait>(
    conn: &C,
    candidate: &ValidReservation,
    exclude_id: Option<&str>,
) -> DomainResult<Option<Reservation>> {
    // NOT (end < other.start OR start > other.end)
    let mut query = reservation::Entity::find()
        .filter(reservation::Column::StartDate.lte(candidate.end_date().as_str()))
        .filter(reservation::Column::EndDate.gte(candidate.start_date().as_str()));
    if let Some(id) = exclude_id {
        query = query.filter(reservation::Column::Id.ne(id));
    }

    let model = query
        .order_by_asc(reservation::Column::StartDate)
        .one(conn)
        .await
        .map_err(db_err)?;
    model.map(model_to_domain).transpose()
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn list_all(&self) -> DomainResult<Vec<Reservation>> {
        reservation::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn insert(&self, candidate: ValidReservation) -> DomainResult<Reservation> {
        let _gate = self.write_gate.lock().await;
        let txn = match self.db.begin().await {
            Ok(txn) => txn,
            Err(e) => return Err(self.write_error(e, &candidate, None).await),
        };

        if let Some(other) = find_overlap(&txn, &candidate, None).await? {
            return Err(conflict_with(&other));
        }

        let created = Reservation::new(candidate.clone());
        debug!("Inserting reservation: {}", created.id);
        if let Err(e) = domain_to_active(&created).insert(&txn).await {
            drop(txn);
            return Err(self.write_error(e, &candidate, None).await);
        }
        if let Err(e) = txn.commit().await {
            return Err(self.write_error(e, &candidate, None).await);
        }
        Ok(created)
    }

    async fn update(&self, id: &str, candidate: ValidReservation) -> DomainResult<Reservation> {
        let _gate = self.write_gate.lock().await;
        let txn = match self.db.begin().await {
            Ok(txn) => txn,
            Err(e) => return Err(self.write_error(e, &candidate, Some(id)).await),
        };

        let existing = reservation::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::reservation_not_found(id))?;

        if let Some(other) = find_overlap(&txn, &candidate, Some(id)).await? {
            return Err(conflict_with(&other));
        }

        let mut updated = model_to_domain(existing)?;
        updated.apply(candidate.clone());
        debug!("Updating reservation: {}", id);

        let mut active = domain_to_active(&updated);
        active.created_at = sea_orm::ActiveValue::Unchanged(updated.created_at);
        active.id = sea_orm::ActiveValue::Unchanged(updated.id.clone());
        if let Err(e) = active.update(&txn).await {
            drop(txn);
            return Err(self.write_error(e, &candidate, Some(id)).await);
        }
        if let Err(e) = txn.commit().await {
            return Err(self.write_error(e, &candidate, Some(id)).await);
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let _gate = self.write_gate.lock().await;
        let result = reservation::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::reservation_not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::domain::reservation::ReservationDraft;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::{init_database, DatabaseConfig};

    async fn memory_db() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn valid(name: &str, start: &str, end: &str) -> ValidReservation {
        ReservationDraft::new(name, start, end).validate().unwrap()
    }

    #[tokio::test]
    async fn insert_and_read_back() {
        let repo = SeaOrmReservationRepository::new(memory_db().await);
        let alice = repo.insert(valid("Alice", "2026-03-01", "2026-03-05")).await.unwrap();

        let found = repo.find_by_id(&alice.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Alice");
        assert_eq!(found.start_date.as_str(), "2026-03-01");
        assert_eq!(found.end_date.as_str(), "2026-03-05");
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_rejects_shared_endpoint() {
        let repo = SeaOrmReservationRepository::new(memory_db().await);
        repo.insert(valid("Alice", "2026-03-01", "2026-03-05")).await.unwrap();

        let err = repo
            .insert(valid("Bob", "2026-03-05", "2026-03-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { ref name, .. } if name == "Alice"));

        repo.insert(valid("Carol", "2026-03-06", "2026-03-10")).await.unwrap();
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_excludes_itself_but_not_others() {
        let repo = SeaOrmReservationRepository::new(memory_db().await);
        let alice = repo.insert(valid("Alice", "2026-03-01", "2026-03-05")).await.unwrap();
        repo.insert(valid("Carol", "2026-03-06", "2026-03-10")).await.unwrap();

        let shrunk = repo
            .update(&alice.id, valid("Alice", "2026-03-01", "2026-03-02"))
            .await
            .unwrap();
        assert_eq!(shrunk.end_date.as_str(), "2026-03-02");

        let err = repo
            .update(&alice.id, valid("Alice", "2026-03-01", "2026-03-06"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { ref name, .. } if name == "Carol"));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let repo = SeaOrmReservationRepository::new(memory_db().await);
        assert!(matches!(
            repo.update("nope", valid("A", "2026-01-01", "2026-01-01")).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(repo.delete("nope").await, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let repo = SeaOrmReservationRepository::new(memory_db().await);
        let alice = repo.insert(valid("Alice", "2026-03-01", "2026-03-05")).await.unwrap();
        repo.delete(&alice.id).await.unwrap();
        assert!(repo.find_by_id(&alice.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn trigger_blocks_writers_that_skip_the_check() {
        let db = memory_db().await;
        let repo = SeaOrmReservationRepository::new(db.clone());
        let alice = repo.insert(valid("Alice", "2026-03-01", "2026-03-05")).await.unwrap();

        let rogue = Reservation::new(valid("Mallory", "2026-03-04", "2026-03-08"));
        let err = domain_to_active(&rogue).insert(&db).await.unwrap_err();
        assert!(err.to_string().contains(OVERLAP_VIOLATION), "{err}");

        let carol = repo.insert(valid("Carol", "2026-03-10", "2026-03-12")).await.unwrap();
        let mut moved = domain_to_active(&carol);
        moved.start_date = Set("2026-03-05".to_string());
        let err = moved.update(&db).await.unwrap_err();
        assert!(err.to_string().contains(OVERLAP_VIOLATION), "{err}");

        assert_eq!(repo.find_by_id(&alice.id).await.unwrap().unwrap().end_date.as_str(), "2026-03-05");
    }

    #[tokio::test]
    async fn concurrent_overlapping_inserts_accept_exactly_one() {
        let repo = Arc::new(SeaOrmReservationRepository::new(memory_db().await));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let day = format!("2026-08-{:02}", 10 + i);
                    repo.insert(valid(&format!("Guest {i}"), "2026-08-01", &day)).await
                })
            })
            .collect();

        let mut accepted = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(e) => assert!(matches!(e, DomainError::Conflict { .. }), "{e:?}"),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    /// File database with the default pool, so concurrent writers really
    /// hold separate SQLite connections.
    async fn file_db(dir: &tempfile::TempDir) -> DatabaseConnection {
        let path = dir.path().join("booking.db");
        let config = DatabaseConfig::sqlite(&path.to_string_lossy());
        assert!(config.max_connections > 1);
        let db = init_database(&config).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn pooled_file_db_reports_lost_races_as_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(SeaOrmReservationRepository::new(file_db(&dir).await));

        for round in 0..10 {
            let month = format!("2027-{:02}", round + 1);
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let repo = repo.clone();
                    let start = format!("{month}-01");
                    let end = format!("{month}-{:02}", 10 + i);
                    tokio::spawn(async move {
                        repo.insert(valid(&format!("Guest {i}"), &start, &end)).await
                    })
                })
                .collect();

            let mut accepted = 0;
            for h in handles {
                match h.await.unwrap() {
                    Ok(_) => accepted += 1,
                    Err(e) => assert!(matches!(e, DomainError::Conflict { .. }), "round {round}: {e:?}"),
                }
            }
            assert_eq!(accepted, 1, "round {round}");
        }
        assert_eq!(repo.list_all().await.unwrap().len(), 10);
    }

    #[test]
    fn lock_errors_are_recognised() {
        let busy = sea_orm::DbErr::Custom(
            "error returned from database: (code: 5) database is locked".to_string(),
        );
        assert!(is_lock_contention(&busy));
        assert!(!is_lock_contention(&sea_orm::DbErr::Custom("no such table".to_string())));
    }
}
