//! Reject overlapping reservations inside the database itself.
//!
//! Application code already checks inside a transaction; these triggers
//! also cover writers that bypass the repository. They abort with the
//! message [`OVERLAP_VIOLATION`] so the repository can recognise them.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};

pub const OVERLAP_VIOLATION: &str = "reservation_overlap";

const SQLITE_UP: &[&str] = &[
    r#"CREATE TRIGGER IF NOT EXISTS reservations_no_overlap_insert
BEFORE INSERT ON reservations
WHEN EXISTS (
    SELECT 1 FROM reservations
    WHERE NOT (NEW.end_date < start_date OR NEW.start_date > end_date)
)
BEGIN
    SELECT RAISE(ABORT, 'reservation_overlap');
END"#,
    r#"CREATE TRIGGER IF NOT EXISTS reservations_no_overlap_update
BEFORE UPDATE ON reservations
WHEN EXISTS (
    SELECT 1 FROM reservations
    WHERE id <> NEW.id
      AND NOT (NEW.end_date < start_date OR NEW.start_date > end_date)
)
BEGIN
    SELECT RAISE(ABORT, 'reservation_overlap');
END"#,
];

const SQLITE_DOWN: &[&str] = &[
    "DROP TRIGGER IF EXISTS reservations_no_overlap_insert",
    "DROP TRIGGER IF EXISTS reservations_no_overlap_update",
];

// The advisory lock serialises concurrent writers so two transactions
// cannot both pass the EXISTS check before either commits.
const POSTGRES_UP: &[&str] = &[
    r#"CREATE OR REPLACE FUNCTION reservations_no_overlap() RETURNS trigger AS $$
BEGIN
    PERFORM pg_advisory_xact_lock(hashtext('reservations'));
    IF EXISTS (
        SELECT 1 FROM reservations
        WHERE id <> NEW.id
          AND NOT (NEW.end_date COLLATE "C" < start_date OR NEW.start_date COLLATE "C" > end_date)
    ) THEN
        RAISE EXCEPTION 'reservation_overlap';
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql"#,
    r#"CREATE TRIGGER reservations_no_overlap
BEFORE INSERT OR UPDATE ON reservations
FOR EACH ROW EXECUTE FUNCTION reservations_no_overlap()"#,
];

const POSTGRES_DOWN: &[&str] = &[
    "DROP TRIGGER IF EXISTS reservations_no_overlap ON reservations",
    "DROP FUNCTION IF EXISTS reservations_no_overlap()",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let statements = match manager.get_database_backend() {
            DatabaseBackend::Sqlite => SQLITE_UP,
            DatabaseBackend::Postgres => POSTGRES_UP,
            other => {
                return Err(DbErr::Migration(format!(
                    "reservation overlap guard is not implemented for {:?}",
                    other
                )))
            }
        };
        run_all(manager, statements).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let statements = match manager.get_database_backend() {
            DatabaseBackend::Sqlite => SQLITE_DOWN,
            DatabaseBackend::Postgres => POSTGRES_DOWN,
            _ => return Ok(()),
        };
        run_all(manager, statements).await
    }
}

async fn run_all(manager: &SchemaManager<'_>, statements: &[&str]) -> Result<(), DbErr> {
    let conn = manager.get_connection();
    for sql in statements {
        conn.execute_unprepared(sql).await?;
    }
    Ok(())
}
