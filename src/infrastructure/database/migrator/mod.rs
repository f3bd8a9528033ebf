//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_reservations;
mod m20260101_000002_add_reservation_overlap_guard;

pub use m20260101_000002_add_reservation_overlap_guard::OVERLAP_VIOLATION;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_reservations::Migration),
            Box::new(m20260101_000002_add_reservation_overlap_guard::Migration),
        ]
    }
}
