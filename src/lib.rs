//! # Maison booking
//!
//! Reservations of one shared calendar over inclusive date ranges. Two
//! bookings may never overlap, and a range that ends on the day another
//! starts counts as overlapping.
//!
//! ## Architecture
//!
//! - **domain**: reservation rules, calendar grid arithmetic, repository port
//! - **application**: reservation service and the calendar view state
//! - **infrastructure**: SeaORM/SQLite and in-memory stores
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: errors and shutdown coordination
//! - **server**: runtime bootstrap used by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryReservationRepository, SeaOrmReservationRepository,
};

pub use interfaces::http::create_api_router;
