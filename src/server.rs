//! Booking service runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, database and
//! migrations, store selection, REST API and graceful shutdown.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::services::ReservationService;
use crate::config::AppConfig;
use crate::domain::ReservationRepository;
use crate::infrastructure::database::migrator::Migrator;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::{
    create_api_router, init_database, DatabaseConfig, InMemoryReservationRepository,
    SeaOrmReservationRepository,
};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the booking service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Keep reservations in process memory instead of the database.
    pub in_memory: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            in_memory: false,
        }
    }
}

/// The global recorder can only be installed once per process, so a restart
/// within the same process reuses the first handle.
fn prometheus_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!("Metrics recorder not installed, /metrics will stay empty: {}", e);
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking service.
///
/// ```rust,no_run
/// use maison_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub service: Arc<ReservationService>,
    pub config: AppConfig,
    /// Port actually bound, which differs from the config when it asked for 0.
    pub api_port: u16,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting Maison booking service...");

        let prometheus = prometheus_handle();

        // ── Store ──────────────────────────────────────────────
        let (repo, db): (Arc<dyn ReservationRepository>, Option<DatabaseConnection>) = if opts.in_memory {
            info!("Using the in-memory reservation store; data is lost on exit");
            (Arc::new(InMemoryReservationRepository::new()), None)
        } else {
            let db_config = DatabaseConfig::from(&app_cfg.database);
            info!("Database: {}", db_config.url);
            let db = init_database(&db_config).await?;

            if opts.auto_migrate {
                info!("Running database migrations...");
                Migrator::up(&db, None).await?;
                info!("Migrations completed");
            }

            (Arc::new(SeaOrmReservationRepository::new(db.clone())), Some(db))
        };

        let service = Arc::new(ReservationService::new(repo));

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        // ── REST API ───────────────────────────────────────────
        let api_router = create_api_router(service.clone(), db.clone(), prometheus);

        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            service,
            config: app_cfg,
            api_port: local_addr.port(),
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install SIGINT/SIGTERM listeners that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Wait for the API to drain after shutdown was triggered, at most
    /// `server.shutdown_timeout` seconds, then close the database.
    pub async fn wait(self) {
        let timeout = self.shutdown.timeout();
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API stopped"),
            Ok(Err(e)) => error!("REST API task panicked: {}", e),
            Err(_) => warn!("REST API did not stop within {:?}, abandoning open connections", timeout),
        }

        if let Some(db) = self.db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }

        info!("Maison booking service shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down booking service...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

/// Initialize tracing from the application config. `RUST_LOG` takes
/// precedence over `logging.level`.
///
/// Call once at process startup, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
