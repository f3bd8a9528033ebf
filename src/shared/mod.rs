pub mod errors;
pub mod shutdown;

pub use errors::{ConfigError, DomainError, DomainResult, ErrorKind, InfraError};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
