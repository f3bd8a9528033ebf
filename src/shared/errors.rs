use thiserror::Error;

/// Coarse classification of a [`DomainError`], used by callers to decide
/// between "pick other dates", "fix the input" and "try again later".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Unavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Name is required")]
    EmptyName,

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    MalformedDate(String),

    #[error("End date {end} is before start date {start}")]
    InvertedRange { start: String, end: String },

    #[error("Conflicts with \"{name}\" ({start} → {end})")]
    Conflict {
        name: String,
        start: String,
        end: String,
    },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Storage failure: {0}")]
    StoreFailure(String),
}

impl DomainError {
    pub fn reservation_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Reservation",
            field: "id",
            value: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName
            | Self::MalformedDate(_)
            | Self::InvertedRange { .. }
            | Self::OutOfRange(_) => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StoreFailure(_) => ErrorKind::Unavailable,
        }
    }

    /// Message safe to show to an end user. Store failures are replaced by a
    /// generic text; the cause is only logged.
    pub fn public_message(&self) -> String {
        match self {
            Self::StoreFailure(_) => "Service temporarily unavailable, please try again later".into(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::StoreFailure(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_separate_retryable_from_fixable() {
        assert_eq!(DomainError::EmptyName.kind(), ErrorKind::Validation);
        assert_eq!(
            DomainError::MalformedDate("2026/01/01".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            DomainError::Conflict {
                name: "Alice".into(),
                start: "2026-03-01".into(),
                end: "2026-03-05".into(),
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DomainError::reservation_not_found("abc").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DomainError::StoreFailure("disk I/O error".into()).kind(),
            ErrorKind::Unavailable
        );
    }

    #[test]
    fn conflict_message_names_the_other_reservation() {
        let e = DomainError::Conflict {
            name: "Alice".into(),
            start: "2026-03-01".into(),
            end: "2026-03-05".into(),
        };
        assert_eq!(e.to_string(), "Conflicts with \"Alice\" (2026-03-01 → 2026-03-05)");
    }

    #[test]
    fn store_failure_is_not_leaked_to_users() {
        let e: DomainError = InfraError::Database(sea_orm::DbErr::Custom("secret path".into())).into();
        assert!(matches!(e, DomainError::StoreFailure(_)));
        assert!(!e.public_message().contains("secret path"));
    }
}
