use std::fmt;

use thiserror::Error;

/// Transaction phase in which a batch write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOperation {
    BeginTransaction,
    UpsertOutputDetail,
    CommitTransaction,
}

impl fmt::Display for PersistOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PersistOperation::BeginTransaction => "begin_transaction",
            PersistOperation::UpsertOutputDetail => "upsert_output_detail",
            PersistOperation::CommitTransaction => "commit_transaction",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database operation '{operation}' failed: {source}")]
    Persist {
        operation: PersistOperation,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to load regions: {0}")]
    RegionSource(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Synchronization cancelled (resume from: {})", resume_from.as_deref().unwrap_or("-"))]
    Cancelled {
        resume_from: Option<String>,
        /// Province of `resume_from`, when the region is known
        province: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;
