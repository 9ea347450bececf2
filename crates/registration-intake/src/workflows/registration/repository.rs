use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId};

/// Storage abstraction so the service can run against files, SQLite, or memory.
///
/// Records are write-once: no update or delete.
pub trait ApplicationRepository: Send + Sync {
    /// Persist a new record. Fails with [`RepositoryError::Conflict`] when the id is taken.
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// Most recent submissions first.
    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for submission confirmations (e-mail adapters, logs).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: ConfirmationNotice) -> Result<(), NotifyError>;
}

/// Plain-text confirmation addressed to the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationNotice {
    pub application_id: ApplicationId,
    pub to: String,
    pub from: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
