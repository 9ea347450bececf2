//! Registration application intake: sanitize and validate the submitted form,
//! assign an application id, persist the record, and confirm it to the applicant.
//!
//! The validation rule table in [`validation`] is the single source of truth for
//! both this service and the browser form, which fetches it at load time.

pub mod domain;
pub mod identifier;
pub(crate) mod notify;
pub mod repository;
pub mod router;
pub mod sanitize;
pub mod service;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Application, ApplicationForm, ApplicationId, ValidatedForm};
pub use identifier::{IdGenerator, TimestampIdGenerator};
pub use notify::{ConfiguredNotifier, DisabledNotifier, LogNotifier};
pub use repository::{
    ApplicationRepository, ConfirmationNotice, NotificationPublisher, NotifyError,
    RepositoryError,
};
pub use router::application_router;
pub use service::{RegistrationService, RegistrationServiceError};
pub use storage::{ConfiguredRepository, FileApplicationRepository, SqliteApplicationRepository};
pub use validation::{field_rules, FieldError, FieldRule, FormValidator, ValidationErrors};
