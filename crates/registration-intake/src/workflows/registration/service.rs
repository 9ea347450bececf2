use std::sync::Arc;

use chrono::{DateTime, Local, SubsecRound, Utc};
use tracing::{info, warn};

use super::domain::{Application, ApplicationForm, ApplicationId};
use super::identifier::{IdGenerator, TimestampIdGenerator};
use super::repository::{
    ApplicationRepository, ConfirmationNotice, NotificationPublisher, RepositoryError,
};
use super::validation::{FormValidator, ValidationErrors};
use crate::config::NotifyConfig;

/// Fresh ids tried before a submission is given up on.
pub const MAX_ID_ATTEMPTS: usize = 5;

/// Service composing validation, id assignment, persistence and confirmations.
pub struct RegistrationService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    notify: NotifyConfig,
    ids: Arc<dyn IdGenerator>,
    validator: &'static FormValidator,
}

impl<R, N> RegistrationService<R, N>
where
    R: ApplicationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, notify: NotifyConfig) -> Self {
        Self {
            repository,
            notifier,
            notify,
            ids: Arc::new(TimestampIdGenerator),
            validator: FormValidator::shared(),
        }
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Validate and persist a submission stamped with the current local time.
    pub fn submit(&self, form: ApplicationForm) -> Result<Application, RegistrationServiceError> {
        self.submit_at(form, Local::now())
    }

    pub fn submit_at(
        &self,
        form: ApplicationForm,
        now: DateTime<Local>,
    ) -> Result<Application, RegistrationServiceError> {
        let validated = match self.validator.validate(&form, now.date_naive()) {
            Ok(validated) => validated,
            Err(errors) => {
                info!(fields = ?errors.fields(), "application rejected by validation");
                return Err(errors.into());
            }
        };

        let submitted_date = now.naive_local().trunc_subsecs(0);
        let issued_at = now.with_timezone(&Utc);

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let application_id = self.ids.next_id(issued_at);
            let application = validated
                .clone()
                .into_application(application_id, submitted_date);

            match self.repository.insert(application) {
                Ok(stored) => {
                    info!(
                        application_id = %stored.application_id,
                        course = %stored.course,
                        "application submitted"
                    );
                    self.confirm(&stored);
                    return Ok(stored);
                }
                Err(RepositoryError::Conflict) => {
                    warn!(attempt, "application id collision, retrying with a fresh id");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(RegistrationServiceError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    /// Fetch a stored application.
    pub fn get(&self, application_id: &ApplicationId) -> Result<Application, RegistrationServiceError> {
        let application = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<Application>, RegistrationServiceError> {
        Ok(self.repository.list(limit)?)
    }

    // Confirmation delivery is best effort; the record is already stored.
    fn confirm(&self, application: &Application) {
        let notice = ConfirmationNotice::for_application(application, &self.notify);
        if let Err(err) = self.notifier.publish(notice) {
            warn!(
                application_id = %application.application_id,
                %err,
                "confirmation notice not sent"
            );
        }
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("could not allocate a unique application id after {attempts} attempts")]
    IdExhausted { attempts: usize },
}
