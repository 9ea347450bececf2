use tracing::info;

use super::domain::Application;
use super::repository::{ConfirmationNotice, NotificationPublisher, NotifyError};
use crate::config::NotifyConfig;

impl ConfirmationNotice {
    pub fn for_application(application: &Application, config: &NotifyConfig) -> Self {
        let id = &application.application_id;
        let body = format!(
            "Dear {name},\n\n\
             Thank you for submitting your application.\n\
             Your Application ID is: {id}\n\n\
             We will review your application and get back to you soon.\n\n\
             Best regards,\n{signature}",
            name = application.full_name(),
            signature = config.signature,
        );

        Self {
            application_id: id.clone(),
            to: application.email.clone(),
            from: config.from.clone(),
            reply_to: config.reply_to.clone(),
            subject: format!("Application Received - {id}"),
            body,
        }
    }
}

/// Records confirmations in the service log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationPublisher for LogNotifier {
    fn publish(&self, notice: ConfirmationNotice) -> Result<(), NotifyError> {
        info!(
            application_id = %notice.application_id,
            to = %notice.to,
            subject = %notice.subject,
            "confirmation notice queued"
        );
        Ok(())
    }
}

/// Drops every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

impl NotificationPublisher for DisabledNotifier {
    fn publish(&self, _notice: ConfirmationNotice) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Runtime choice between logging and dropping, driven by `NotifyConfig::enabled`.
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredNotifier {
    Log(LogNotifier),
    Disabled(DisabledNotifier),
}

impl ConfiguredNotifier {
    pub fn from_config(config: &NotifyConfig) -> Self {
        if config.enabled {
            Self::Log(LogNotifier)
        } else {
            Self::Disabled(DisabledNotifier)
        }
    }
}

impl NotificationPublisher for ConfiguredNotifier {
    fn publish(&self, notice: ConfirmationNotice) -> Result<(), NotifyError> {
        match self {
            Self::Log(inner) => inner.publish(notice),
            Self::Disabled(inner) => inner.publish(notice),
        }
    }
}
