use metrics_exporter_prometheus::PrometheusHandle;
use registration_intake::config::{NotifyConfig, StorageConfig};
use registration_intake::workflows::registration::{
    ConfiguredNotifier, ConfiguredRepository, RegistrationService, RepositoryError,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type IntakeService = RegistrationService<ConfiguredRepository, ConfiguredNotifier>;

/// Open the configured store and wire it to the configured notifier.
pub(crate) fn build_service(
    storage: &StorageConfig,
    notify: &NotifyConfig,
) -> Result<IntakeService, RepositoryError> {
    let repository = Arc::new(ConfiguredRepository::open(storage)?);
    let notifier = Arc::new(ConfiguredNotifier::from_config(notify));
    Ok(RegistrationService::new(repository, notifier, notify.clone()))
}
