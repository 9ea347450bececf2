use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde_json::Value;

use crate::config::NotifyConfig;
use crate::workflows::registration::domain::{Application, ApplicationForm, ApplicationId};
use crate::workflows::registration::identifier::IdGenerator;
use crate::workflows::registration::repository::{
    ApplicationRepository, ConfirmationNotice, NotificationPublisher, NotifyError,
    RepositoryError,
};
use crate::workflows::registration::{application_router, RegistrationService};

pub(super) fn form() -> ApplicationForm {
    ApplicationForm {
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        dob: "2001-04-17".to_string(),
        gender: "female".to_string(),
        email: "asha.verma@example.com".to_string(),
        phone: "9876543210".to_string(),
        alt_phone: String::new(),
        address: "12 Lake View Road".to_string(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pincode: "411001".to_string(),
        qualification: "B.Tech".to_string(),
        institution: "College of Engineering Pune".to_string(),
        percentage: "8.4 CGPA".to_string(),
        course: "Full Stack Development".to_string(),
        skills: vec!["Rust".to_string(), "JavaScript".to_string()],
        experience: "Six month internship".to_string(),
        why_join: "To build production web services".to_string(),
    }
}

pub(super) fn now() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 6, 1, 9, 30, 15)
        .earliest()
        .expect("valid local timestamp")
}

pub(super) fn notify_config() -> NotifyConfig {
    NotifyConfig {
        enabled: true,
        ..NotifyConfig::default()
    }
}

pub(super) fn build_service() -> (
    RegistrationService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = RegistrationService::new(repository.clone(), notifier.clone(), notify_config());
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<ApplicationId, Application>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.application_id.clone(), application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().rev().take(limit).cloned().collect())
    }
}

/// Holds each insert until `expected` inserts are in flight at once.
pub(super) struct RendezvousRepository {
    expected: usize,
    arrivals: Mutex<usize>,
    all_arrived: Condvar,
    inner: MemoryRepository,
}

impl RendezvousRepository {
    pub(super) fn new(expected: usize) -> Self {
        Self {
            expected,
            arrivals: Mutex::new(0),
            all_arrived: Condvar::new(),
            inner: MemoryRepository::default(),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.inner.len()
    }
}

impl ApplicationRepository for RendezvousRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut arrivals = self.arrivals.lock().expect("arrivals mutex poisoned");
        *arrivals += 1;
        self.all_arrived.notify_all();
        let (arrivals, timeout) = self
            .all_arrived
            .wait_timeout_while(arrivals, Duration::from_secs(5), |count| {
                *count < self.expected
            })
            .expect("arrivals mutex poisoned");
        drop(arrivals);
        if timeout.timed_out() {
            return Err(RepositoryError::Unavailable(
                "inserts never overlapped".to_string(),
            ));
        }
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self, limit: usize) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list(limit)
    }
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _limit: usize) -> Result<Vec<Application>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<ConfirmationNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<ConfirmationNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, notice: ConfirmationNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl NotificationPublisher for FailingNotifier {
    fn publish(&self, _notice: ConfirmationNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay refused".to_string()))
    }
}

/// Hands out queued ids in order, then repeats the last one.
pub(super) struct ScriptedIds {
    queue: Mutex<VecDeque<&'static str>>,
}

impl ScriptedIds {
    pub(super) fn new(ids: &[&'static str]) -> Self {
        Self {
            queue: Mutex::new(ids.iter().copied().collect()),
        }
    }
}

impl IdGenerator for ScriptedIds {
    fn next_id(&self, _issued_at: DateTime<Utc>) -> ApplicationId {
        let mut queue = self.queue.lock().expect("id queue poisoned");
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().copied()
        };
        ApplicationId(next.expect("scripted ids exhausted").to_string())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: RegistrationService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    application_router(Arc::new(service))
}
