use std::sync::Arc;

use super::common::*;
use crate::workflows::registration::domain::{ApplicationForm, ApplicationId};
use crate::workflows::registration::repository::{ApplicationRepository, RepositoryError};
use crate::workflows::registration::service::MAX_ID_ATTEMPTS;
use crate::workflows::registration::{RegistrationService, RegistrationServiceError};

#[test]
fn submit_assigns_id_and_timestamp_and_persists() {
    let (service, repository, _) = build_service();

    let application = service.submit_at(form(), now()).expect("submission succeeds");

    assert!(application.application_id.is_well_formed());
    assert_eq!(
        application.submitted_date.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2025-06-01 09:30:15"
    );
    let stored = repository
        .fetch(&application.application_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, application);
}

#[test]
fn submit_rejects_invalid_forms_without_persisting() {
    let (service, repository, notifier) = build_service();

    match service.submit_at(ApplicationForm::default(), now()) {
        Err(RegistrationServiceError::Validation(errors)) => {
            assert!(errors.joined().contains("First name is required"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(repository.len(), 0);
    assert!(notifier.notices().is_empty());
}

#[test]
fn submit_retries_with_a_fresh_id_on_collision() {
    let (service, repository, _) = build_service();
    let service = service.with_id_generator(ScriptedIds::new(&[
        "APP17487706151111",
        "APP17487706151111",
        "APP17487706152222",
    ]));

    let first = service.submit_at(form(), now()).expect("first submission");
    let second = service.submit_at(form(), now()).expect("second submission");

    assert_eq!(first.application_id.as_str(), "APP17487706151111");
    assert_eq!(second.application_id.as_str(), "APP17487706152222");
    assert_eq!(repository.len(), 2);
}

#[test]
fn submit_gives_up_after_repeated_collisions() {
    let service = RegistrationService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryNotifier::default()),
        notify_config(),
    );

    match service.submit_at(form(), now()) {
        Err(RegistrationServiceError::IdExhausted { attempts }) => {
            assert_eq!(attempts, MAX_ID_ATTEMPTS)
        }
        other => panic!("expected id exhaustion, got {other:?}"),
    }
}

#[test]
fn submit_propagates_storage_outages() {
    let service = RegistrationService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        notify_config(),
    );

    match service.submit_at(form(), now()) {
        Err(RegistrationServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert!(reason.contains("offline"))
        }
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}

#[test]
fn submit_sends_a_confirmation_notice() {
    let (service, _, notifier) = build_service();

    let application = service.submit_at(form(), now()).expect("submission succeeds");

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    let notice = &notices[0];
    assert_eq!(notice.to, "asha.verma@example.com");
    assert_eq!(notice.from, "noreply@yourwebsite.com");
    assert_eq!(
        notice.subject,
        format!("Application Received - {}", application.application_id)
    );
    assert!(notice.body.starts_with("Dear Asha Verma,"));
    assert!(notice
        .body
        .contains(&format!("Your Application ID is: {}", application.application_id)));
    assert!(notice.body.ends_with("Admissions Team"));
}

#[test]
fn notification_failures_do_not_fail_the_submission() {
    let repository = Arc::new(MemoryRepository::default());
    let service = RegistrationService::new(
        repository.clone(),
        Arc::new(FailingNotifier),
        notify_config(),
    );

    let application = service.submit_at(form(), now()).expect("submission still succeeds");
    assert!(repository
        .fetch(&application.application_id)
        .expect("fetch")
        .is_some());
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service();

    match service.get(&ApplicationId("APP1".to_string())) {
        Err(RegistrationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn recent_lists_stored_applications() {
    let (service, _, _) = build_service();
    let service = service.with_id_generator(ScriptedIds::new(&["APP100", "APP200"]));
    service.submit_at(form(), now()).expect("first");
    service.submit_at(form(), now()).expect("second");

    let recent = service.recent(1).expect("list");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].application_id.as_str(), "APP200");
}
