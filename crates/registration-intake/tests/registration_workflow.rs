//! End-to-end behavior of the registration intake through the public service facade and
//! HTTP router, backed by the real file and SQLite stores.

mod common {
    use std::path::Path;
    use std::sync::Arc;

    use registration_intake::config::NotifyConfig;
    use registration_intake::workflows::registration::{
        application_router, ApplicationForm, FileApplicationRepository, LogNotifier,
        RegistrationService,
    };

    pub(super) fn form() -> ApplicationForm {
        ApplicationForm {
            first_name: "Rohan".to_string(),
            last_name: "Iyer".to_string(),
            dob: "1999-11-02".to_string(),
            gender: "male".to_string(),
            email: "rohan.iyer@example.org".to_string(),
            phone: "9988776655".to_string(),
            alt_phone: "9123456789".to_string(),
            address: "Flat 4B, Palm Residency".to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            pincode: "600042".to_string(),
            qualification: "M.Sc".to_string(),
            institution: "Loyola College".to_string(),
            percentage: "78%".to_string(),
            course: "Data Engineering".to_string(),
            skills: vec!["SQL".to_string(), "Rust".to_string()],
            experience: String::new(),
            why_join: "Move into backend engineering".to_string(),
        }
    }

    pub(super) fn file_service(
        dir: &Path,
    ) -> Arc<RegistrationService<FileApplicationRepository, LogNotifier>> {
        Arc::new(RegistrationService::new(
            Arc::new(FileApplicationRepository::new(dir)),
            Arc::new(LogNotifier),
            NotifyConfig::default(),
        ))
    }

    pub(super) fn router(dir: &Path) -> axum::Router {
        application_router(file_service(dir))
    }
}

mod submission {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn submitted_application_is_written_and_readable_over_http() {
        let dir = tempfile::tempdir().expect("temp dir");

        let response = router(dir.path())
            .oneshot(
                Request::post("/api/v1/applications")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&form()).expect("form json")))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json(response).await;
        let id = created["data"]["applicationId"]
            .as_str()
            .expect("id")
            .to_string();

        let file = dir.path().join(format!("application_{id}.json"));
        let on_disk: Value =
            serde_json::from_str(&std::fs::read_to_string(&file).expect("file exists"))
                .expect("valid json");
        assert_eq!(on_disk, created["data"]);

        let response = router(dir.path())
            .oneshot(
                Request::get(format!("/api/v1/applications/{id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = json(response).await;
        assert_eq!(fetched["data"], created["data"]);
        assert_eq!(fetched["data"]["altPhone"], "9123456789");
        assert_eq!(fetched["data"]["experience"], "");
    }

    #[tokio::test]
    async fn every_submission_gets_its_own_id() {
        let dir = tempfile::tempdir().expect("temp dir");
        let service = file_service(dir.path());

        let first = service.submit(form()).expect("first");
        let second = service.submit(form()).expect("second");

        assert_ne!(first.application_id, second.application_id);
        assert_eq!(service.recent(10).expect("list").len(), 2);
    }
}

mod rejection {
    use super::common::*;
    use registration_intake::workflows::registration::RegistrationServiceError;

    #[test]
    fn invalid_submissions_leave_no_files_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        let service = file_service(dir.path());
        let mut bad = form();
        bad.pincode = "60004".to_string();
        bad.email = "rohan@".to_string();

        match service.submit(bad) {
            Err(RegistrationServiceError::Validation(errors)) => assert_eq!(
                errors.joined(),
                "Valid email is required, Valid 6-digit pincode is required"
            ),
            other => panic!("expected validation failure, got {other:?}"),
        }
        let written = std::fs::read_dir(dir.path()).expect("dir").count();
        assert_eq!(written, 0);
    }
}

mod sqlite {
    use super::common::form;
    use registration_intake::config::NotifyConfig;
    use registration_intake::workflows::registration::{
        DisabledNotifier, RegistrationService, SqliteApplicationRepository,
    };
    use std::sync::Arc;

    #[test]
    fn sqlite_backend_stores_submissions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let repository = Arc::new(
            SqliteApplicationRepository::open(dir.path().join("registration.db")).expect("open"),
        );
        let service = RegistrationService::new(
            repository,
            Arc::new(DisabledNotifier),
            NotifyConfig::default(),
        );

        let stored = service.submit(form()).expect("submit");
        let fetched = service.get(&stored.application_id).expect("fetch");
        assert_eq!(fetched, stored);
    }
}
