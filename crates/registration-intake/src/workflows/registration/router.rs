use std::sync::Arc;

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use super::domain::{ApplicationForm, ApplicationId};
use super::repository::{ApplicationRepository, NotificationPublisher, RepositoryError};
use super::service::{RegistrationService, RegistrationServiceError};
use super::validation::{field_rules, FieldError, FieldRule};

pub const SUCCESS_MESSAGE: &str = "Application submitted successfully!";
pub const INVALID_METHOD_MESSAGE: &str = "Invalid request method";

/// Response shape shared by every application endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl Envelope {
    fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            errors: Vec::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: json!({}),
            errors: Vec::new(),
        }
    }

    fn respond(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Router builder exposing submission, lookup and rule-table endpoints.
pub fn application_router<R, N>(service: Arc<RegistrationService<R, N>>) -> Router
where
    R: ApplicationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            post(submit_handler::<R, N>).fallback(method_not_allowed),
        )
        .route("/api/v1/applications/rules", get(rules_handler))
        .route(
            "/api/v1/applications/:application_id",
            get(fetch_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<RegistrationService<R, N>>>,
    headers: HeaderMap,
    request: Request,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let form = match read_form(&headers, request).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let submitted = tokio::task::spawn_blocking(move || service.submit(form)).await;
    let outcome = match submitted {
        Ok(outcome) => outcome,
        Err(err) => return internal_error(format!("submission task failed: {err}")),
    };

    match outcome {
        Ok(application) => match serde_json::to_value(&application) {
            Ok(data) => Envelope::ok(SUCCESS_MESSAGE, data).respond(StatusCode::CREATED),
            Err(err) => internal_error(err),
        },
        Err(RegistrationServiceError::Validation(errors)) => Envelope {
            errors: errors.errors().to_vec(),
            ..Envelope::failure(errors.joined())
        }
        .respond(StatusCode::UNPROCESSABLE_ENTITY),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn fetch_handler<R, N>(
    State(service): State<Arc<RegistrationService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = ApplicationId(application_id);
    let lookup_id = id.clone();
    let fetched = tokio::task::spawn_blocking(move || service.get(&lookup_id)).await;
    let outcome = match fetched {
        Ok(outcome) => outcome,
        Err(err) => return internal_error(format!("lookup task failed: {err}")),
    };

    match outcome {
        Ok(application) => match serde_json::to_value(&application) {
            Ok(data) => Envelope::ok("Application found", data).respond(StatusCode::OK),
            Err(err) => internal_error(err),
        },
        Err(RegistrationServiceError::Repository(RepositoryError::NotFound)) => {
            Envelope::failure(format!("Application {id} not found")).respond(StatusCode::NOT_FOUND)
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn rules_handler() -> Json<&'static [FieldRule]> {
    Json(field_rules())
}

pub(crate) async fn method_not_allowed() -> Response {
    Envelope::failure(INVALID_METHOD_MESSAGE).respond(StatusCode::METHOD_NOT_ALLOWED)
}

async fn read_form(headers: &HeaderMap, request: Request) -> Result<ApplicationForm, Response> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        Json::<ApplicationForm>::from_request(request, &())
            .await
            .map(|Json(form)| form)
            .map_err(|rejection| bad_request(rejection.body_text()))
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map(|Form(pairs)| ApplicationForm::from_pairs(pairs))
            .map_err(|rejection| bad_request(rejection.body_text()))
    } else {
        Err(Envelope::failure(
            "An error occurred: expected a JSON or urlencoded form submission",
        )
        .respond(StatusCode::UNSUPPORTED_MEDIA_TYPE))
    }
}

fn bad_request(detail: String) -> Response {
    Envelope::failure(format!("An error occurred: {detail}")).respond(StatusCode::BAD_REQUEST)
}

fn internal_error(err: impl std::fmt::Display) -> Response {
    error!(%err, "application request failed");
    Envelope::failure(format!("An error occurred: {err}"))
        .respond(StatusCode::INTERNAL_SERVER_ERROR)
}
