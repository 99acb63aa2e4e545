use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{error, info, instrument};

use healthy_life_domain::i18n::Translator;
use healthy_life_domain::services::wizard::{FieldErrors, MeasurementStep, StepRoute};
use healthy_life_domain::services::AssessmentServiceError;

use crate::analytics::events;
use crate::api::locale::RequestLocale;
use crate::api::routes::AppState;
use crate::entities::assessment::{
    AssessmentResponse, MeasurementsRequest, MeasurementsResponse, PreviewResponse,
    StartAssessmentRequest, UpdateAssessmentRequest,
};
use crate::entities::common::{ErrorResponse, LangQuery};

/// Per-field errors as `{field: {kind, message_key, message}}`
fn field_error_details(errors: &FieldErrors, translator: &Translator) -> serde_json::Value {
    errors
        .iter()
        .map(|(field, error)| {
            (
                field.as_str().to_string(),
                json!({
                    "kind": error.kind,
                    "message_key": error.message_key,
                    "message": translator.t(error.message_key),
                }),
            )
        })
        .collect::<serde_json::Map<String, serde_json::Value>>()
        .into()
}

/// Map service errors to API errors
fn map_service_error(err: AssessmentServiceError, translator: &Translator) -> ErrorResponse {
    match err {
        AssessmentServiceError::NotFound(id) => {
            info!("Assessment session not found: {}", id);
            ErrorResponse::not_found(&translator.t("common_session_not_found"))
        }
        AssessmentServiceError::InvalidInput(msg) => ErrorResponse::bad_request(&msg),
        AssessmentServiceError::Validation(errors) => ErrorResponse::validation_error(
            &translator.t("common_invalid_reading"),
            Some(field_error_details(&errors, translator)),
        ),
        AssessmentServiceError::RepositoryError(msg) => {
            error!("Assessment session store error: {}", msg);
            ErrorResponse::internal_error()
        }
    }
}

/// Start a new assessment session
#[utoipa::path(
    post,
    path = "/api/v1/assessments",
    params(LangQuery),
    request_body(content = StartAssessmentRequest, description = "Optional; the session locale"),
    responses(
        (status = 201, description = "Session started", body = AssessmentResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "assessment"
)]
#[instrument(skip(state))]
pub async fn start_assessment(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    request: Option<Json<StartAssessmentRequest>>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let locale = request
        .and_then(|Json(request)| request.locale)
        .unwrap_or(locale);

    let record = state
        .assessments
        .start_session(locale)
        .await
        .map_err(|e| map_service_error(e, &Translator::new(locale)))?;

    state.analytics.record_event(events::ASSESSMENT_STARTED);
    Ok((StatusCode::CREATED, Json(AssessmentResponse::from_record(&record))))
}

/// Get the current record of a session
#[utoipa::path(
    get,
    path = "/api/v1/assessments/{id}",
    params(
        ("id" = String, Path, description = "Session id"),
        LangQuery
    ),
    responses(
        (status = 200, description = "Session record", body = AssessmentResponse),
        (status = 400, description = "Malformed session id", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "assessment"
)]
#[instrument(skip(state))]
pub async fn get_assessment(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> Result<Json<AssessmentResponse>, ErrorResponse> {
    let record = state
        .assessments
        .get_record(&id)
        .await
        .map_err(|e| map_service_error(e, &Translator::new(locale)))?;

    Ok(Json(AssessmentResponse::from_record(&record)))
}

/// Merge a partial record into a session
#[utoipa::path(
    patch,
    path = "/api/v1/assessments/{id}",
    params(
        ("id" = String, Path, description = "Session id"),
        LangQuery
    ),
    request_body = UpdateAssessmentRequest,
    responses(
        (status = 200, description = "Updated session record", body = AssessmentResponse),
        (status = 400, description = "Inconsistent update", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "assessment"
)]
#[instrument(skip(state))]
pub async fn update_assessment(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
    Json(request): Json<UpdateAssessmentRequest>,
) -> Result<Json<AssessmentResponse>, ErrorResponse> {
    let update = request
        .into_update()
        .map_err(|msg| ErrorResponse::bad_request(&msg))?;

    let record = state
        .assessments
        .update_data(&id, update)
        .await
        .map_err(|e| map_service_error(e, &Translator::new(locale)))?;

    Ok(Json(AssessmentResponse::from_record(&record)))
}

/// End a session and discard its record
#[utoipa::path(
    delete,
    path = "/api/v1/assessments/{id}",
    params(
        ("id" = String, Path, description = "Session id"),
        LangQuery
    ),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "assessment"
)]
#[instrument(skip(state))]
pub async fn end_assessment(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> Result<StatusCode, ErrorResponse> {
    state
        .assessments
        .end_session(&id)
        .await
        .map_err(|e| map_service_error(e, &Translator::new(locale)))?;

    state.analytics.record_event(events::ASSESSMENT_COMPLETED);
    Ok(StatusCode::NO_CONTENT)
}

/// Submit the measurement step
///
/// On success the answers are stored and the response names the next screen:
/// the advisory when blood pressure or sugar is elevated, else the next step.
#[utoipa::path(
    post,
    path = "/api/v1/assessments/{id}/measurements",
    params(
        ("id" = String, Path, description = "Session id"),
        LangQuery
    ),
    request_body = MeasurementsRequest,
    responses(
        (status = 200, description = "Answers stored", body = MeasurementsResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "Field validation failed", body = ErrorResponse),
    ),
    tag = "assessment"
)]
#[instrument(skip(state))]
pub async fn submit_measurements(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
    Json(request): Json<MeasurementsRequest>,
) -> Result<Json<MeasurementsResponse>, ErrorResponse> {
    let outcome = state
        .assessments
        .submit_measurements(&id, request.into_form())
        .await
        .map_err(|e| map_service_error(e, &Translator::new(locale)))?;

    state.analytics.record_event(events::MEASUREMENTS_SUBMITTED);
    if outcome.route == StepRoute::Advisory {
        state.analytics.record_event(events::ADVISORY_SHOWN);
    }

    Ok(Json(MeasurementsResponse {
        route: outcome.route,
        redirect_to: outcome.route.path().to_string(),
        assessment: AssessmentResponse::from_record(&outcome.record),
    }))
}

/// Live categories for the measurement form, without validating or storing
#[utoipa::path(
    post,
    path = "/api/v1/assessments/{id}/preview",
    params(
        ("id" = String, Path, description = "Session id"),
        LangQuery
    ),
    request_body = MeasurementsRequest,
    responses(
        (status = 200, description = "Live preview", body = PreviewResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "assessment"
)]
#[instrument(skip(state))]
pub async fn preview_measurements(
    State(state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
    Json(request): Json<MeasurementsRequest>,
) -> Result<Json<PreviewResponse>, ErrorResponse> {
    let record = state
        .assessments
        .get_record(&id)
        .await
        .map_err(|e| map_service_error(e, &Translator::new(locale)))?;

    let step = MeasurementStep::with_form(request.into_form());
    Ok(Json(PreviewResponse::localized(
        &step.preview(),
        step.can_submit(),
        &Translator::new(record.locale),
    )))
}
