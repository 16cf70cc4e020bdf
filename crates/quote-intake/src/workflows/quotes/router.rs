use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::QuoteSubmission;
use super::pipeline::{FailureKind, SubmissionResult};
use super::repository::QuoteSink;
use super::service::QuoteIntakeService;

/// Router builder exposing quote intake and the submissions listing.
pub fn quote_router<S>(service: Arc<QuoteIntakeService<S>>) -> Router
where
    S: QuoteSink + 'static,
{
    Router::new()
        .route("/api/v1/quotes", post(submit_handler::<S>))
        .route("/api/v1/submissions", get(submissions_handler::<S>))
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<QuoteIntakeService<S>>>,
    payload: Result<Json<QuoteSubmission>, JsonRejection>,
) -> Response
where
    S: QuoteSink + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            let result = SubmissionResult::unreadable(rejection.body_text());
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(result)).into_response();
        }
    };

    let result = service.submit(submission).await;
    let status = match result.failure {
        None => StatusCode::CREATED,
        Some(FailureKind::Validation) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(FailureKind::Persistence) | Some(FailureKind::Unexpected) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(result)).into_response()
}

pub(crate) async fn submissions_handler<S>(
    State(service): State<Arc<QuoteIntakeService<S>>>,
) -> Response
where
    S: QuoteSink + 'static,
{
    match service.submissions().await {
        Ok(submissions) => (StatusCode::OK, Json(submissions)).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
