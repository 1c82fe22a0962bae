use crate::http::HttpError;
use crate::tracker::api::{list_domains, list_projects};
use crate::tracker::service::TrackerService;
use crate::upload::api::{bulk_upload, download_template};
use crate::upload::model::{UploadError, MAX_FILE_SIZE};
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

// Larger than MAX_FILE_SIZE so the upload handler sees oversized files and reports them as too large.
const BODY_LIMIT: usize = 2 * MAX_FILE_SIZE;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<dyn TrackerService>,
}

pub fn build_api(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/bulk-upload", post(bulk_upload))
        .route("/template", get(download_template))
        .route("/domains/:id/projects", get(list_projects))
        .route("/domains", get(list_domains))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new().include_headers(false))
            .on_request(
                DefaultOnRequest::new()
                    .level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Micros)
            ))
        .with_state(app_state)
}

pub struct ApiResponse<T>(pub T);

impl<T> ApiResponse<T> {
    pub fn from<E: Into<AppError>>(result: Result<T, E>) -> Result<ApiResponse<T>, AppError> {
        result.map(ApiResponse).map_err(Into::into)
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Processing(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ErrorBody {
    pub message: String,
}

impl From<UploadError> for AppError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::InvalidFileType(_) | UploadError::FileTooLarge(_) => {
                AppError::Validation(error.to_string())
            }
            UploadError::ParseFailure(_) => AppError::Processing(error.to_string()),
        }
    }
}

impl From<HttpError> for AppError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Status(404, _) => AppError::NotFound(error.to_string()),
            _ => AppError::Internal(error.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Processing(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Internal(message) => {
                tracing::error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}
