use crate::task::TaskServiceError;
use axum::extract::Request;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::ValidationErrors;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors surfaced by the JSON API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was rejected before touching storage.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// No live row has the given ID.
    #[error("Task with ID {0} not found")]
    TaskNotFound(String),
    /// No route matches the request.
    #[error("Cannot {0} {1}")]
    RouteNotFound(Method, String),
    /// Storage failed; the details stay in the logs.
    #[error("Storage error: {0}")]
    Storage(#[source] sea_orm::DbErr),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::TaskNotFound(_) | ApiError::RouteNotFound(_, _) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Messages that are safe to show to a client.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Validation(errors) => errors.messages().to_vec(),
            ApiError::Storage(_) => vec![INTERNAL_ERROR_MESSAGE.to_string()],
            other => vec![other.to_string()],
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::TaskNotFound(id) => ApiError::TaskNotFound(id.to_string()),
            TaskServiceError::Database(db_err) => ApiError::Storage(db_err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationErrors::single(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(ValidationErrors::single(rejection.body_text()))
    }
}

/// Client-facing messages attached to an error response, picked up by
/// [`error_body_middleware`].
#[derive(Debug, Clone)]
pub struct ErrorMessages(pub Vec<String>);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(db_err) = &self {
            tracing::error!("Storage failure: {}", db_err);
        }
        let mut response = self.status_code().into_response();
        response.extensions_mut().insert(ErrorMessages(self.messages()));
        response
    }
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub timestamp: String,
    pub path: String,
    pub method: String,
    pub message: Vec<String>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, path: String, method: &Method, message: Vec<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            path,
            method: method.to_string(),
            message,
        }
    }
}

/// Rewrites every error response into an [`ErrorBody`] and logs it.
///
/// Responses produced by [`ApiError`] carry their messages in an
/// [`ErrorMessages`] extension. Anything else (a 405 from the router, for
/// instance) gets the canonical reason phrase.
pub async fn error_body_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let message = response
        .extensions()
        .get::<ErrorMessages>()
        .map(|messages| messages.0.clone())
        .unwrap_or_else(|| vec![status.canonical_reason().unwrap_or("Error").to_string()]);
    let body = ErrorBody::new(status, path, &method, message);

    if status.is_server_error() {
        tracing::error!(
            "[{}] {} {} - Status: {}",
            body.timestamp,
            body.method,
            body.path,
            status.as_u16()
        );
    } else {
        tracing::warn!(
            "[{}] {} {} - Status: {} {:?}",
            body.timestamp,
            body.method,
            body.path,
            status.as_u16(),
            body.message
        );
    }

    let (parts, _) = response.into_parts();
    let mut rewritten = (status, Json(body)).into_response();
    for (name, value) in parts.headers.iter() {
        if name != CONTENT_TYPE && name != CONTENT_LENGTH {
            rewritten.headers_mut().append(name.clone(), value.clone());
        }
    }
    rewritten
}

/// Fallback for requests that match no route.
#[tracing::instrument]
pub async fn route_not_found_handler(method: Method, uri: axum::http::Uri) -> ApiError {
    ApiError::RouteNotFound(method, uri.path().to_string())
}
