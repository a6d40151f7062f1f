use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessBody<T> {
    pub success: bool,
    pub data: T,
}

/// `message` and `error` carry the same text; older clients read `error`.
#[derive(Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub message: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(SuccessBody {
            success: true,
            data,
        }),
    )
        .into_response()
}

pub fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    (
        status,
        Json(FailureBody {
            success: false,
            error: message.clone(),
            message,
        }),
    )
        .into_response()
}

pub fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
