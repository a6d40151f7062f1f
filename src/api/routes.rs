use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::{Json, Request, State, rejection::JsonRejection},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::AppState;
use crate::api::models::ChatRequest;
use crate::api::response;
use crate::error::AppError;
use crate::site::TargetSite;
use crate::validation::word_count;

pub const HEALTH_MESSAGE: &str = "Backend API is running!";

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .route("/chat", post(chat_handler).fallback(api_not_found))
        .fallback(api_not_found);

    // Prebuilt front-end bundle; unknown paths get its entry document.
    let static_files = app_state
        .config
        .static_dir
        .as_ref()
        .map(|dir| ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))));

    Router::new()
        .route("/", get(health_handler))
        .nest("/api", api)
        .fallback(move |req: Request| fallback_handler(static_files.clone(), req))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> &'static str {
    tracing::debug!("GET /: health check");
    HEALTH_MESSAGE
}

async fn api_not_found(uri: Uri) -> Response {
    tracing::warn!(path = %uri.path(), "API route not found");
    response::not_found("API route not found")
}

/// Anything the routes above did not match. Paths under the `/api` prefix
/// (including `/api/` and `/apix`) never reach the front-end bundle.
async fn fallback_handler(static_files: Option<ServeDir<ServeFile>>, req: Request) -> Response {
    if req.uri().path().starts_with("/api") {
        return api_not_found(req.uri().clone()).await;
    }

    match static_files {
        Some(mut files) => match files.try_call(req).await {
            Ok(res) => res.into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to serve static file");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Aborts the wrapped task when dropped, so a relay call does not outlive
/// the request that started it (timeout or client disconnect).
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected chat request body");
            return response::failure(StatusCode::BAD_REQUEST, "Invalid request body.");
        }
    };

    let site = match TargetSite::from_request(req.website.as_deref()) {
        Ok(site) => site,
        Err(reason) => {
            tracing::warn!(%reason, "rejected chat request");
            return response::failure(StatusCode::BAD_REQUEST, reason.to_string());
        }
    };

    let prompt = req.prompt.unwrap_or_default();
    tracing::info!(words = word_count(&prompt), %site, "POST /api/chat");
    let start_time = Instant::now();

    // The relay runs in its own task so a panic inside it surfaces here as a
    // JoinError instead of tearing down the connection.
    let relay = Arc::clone(&state.relay);
    let mut task = AbortOnDrop(tokio::spawn(async move { relay.suggest(&prompt, site).await }));
    let outcome = tokio::time::timeout(state.config.request_timeout, &mut task.0).await;

    let elapsed = start_time.elapsed();
    tracing::info!(?elapsed, "chat request processed");

    match outcome {
        Ok(Ok(Ok(suggestions))) => {
            tracing::info!(count = suggestions.len(), "sending suggestions");
            response::success(suggestions)
        }
        Ok(Ok(Err(err))) => {
            tracing::warn!(error = %err, "relay reported failure");
            response::failure(StatusCode::BAD_REQUEST, err.user_message())
        }
        Ok(Err(join_error)) => AppError::Unexpected(join_error.to_string()).into_response(),
        Err(_) => {
            AppError::Unexpected(format!("request timed out after {:?}", elapsed)).into_response()
        }
    }
}
