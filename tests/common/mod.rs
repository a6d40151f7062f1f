#![allow(dead_code)]

use httpmock::MockServer;
use seo_meta_relay::{AppState, api::routes::create_router, config::Config};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-key";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Article text of `words` distinct words.
pub fn article(words: usize) -> String {
    (0..words)
        .map(|i| format!("grant{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn five_suggestions() -> Value {
    Value::Array(
        (1..=5)
            .map(|i| {
                json!({
                    "title": format!("Foundation grants round {i}"),
                    "description": format!("Description number {i} for a philanthropy article."),
                })
            })
            .collect(),
    )
}

/// Chat completion envelope around `content`, as the provider returns it.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::new(API_KEY);
    config.openai_api_base = server.url("/v1");
    config
}

/// Serves the router on an ephemeral port and returns its base URL.
pub async fn spawn_app(config: Config) -> String {
    spawn_state(AppState::new(config)).await
}

pub async fn spawn_state(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
