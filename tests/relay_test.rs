mod common;

use common::{API_KEY, COMPLETIONS_PATH, article, completion, config_for, five_suggestions};
use httpmock::prelude::*;
use seo_meta_relay::config::Config;
use seo_meta_relay::relay::{Relay, RelayError, UPSTREAM_FAILURE, UpstreamError};
use seo_meta_relay::site::TargetSite;
use seo_meta_relay::validation::ValidationError;

#[tokio::test]
async fn returns_suggestions_in_model_order() {
    let server = MockServer::start_async().await;
    let expected = five_suggestions();
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(COMPLETIONS_PATH)
                .header("authorization", format!("Bearer {}", API_KEY))
                .body_contains(r#""model":"gpt-4o-mini""#)
                .body_contains(r#""role":"system""#);
            then.status(200)
                .json_body(completion(&expected.to_string()));
        })
        .await;

    let relay = Relay::new(&config_for(&server));
    let suggestions = relay
        .get_suggestions(&article(150), TargetSite::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(suggestions.len(), 5);
    for (i, suggestion) in suggestions.iter().enumerate() {
        assert_eq!(suggestion.title, expected[i]["title"].as_str().unwrap());
        assert_eq!(suggestion.description, expected[i]["description"].as_str().unwrap());
    }
}

#[tokio::test]
async fn system_turn_names_the_target_site() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(COMPLETIONS_PATH)
                .body_contains("www.peopleshouse.us");
            then.status(200)
                .json_body(completion(&five_suggestions().to_string()));
        })
        .await;

    let relay = Relay::new(&config_for(&server));
    let result = relay
        .get_suggestions(&article(120), TargetSite::PeoplesHouse)
        .await;

    mock.assert_async().await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn non_json_content_is_a_generic_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETIONS_PATH);
            then.status(200)
                .json_body(completion("Sure! Here are five titles:\n1. ..."));
        })
        .await;

    let relay = Relay::new(&config_for(&server));
    let err = relay
        .get_suggestions(&article(150), TargetSite::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Upstream(UpstreamError::Parse(_))));
    assert_eq!(err.user_message(), UPSTREAM_FAILURE);
}

#[tokio::test]
async fn error_status_is_a_generic_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETIONS_PATH);
            then.status(401)
                .json_body(serde_json::json!({"error": {"message": "Incorrect API key provided"}}));
        })
        .await;

    let relay = Relay::new(&config_for(&server));
    let err = relay
        .get_suggestions(&article(150), TargetSite::default())
        .await
        .unwrap_err();

    match &err {
        RelayError::Upstream(UpstreamError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Incorrect API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.user_message().contains("API key"));
}

#[tokio::test]
async fn missing_choices_is_a_generic_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETIONS_PATH);
            then.status(200).json_body(serde_json::json!({"choices": []}));
        })
        .await;

    let relay = Relay::new(&config_for(&server));
    let err = relay
        .get_suggestions(&article(150), TargetSite::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Upstream(UpstreamError::MissingContent)));
}

#[tokio::test]
async fn connection_failure_is_a_generic_failure() {
    let mut config = Config::new(API_KEY);
    config.openai_api_base = "http://127.0.0.1:1/v1".into();
    let relay = Relay::new(&config);

    let text = article(150);
    let err = relay
        .get_suggestions(&text, TargetSite::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Upstream(UpstreamError::Request(_))));
    assert_eq!(err.user_message(), UPSTREAM_FAILURE);
    assert_eq!(text, article(150));
}

#[tokio::test]
async fn invalid_text_is_rejected_before_calling_out() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETIONS_PATH);
            then.status(200)
                .json_body(completion(&five_suggestions().to_string()));
        })
        .await;

    let relay = Relay::new(&config_for(&server));
    let text = format!("{} Lorem Ipsum", article(150));
    let err = relay
        .get_suggestions(&text, TargetSite::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Invalid(ValidationError::Placeholder)));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETIONS_PATH);
            then.status(200)
                .json_body(completion(&five_suggestions().to_string()));
        })
        .await;

    let relay = Relay::new(&config_for(&server));
    let first = article(110);
    let second = article(130);
    let (a, b) = tokio::join!(
        relay.get_suggestions(&first, TargetSite::BlueTent),
        relay.get_suggestions(&second, TargetSite::PeoplesHouse),
    );

    assert_eq!(a.unwrap().len(), 5);
    assert_eq!(b.unwrap().len(), 5);
    assert_eq!(mock.hits_async().await, 2);
}
