//! Client for the chat-completion provider.
//!
//! `Relay::get_suggestions` is the only entry point. It never panics on bad
//! upstream data and never hands provider payloads back to the caller: every
//! failure is reduced to a short sentence in `RelayError::user_message`, with
//! the underlying detail going to the log.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::site::TargetSite;
use crate::validation::{self, ValidationError};

/// Generic message for any upstream failure.
pub const UPSTREAM_FAILURE: &str = "Failed to fetch response from OpenAI API";

/// How many suggestions the model is asked for.
pub const SUGGESTION_COUNT: usize = 5;

/// One proposed title/description pair. Length limits are requested from the
/// model but not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to chat completion API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat completion API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("chat completion response has no message content")]
    MissingContent,

    #[error("model output is not a suggestion list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model returned an empty suggestion list")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    /// Text that is safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            RelayError::Invalid(reason) => reason.to_string(),
            RelayError::Upstream(_) => UPSTREAM_FAILURE.to_string(),
        }
    }
}

pub type RelayResult = std::result::Result<Vec<Suggestion>, RelayError>;

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Anything that can turn article text into suggestions. The HTTP layer
/// depends on this rather than on `Relay` directly.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, text: &str, site: TargetSite) -> RelayResult;
}

pub struct Relay {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl Relay {
    pub fn new(config: &Config) -> Self {
        Relay {
            client: Client::new(),
            endpoint: config.chat_completions_url(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
        }
    }

    pub async fn get_suggestions(&self, text: &str, site: TargetSite) -> RelayResult {
        // Callers are expected to validate already; this must hold regardless.
        validation::validate(text)?;

        let system = system_prompt(site);
        let content = match self.call_chat_completion(&system, text).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(error = %e, "chat completion call failed");
                return Err(e.into());
            }
        };

        match parse_suggestions(&content) {
            Ok(suggestions) => {
                tracing::debug!(count = suggestions.len(), %site, "parsed suggestions");
                Ok(suggestions)
            }
            Err(e) => {
                tracing::error!(error = %e, content_len = content.len(), "unusable model output");
                Err(e.into())
            }
        }
    }

    async fn call_chat_completion(&self, system: &str, user: &str) -> Result<String, UpstreamError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let json: ChatResponse = serde_json::from_str(&res.text().await?)?;
        json.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(UpstreamError::MissingContent)
    }
}

#[async_trait]
impl SuggestionSource for Relay {
    async fn suggest(&self, text: &str, site: TargetSite) -> RelayResult {
        self.get_suggestions(text, site).await
    }
}

/// Instruction sent as the system turn of every request.
pub fn system_prompt(site: TargetSite) -> String {
    format!(
        "You are an SEO meta data expert for {site}. Generate exactly {SUGGESTION_COUNT} \
         SEO-friendly titles and descriptions for the provided content, written to match \
         the voice of {site}. Each title must not exceed 70 characters. Each description \
         must be between 140 and 190 characters. Keep the tone strictly factual and do not \
         invent claims that are not in the content. Return the output strictly as a valid \
         JSON array of objects, with each object containing only \"title\" and \
         \"description\" keys. Do not include any additional text or formatting."
    )
}

/// Parses model output into suggestions, preserving the model's order.
///
/// A single Markdown code fence around the array is tolerated since models
/// add one despite being told not to. Anything other than a non-empty array
/// of `{title, description}` objects is rejected.
pub fn parse_suggestions(content: &str) -> Result<Vec<Suggestion>, UpstreamError> {
    let suggestions: Vec<Suggestion> = serde_json::from_str(strip_code_fence(content))?;
    if suggestions.is_empty() {
        return Err(UpstreamError::Empty);
    }
    Ok(suggestions)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed
        .strip_prefix("```")
        .and_then(|inner| inner.strip_suffix("```"))
    {
        // Drop the info string, e.g. "json".
        Some(inner) => inner.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim(),
        None => trimmed,
    }
}
