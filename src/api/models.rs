use serde::Deserialize;

/// Body of `POST /api/chat`. A missing or null `prompt` is treated as empty
/// so it fails validation with the usual message.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub prompt: Option<String>,
    pub website: Option<String>,
}
