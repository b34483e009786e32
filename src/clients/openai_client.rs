use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BackendError;

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Connection details for a chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionTarget {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

/// Sends a system/user message pair and returns the first choice's text.
pub async fn query_openai(
    client: &reqwest::Client,
    target: &CompletionTarget,
    system_message: &str,
    user_message: &str,
    api_key: &str,
) -> Result<String, BackendError> {
    let request = OpenAIRequest {
        model: target.model.clone(),
        messages: vec![
            OpenAIMessage {
                role: "system".to_string(),
                content: system_message.to_string(),
            },
            OpenAIMessage {
                role: "user".to_string(),
                content: user_message.to_string(),
            },
        ],
        temperature: target.temperature,
    };

    let url = format!("{}/chat/completions", target.base_url);
    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?; // read the body once

    if !status.is_success() {
        warn!(status = status.as_u16(), body = %text, "completion request failed");
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    let parsed: OpenAIResponse =
        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|c| !c.trim().is_empty());

    match content {
        Some(content) => {
            debug!(chars = content.len(), "completion reply received");
            Ok(content)
        }
        None => {
            warn!(body = %text, "completion response had no usable content");
            Err(BackendError::EmptyReply)
        }
    }
}
