use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ExtractError;
use crate::models::event::{EventRecord, normalize};
use crate::service::openai_service::OpenAIClient;

pub const EXTRACTION_PROMPT: &str = "Extract the calendar event information from the following text.\n\
     Return ONLY a valid JSON object (no additional explanations) with the following fields:\n\
     - title: the title or subject of the event\n\
     - startDate: the start date in ISO format (YYYY-MM-DD)\n\
     - startTime: the start time in 24h format (HH:mm)\n\
     - location: the location of the event\n\
     - description: description or additional details\n\
     \n\
     If a field is not present in the text, return null for that field.\n\
     \n\
     IMPORTANT: Your answer must contain ONLY the JSON object, with no additional text.\n\
     Example of a valid response:\n\
     { \"title\": \"Meeting\", \"startDate\": \"2025-03-22\", \"startTime\": \"09:30\", \"location\": \"Head office\", \"description\": \"Bring documents\" }";

/// Turns free-form text into an [`EventRecord`] through a completion backend.
pub struct EventExtractor {
    openai: Arc<dyn OpenAIClient>,
    default_api_key: Option<String>,
}

impl EventExtractor {
    pub fn new(openai: Arc<dyn OpenAIClient>, default_api_key: Option<String>) -> Self {
        Self {
            openai,
            default_api_key: normalize(default_api_key.as_deref()),
        }
    }

    pub async fn extract(
        &self,
        text: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<EventRecord, ExtractError> {
        let text = text
            .filter(|t| !t.trim().is_empty())
            .ok_or(ExtractError::MissingInput)?;

        let api_key = normalize(api_key)
            .or_else(|| self.default_api_key.clone())
            .ok_or(ExtractError::MissingCredential)?;

        let reply = self.openai.complete(EXTRACTION_PROMPT, text, &api_key).await?;
        let record = parse_reply(&reply)?;
        info!(
            has_title = record.title.is_some(),
            has_date = record.start_date.is_some(),
            has_time = record.start_time.is_some(),
            "event extracted"
        );
        Ok(record)
    }
}

/// Reads the model's reply as an event record.
///
/// The trimmed reply is parsed directly first. When the model wraps the
/// object in prose or code fences, the slice from the first `{` to the last
/// `}` is tried instead.
pub fn parse_reply(reply: &str) -> Result<EventRecord, ExtractError> {
    let trimmed = reply.trim();
    if let Some(record) = parse_object(trimmed) {
        return Ok(record);
    }

    warn!(reply = %reply, "reply is not a bare JSON object, attempting recovery");
    if let Some(record) = braced_slice(trimmed).and_then(parse_object) {
        return Ok(record);
    }

    warn!(reply = %reply, "could not recover a JSON object from reply");
    Err(ExtractError::ExtractionParse {
        reply: reply.to_string(),
    })
}

fn parse_object(candidate: &str) -> Option<EventRecord> {
    let value: serde_json::Value = serde_json::from_str(candidate).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn braced_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
