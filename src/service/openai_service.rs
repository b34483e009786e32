use async_trait::async_trait;

use crate::clients::openai_client::{self, CompletionTarget};
use crate::config::Settings;
use crate::error::BackendError;

/// Text-in/text-out completion backend.
#[async_trait]
pub trait OpenAIClient: Send + Sync {
    async fn complete(
        &self,
        system_message: &str,
        user_message: &str,
        api_key: &str,
    ) -> Result<String, BackendError>;
}

pub struct OpenAIService {
    http: reqwest::Client,
    target: CompletionTarget,
}

impl OpenAIService {
    pub fn new(target: CompletionTarget) -> Self {
        Self {
            http: reqwest::Client::new(),
            target,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(CompletionTarget {
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl OpenAIClient for OpenAIService {
    async fn complete(
        &self,
        system_message: &str,
        user_message: &str,
        api_key: &str,
    ) -> Result<String, BackendError> {
        openai_client::query_openai(&self.http, &self.target, system_message, user_message, api_key)
            .await
    }
}
