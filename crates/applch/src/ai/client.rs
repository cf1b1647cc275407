use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::types::{ApiErrorBody, ChatRequest, CompletionBody, CompletionResponse, WebSearchOptions};
use super::{AiError, ChatCompletion};
use crate::config::ApiConfig;

/// Perplexity chat-completions client. Built once per run and handed to the
/// orchestrators; it holds no state beyond the connection pool.
#[derive(Debug, Clone)]
pub struct PerplexityClient {
    http: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl PerplexityClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_http(Client::new(), config)
    }

    pub fn with_http(http: Client, config: &ApiConfig) -> Self {
        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        Self {
            http,
            api_key: config.api_key.clone(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatCompletion for PerplexityClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;

        let body = CompletionBody {
            model: &request.model,
            messages: &request.messages,
            web_search_options: WebSearchOptions {
                search_type: request.search_mode,
            },
        };

        debug!(model = %request.model, search = ?request.search_mode, "sending completion request");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let completion: CompletionResponse = serde_json::from_str(&raw)?;
        Ok(completion.into_text())
    }
}
