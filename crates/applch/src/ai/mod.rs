//! Adapter for the external chat-completion service.
//!
//! Orchestrators depend on the [`ChatCompletion`] trait rather than a concrete
//! client, so a run can be driven by [`PerplexityClient`] in production and by
//! an in-memory fake in tests.

mod client;
pub mod types;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::documents::{mime_type, DocumentKind, SourceDocument};

pub use client::PerplexityClient;
pub use types::{ChatMessage, ChatRequest, ContentPart, SearchMode, UrlContent};

/// A service that turns one request into the assistant's reply text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, AiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("PERPLEXITY_API_KEY is not set; add it to .env")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unable to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Attachment part for a document. Text documents are inlined into the
/// prompt instead and produce no part.
pub fn attachment_for(document: &SourceDocument) -> Option<ContentPart> {
    match document.kind {
        DocumentKind::Image => {
            let encoded = STANDARD.encode(&document.data);
            Some(ContentPart::ImageUrl {
                image_url: UrlContent {
                    url: format!("data:{};base64,{}", mime_type(&document.name), encoded),
                },
            })
        }
        DocumentKind::Pdf => Some(ContentPart::FileUrl {
            file_url: UrlContent {
                url: STANDARD.encode(&document.data),
            },
            file_name: document.name.clone(),
        }),
        DocumentKind::Text => None,
    }
}
