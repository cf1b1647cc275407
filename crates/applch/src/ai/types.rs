//! Wire types for the chat-completion API.

use serde::{Deserialize, Serialize};

/// One user message made of a prompt and optional attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn user(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content: parts,
        }
    }

    /// Attachments carried alongside the text prompt.
    pub fn attachments(&self) -> impl Iterator<Item = &ContentPart> {
        self.content
            .iter()
            .filter(|part| !matches!(part, ContentPart::Text { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    /// Inline image as a `data:` URI.
    ImageUrl { image_url: UrlContent },
    /// Document bytes as bare base64, named by `file_name`.
    FileUrl {
        file_url: UrlContent,
        file_name: String,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlContent {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Fast,
    Pro,
}

impl SearchMode {
    pub fn from_pro_flag(pro: bool) -> Self {
        if pro {
            Self::Pro
        } else {
            Self::Fast
        }
    }
}

/// Everything needed for a single completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    pub search_mode: SearchMode,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionBody<'a> {
    pub(crate) model: &'a str,
    pub(crate) messages: &'a [ChatMessage],
    pub(crate) web_search_options: WebSearchOptions,
}

#[derive(Debug, Serialize)]
pub(crate) struct WebSearchOptions {
    pub(crate) search_type: SearchMode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub(crate) choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub(crate) message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyMessage {
    pub(crate) content: Option<ReplyContent>,
}

/// Replies arrive either as a plain string or as a list of typed chunks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ReplyContent {
    Text(String),
    Chunks(Vec<ReplyChunk>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyChunk {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) text: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice; chunked replies keep only text chunks,
    /// joined by newlines.
    pub(crate) fn into_text(self) -> String {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        match content {
            Some(ReplyContent::Text(text)) => text,
            Some(ReplyContent::Chunks(chunks)) => chunks
                .into_iter()
                .filter(|chunk| chunk.kind == "text")
                .filter_map(|chunk| chunk.text)
                .collect::<Vec<_>>()
                .join("\n"),
            None => String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub(crate) message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_parts_serialize_with_type_tags() {
        let message = ChatMessage::user(vec![
            ContentPart::text("hello"),
            ContentPart::ImageUrl {
                image_url: UrlContent {
                    url: "data:image/png;base64,AA==".to_string(),
                },
            },
            ContentPart::FileUrl {
                file_url: UrlContent {
                    url: "JVBERg==".to_string(),
                },
                file_name: "cv.pdf".to_string(),
            },
        ]);

        let value = serde_json::to_value(&message).expect("serializes");

        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "hello"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AA=="}},
                    {"type": "file_url", "file_url": {"url": "JVBERg=="}, "file_name": "cv.pdf"}
                ]
            })
        );
        assert_eq!(message.attachments().count(), 2);
    }

    #[test]
    fn string_reply_is_returned_verbatim() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "# Report"}}]
        }))
        .expect("parses");
        assert_eq!(response.into_text(), "# Report");
    }

    #[test]
    fn chunked_reply_joins_text_segments() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": [
                {"type": "text", "text": "part one"},
                {"type": "image_url", "image_url": {"url": "x"}},
                {"type": "text", "text": "part two"}
            ]}}]
        }))
        .expect("parses");
        assert_eq!(response.into_text(), "part one\npart two");
    }

    #[test]
    fn missing_choices_yield_empty_text() {
        let response: CompletionResponse =
            serde_json::from_value(json!({ "id": "abc" })).expect("parses");
        assert_eq!(response.into_text(), "");
    }
}
