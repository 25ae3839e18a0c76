use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod openai;

pub use openai::OpenAiClient;

pub const ROLE_USER: &str = "user";

pub const MODEL: &str = "chatgpt-4o-latest";
pub const MAX_TOKENS: u32 = 4096;
pub const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Box<str>,
    pub content: Box<str>,
}

/// Body of a `chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: Box<str>,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub stream: bool,
}

impl CompletionRequest {
    /// A single user turn with the gateway's fixed sampling parameters.
    pub fn user_turn(content: &str) -> Self {
        Self {
            model: MODEL.into(),
            messages: vec![Message {
                role: ROLE_USER.into(),
                content: content.into(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            stream: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<Box<str>>,
    /// Null when the model produced no text (e.g. a refusal or tool call).
    #[serde(default)]
    pub content: Option<Box<str>>,
}

#[cfg(test)]
impl CompletionResponse {
    pub fn from_contents<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        Self {
            choices: contents
                .into_iter()
                .map(|content| Choice {
                    message: ResponseMessage {
                        role: Some("assistant".into()),
                        content: Some(content.into()),
                    },
                })
                .collect(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("Request failed: {0}")]
    Transport(Box<str>),

    #[error("Rate limited: {0}")]
    RateLimited(Box<str>),

    #[error("Error response from API ({status}): {message}")]
    Api { status: u16, message: Box<str> },

    #[error("Response parsing failed: {0}")]
    Malformed(Box<str>),

    #[error("Request could not be built: {0}")]
    Request(Box<str>),
}

impl UpstreamError {
    /// The upstream's own description of the failure, without our prefix.
    pub fn detail(&self) -> Box<str> {
        match self {
            UpstreamError::Transport(message)
            | UpstreamError::RateLimited(message)
            | UpstreamError::Api { message, .. }
            | UpstreamError::Malformed(message)
            | UpstreamError::Request(message) => message.clone(),
        }
    }
}

/// Something that turns a completion request into candidate replies.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError>;
}
