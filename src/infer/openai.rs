use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{CompletionClient, CompletionRequest, CompletionResponse, UpstreamError};
use crate::config::UpstreamConfig;

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            UpstreamError::Request(err.to_string().into())
        } else {
            UpstreamError::Transport(err.to_string().into())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Malformed(err.to_string().into())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorField,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OpenAIErrorField {
    Detailed { message: Box<str> },
    Plain(Box<str>),
}

impl From<OpenAIErrorField> for Box<str> {
    fn from(field: OpenAIErrorField) -> Self {
        match field {
            OpenAIErrorField::Detailed { message } => message,
            OpenAIErrorField::Plain(message) => message,
        }
    }
}

fn error_message(status: StatusCode, body: &str) -> Box<str> {
    if let Ok(error_response) = serde_json::from_str::<OpenAIError>(body) {
        return error_response.error.into();
    }

    let body = body.trim();
    if body.is_empty() {
        status.to_string().into()
    } else {
        body.into()
    }
}

/// `CompletionClient` talking to an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: Box<str>,
    api_key: Box<str>,
}

impl OpenAiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited(error_message(status, &response_text)));
        }

        if !status.is_success() {
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: error_message(status, &response_text),
            });
        }

        // Some compatible servers answer 200 with an error envelope
        if let Ok(error_response) = serde_json::from_str::<OpenAIError>(&response_text) {
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: error_response.error.into(),
            });
        }

        Ok(serde_json::from_str(&response_text)?)
    }
}
