use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "userMessage")]
    pub user_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub assistant: Box<str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    pub status: Box<str>,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok".into() }
    }
}
