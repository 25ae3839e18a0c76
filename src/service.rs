use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::infer::UpstreamError;

/// Every way a gateway request can fail, as seen by the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(Box<str>),
    #[error("{0}")]
    UpstreamTransport(Box<str>),
    #[error("{0}")]
    UpstreamContract(Box<str>),
    #[error("{0}")]
    Unexpected(Box<str>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
            Error::UpstreamContract(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for Error {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::Transport(_)
            | UpstreamError::RateLimited(_)
            | UpstreamError::Api { .. } => Error::UpstreamTransport(error.detail()),
            UpstreamError::Malformed(_) | UpstreamError::Request(_) => {
                Error::Unexpected(error.detail())
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HttpErrorBody {
    pub detail: Box<str>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Error::Validation(detail)
            | Error::UpstreamTransport(detail)
            | Error::UpstreamContract(detail)
            | Error::Unexpected(detail) => detail,
        };

        (status, Json(HttpErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_kind_to_its_status() {
        assert_eq!(Error::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::UpstreamTransport("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            Error::UpstreamContract("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(Error::Unexpected("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn classifies_upstream_failures() {
        let rate_limited = Error::from(UpstreamError::RateLimited("Rate limit reached".into()));
        assert!(matches!(rate_limited, Error::UpstreamTransport(ref d) if &**d == "Rate limit reached"));

        let api = Error::from(UpstreamError::Api {
            status: 401,
            message: "Incorrect API key provided".into(),
        });
        assert!(matches!(api, Error::UpstreamTransport(ref d) if &**d == "Incorrect API key provided"));

        let malformed = Error::from(UpstreamError::Malformed("missing field `choices`".into()));
        assert!(matches!(malformed, Error::Unexpected(_)));
    }

    #[tokio::test]
    async fn renders_detail_body() {
        let response = Error::UpstreamTransport("upstream down".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "detail": "upstream down" }));
    }
}
