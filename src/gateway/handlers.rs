use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::dto::{ChatRequest, ChatResponse, HealthResponse};
use crate::{
    infer::{CompletionClient, CompletionRequest},
    service,
};

pub fn build_router(client: Arc<dyn CompletionClient>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // Log every request at the default filter level
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build router
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .layer(trace)
        .layer(cors)
        .with_state(client)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

pub async fn chat(
    State(client): State<Arc<dyn CompletionClient>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> service::Result<Json<ChatResponse>> {
    let Json(request) =
        payload.map_err(|rejection| service::Error::Validation(rejection.body_text().into()))?;

    complete_chat(client.as_ref(), &request.user_message)
        .await
        .map(Json)
}

/// Validates the message, asks upstream once and returns the first choice, trimmed.
pub async fn complete_chat(
    client: &dyn CompletionClient,
    user_message: &str,
) -> service::Result<ChatResponse> {
    let user_message = user_message.trim();
    if user_message.is_empty() {
        return Err(service::Error::Validation("Empty 'userMessage'.".into()));
    }

    let response = client
        .complete(CompletionRequest::user_turn(user_message))
        .await
        .map_err(|error| {
            tracing::error!("Upstream error: {}", error);
            service::Error::from(error)
        })?;

    let Some(choice) = response.choices.into_iter().next() else {
        tracing::warn!("Upstream returned no choices");
        return Err(service::Error::UpstreamContract(
            "No choices returned by OpenAI API.".into(),
        ));
    };

    let Some(content) = choice.message.content else {
        tracing::warn!("Upstream returned a choice without content");
        return Err(service::Error::UpstreamContract(
            "First choice returned by OpenAI API has no content.".into(),
        ));
    };

    Ok(ChatResponse {
        assistant: content.trim().into(),
    })
}
