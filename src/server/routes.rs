//! HTTP route handlers for the chess agent API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::chat::core::ids::SessionId;
use crate::chat::core::message::Message;
use crate::chat::orchestrator::TurnRoute;
use crate::chat::session::conversation::SessionStats;
use crate::chat::session::export::{export_file_name, export_transcript};

use super::state::{AppState, SharedSession};

type ApiError = (StatusCode, String);

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/messages", post(send_message))
        .route("/api/sessions/{id}/reset", post(reset_session))
        .route("/api/sessions/{id}/export", get(export_session))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chess-qa-agent",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.session_count(),
    }))
}

/// New session response.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    /// Identifier to use in later calls.
    pub session_id: SessionId,
    /// Seeded assistant greeting.
    pub greeting: String,
    /// Initial counters.
    pub stats: SessionStats,
}

async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (session_id, session) = state.create_session();
    let session = session.lock().await;
    let greeting = session
        .messages()
        .first()
        .map(|m| m.content().to_string())
        .unwrap_or_default();

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            greeting,
            stats: session.stats(),
        }),
    )
}

/// Chat message request.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// The user's message.
    pub message: String,
}

/// Chat message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Branch taken for the turn.
    pub route: TurnRoute,
    /// Branch result label.
    pub outcome: &'static str,
    /// The assistant's reply.
    pub response: String,
    /// Counters after the turn.
    pub stats: SessionStats,
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "message must not be empty".to_string()));
    }

    let session = lookup(&state, id)?;
    let mut session = session.lock().await;
    let reply = state.orchestrator.respond(&mut session, &request.message).await;

    Ok(Json(MessageResponse {
        route: reply.route,
        outcome: reply.outcome.as_str(),
        response: reply.text,
        stats: session.stats(),
    }))
}

/// Full session view.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// Session identifier.
    pub session_id: SessionId,
    /// Current counters.
    pub stats: SessionStats,
    /// Every stored message, oldest first.
    pub messages: Vec<Message>,
    /// Short per-message lines, seeded greeting excluded.
    pub history_preview: Vec<String>,
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let session = lookup(&state, id)?;
    let session = session.lock().await;

    Ok(Json(SessionView {
        session_id: id,
        stats: session.stats(),
        messages: session.messages().to_vec(),
        history_preview: session.history_preview(),
    }))
}

async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionStats>, ApiError> {
    let session = lookup(&state, id)?;
    let mut session = session.lock().await;
    session.reset();
    tracing::info!("Reset session {id}");
    Ok(Json(session.stats()))
}

async fn export_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<impl IntoResponse, ApiError> {
    let session = lookup(&state, id)?;
    let session = session.lock().await;

    if !session.has_conversation() {
        return Err((StatusCode::CONFLICT, "nothing to export yet".to_string()));
    }

    let body = export_transcript(&session, Local::now());
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export_file_name(&session)),
        ),
    ];

    Ok((headers, body))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn lookup(state: &AppState, id: SessionId) -> Result<SharedSession, ApiError> {
    state.session(id).ok_or_else(|| not_found(id))
}

fn not_found(id: SessionId) -> ApiError {
    (StatusCode::NOT_FOUND, format!("unknown session {id}"))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::chat::core::config::AgentConfig;
    use crate::chat::orchestrator::tests::ScriptedModel;
    use crate::llm::ChatModel;

    fn app() -> (Router, Arc<AppState>, Arc<ScriptedModel>) {
        let model = ScriptedModel::new(Vec::new());
        let dyn_model: Arc<dyn ChatModel> = model.clone();
        let state = AppState::with_model(dyn_model, &AgentConfig::default()).unwrap();
        (create_router(Arc::clone(&state)), state, model)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _, _) = app();
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_session_returns_greeting() {
        let (router, state, _) = app();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert!(json["greeting"].as_str().unwrap().contains("Chess Q&A Bot"));
        assert_eq!(json["stats"]["message_count"], 1);
        assert_eq!(state.session_count(), 1);
    }

    #[tokio::test]
    async fn test_message_flow_and_rejection() {
        let (router, state, model) = app();
        let (id, _) = state.create_session();

        let response = router
            .clone()
            .oneshot(post_json(
                &format!("/api/sessions/{id}/messages"),
                serde_json::json!({ "message": "What is the Queen's Gambit?" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["route"], "model");
        assert_eq!(json["outcome"], "answered");
        assert_eq!(json["response"], "Default answer.");
        assert_eq!(json["stats"]["question_count"], 1);

        let response = router
            .oneshot(post_json(
                &format!("/api/sessions/{id}/messages"),
                serde_json::json!({ "message": "Recommend a pasta recipe" }),
            ))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["route"], "rejected");
        assert_eq!(json["stats"]["question_count"], 1);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let (router, state, _) = app();
        let (id, _) = state.create_session();
        let response = router
            .oneshot(post_json(
                &format!("/api/sessions/{id}/messages"),
                serde_json::json!({ "message": "   " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (router, _, _) = app();
        let response = router
            .oneshot(post_json(
                &format!("/api/sessions/{}/reset", SessionId::new()),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_requires_conversation() {
        let (router, state, _) = app();
        let (id, session) = state.create_session();
        let uri = format!("/api/sessions/{id}/export");

        let response = router
            .clone()
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        {
            let mut guard = session.lock().await;
            state.orchestrator.respond(&mut guard, "I'm Magnus").await;
        }

        let response = router
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"chess_chat_Magnus.txt\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("# User: Magnus"));
        assert!(text.contains("2. [USER]\nI'm Magnus"));
    }

    #[tokio::test]
    async fn test_reset_and_delete() {
        let (router, state, _) = app();
        let (id, session) = state.create_session();
        {
            let mut guard = session.lock().await;
            state.orchestrator.respond(&mut guard, "My name is Alice").await;
        }

        let response = router
            .clone()
            .oneshot(post_json(&format!("/api/sessions/{id}/reset"), serde_json::json!({})))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["message_count"], 1);
        assert!(json["user_name"].is_null());

        let response = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.session_count(), 0);
    }
}
