//! Route handlers

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use colloquy_core::{DialogueStatus, LearnOutcome, OutcomeStatus};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct AskBothRequest {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct LearnRequest {
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub phrase: String,
}

#[derive(Debug, Serialize)]
pub struct LearnResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub outcome: LearnOutcome,
    pub message: String,
}

impl AppState {
    fn speaker_or_default<'a>(&'a self, speaker: &'a Option<String>) -> &'a str {
        speaker
            .as_deref()
            .unwrap_or_else(|| self.engine.agents().first().id().name())
    }
}

/// POST /ask
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> ApiResult<Json<Value>> {
    let speaker = state.speaker_or_default(&req.speaker);
    let reply = state.engine.ask(speaker, &req.input).await?;

    Ok(Json(json!({
        "ok": reply.matched,
        "matched": reply.matched,
        "response": reply.answer,
    })))
}

/// POST /askBoth
pub async fn ask_both(
    State(state): State<AppState>,
    Json(req): Json<AskBothRequest>,
) -> ApiResult<Json<Value>> {
    let reply = state.engine.ask_both(&req.input).await?;

    // Keyed by lowercase agent key.
    let response: Map<String, Value> = reply
        .replies
        .into_iter()
        .zip(state.engine.agents().all())
        .map(|((_, text), agent)| (agent.id().key().to_string(), Value::String(text)))
        .collect();

    Ok(Json(json!({
        "ok": true,
        "matched": reply.matched,
        "response": response,
    })))
}

/// GET /brain/:agent
pub async fn brain_line(
    State(state): State<AppState>,
    Path(agent): Path<String>,
) -> ApiResult<Json<Value>> {
    let speaker = state.engine.agent(&agent)?;
    let line = state.engine.lookup_brain_line(&agent).await?;

    Ok(Json(json!({
        "ok": true,
        "speaker": speaker.id().name(),
        "line": line,
    })))
}

/// POST /learn
pub async fn learn(
    State(state): State<AppState>,
    Json(req): Json<LearnRequest>,
) -> ApiResult<(StatusCode, Json<LearnResponse>)> {
    let speaker = state.speaker_or_default(&req.speaker);
    let outcome = state.engine.learn(speaker, &req.phrase).await?;

    let (status, ok) = match outcome.status() {
        OutcomeStatus::Success => (StatusCode::OK, true),
        OutcomeStatus::NoEffect => (StatusCode::ACCEPTED, true),
        OutcomeStatus::Rejected => (StatusCode::BAD_REQUEST, false),
        OutcomeStatus::Failure => (StatusCode::INTERNAL_SERVER_ERROR, false),
    };
    let message = outcome.reason();

    Ok((status, Json(LearnResponse { ok, outcome, message })))
}

/// POST /start
pub async fn start(State(state): State<AppState>) -> Json<Value> {
    let started = state.engine.start_dialogue().await;
    Json(json!({ "ok": true, "started": started }))
}

/// POST /stop
pub async fn stop(State(state): State<AppState>) -> Json<Value> {
    let stopped = state.engine.stop_dialogue().await;
    Json(json!({ "ok": true, "stopped": stopped }))
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<DialogueStatus> {
    Json(state.engine.dialogue_status().await)
}

/// GET /events
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let subscription = state.engine.subscribe();
    tracing::debug!(listener = %subscription.id(), "SSE client connected");

    Sse::new(subscription.map(|turn| Event::default().json_data(turn)))
        .keep_alive(KeepAlive::default())
}
