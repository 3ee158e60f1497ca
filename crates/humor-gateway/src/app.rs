//! Router, shared state and form handlers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, Form, Query, State},
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use humor_core::config::{DEFAULT_CREDENTIAL_ENV_VAR, DEFAULT_SESSION_IDLE_SECS};
use humor_core::{
    failure_notice, mask_credential, resolve_credential, HumorLevel, InterpretError,
    InterpretationRecord, InterpretationRequest, InterpretationStyle, Interpreter, Notice,
    RECENT_LIMIT,
};
use serde::Deserialize;

use crate::render::{self, PageView};
use crate::session::{session_cookie, session_id, Session, SessionRegistry};

pub struct AppState {
    pub interpreter: Interpreter,
    pub sessions: SessionRegistry,
    /// Fallback credential read from the environment once at startup.
    pub env_credential: Option<String>,
    /// Name of the variable `env_credential` came from; shown in the key guidance.
    pub credential_env_var: String,
}

impl AppState {
    pub fn new(interpreter: Interpreter, env_credential: Option<String>) -> Self {
        Self {
            interpreter,
            sessions: SessionRegistry::new(Duration::from_secs(DEFAULT_SESSION_IDLE_SECS)),
            env_credential,
            credential_env_var: DEFAULT_CREDENTIAL_ENV_VAR.to_string(),
        }
    }

    pub fn with_session_idle(mut self, idle_ttl: Duration) -> Self {
        self.sessions = SessionRegistry::new(idle_ttl);
        self
    }

    pub fn with_credential_env_var(mut self, name: impl Into<String>) -> Self {
        self.credential_env_var = name.into();
        self
    }

    fn credential_for(&self, session: &Session) -> Option<String> {
        resolve_credential(session.credential.as_deref(), self.env_credential.as_deref())
    }
}

#[derive(Deserialize, Default)]
pub struct IndexQuery {
    #[serde(default)]
    word: Option<String>,
}

#[derive(Deserialize)]
pub struct CredentialForm {
    #[serde(default)]
    api_key: String,
}

#[derive(Deserialize)]
pub struct InterpretForm {
    #[serde(default)]
    word: String,
    #[serde(default)]
    humor_level: String,
    #[serde(default)]
    style: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/credential", post(save_credential))
        .route("/interpret", post(interpret))
        .route("/history/clear", post(clear_history))
        .route("/session/reset", post(reset_session))
        .route("/api/history", get(history_json))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_request))
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    tracing::info!(method = %request.method(), path = %request.uri().path(), %peer, "request");
    next.run(request).await
}

async fn health() -> &'static str {
    "OK"
}

/// Attach the session cookie to any response.
fn with_session(id: &str, response: impl IntoResponse) -> Response {
    ([(header::SET_COOKIE, session_cookie(id))], response).into_response()
}

/// Page view for `session` with the shared parts filled in.
fn base_view(state: &AppState, session: &Session) -> PageView {
    PageView {
        gated: state.credential_for(session).is_none(),
        credential_env_var: state.credential_env_var.clone(),
        stored_credential: session.credential.as_deref().map(mask_credential),
        history: recent_history(session),
        ..Default::default()
    }
}

fn recent_history(session: &Session) -> Vec<InterpretationRecord> {
    session
        .history
        .recent(RECENT_LIMIT)
        .into_iter()
        .cloned()
        .collect()
}

/// GET /: `?word=` pre-fills the word field (example buttons use this).
async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<IndexQuery>,
) -> Response {
    let (id, handle) = state.sessions.get_or_create(session_id(&headers).as_deref());
    let session = handle.lock().await;
    let view = PageView {
        word: query.word.unwrap_or_default(),
        ..base_view(&state, &session)
    };
    with_session(&id, Html(render::page(&view)))
}

/// POST /credential: store the sidebar key for this session. Blank clears it.
async fn save_credential(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<CredentialForm>,
) -> Response {
    let (id, handle) = state.sessions.get_or_create(session_id(&headers).as_deref());
    let mut session = handle.lock().await;
    let key = form.api_key.trim();
    if key.is_empty() {
        session.credential = None;
        tracing::info!(session = %id, "sidebar credential cleared");
    } else {
        tracing::info!(session = %id, credential = %mask_credential(key), "sidebar credential set");
        session.credential = Some(key.to_string());
    }
    with_session(&id, Redirect::to("/"))
}

/// POST /interpret: one submission. Errors become notices; the page always renders.
async fn interpret(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<InterpretForm>,
) -> Response {
    let (id, handle) = state.sessions.get_or_create(session_id(&headers).as_deref());
    let mut session = handle.lock().await;

    let humor_level = form.humor_level.parse::<HumorLevel>();
    let style = form.style.parse::<InterpretationStyle>();

    let outcome = match (humor_level.clone(), style.clone()) {
        (Ok(level), Ok(style)) => match InterpretationRequest::new(&form.word, level, style) {
            Ok(request) => {
                let credential = state.credential_for(&session);
                state
                    .interpreter
                    .interpret(credential.as_deref(), &request, &mut session.history)
                    .await
            }
            Err(e) => Err(e),
        },
        (Err(e), _) | (_, Err(e)) => Err(e),
    };

    let (result, notice) = match outcome {
        Ok(record) => (Some(record), None),
        Err(e) => {
            if !matches!(e, InterpretError::EmptyWord) {
                tracing::warn!(session = %id, error = %e, "interpretation failed");
            }
            (None, Some(failure_notice(&e, &state.credential_env_var)))
        }
    };

    let view = PageView {
        word: form.word.trim().to_string(),
        humor_level: humor_level.unwrap_or_default(),
        style: style.unwrap_or_default(),
        result,
        notice,
        ..base_view(&state, &session)
    };
    with_session(&id, Html(render::page(&view)))
}

/// POST /history/clear
async fn clear_history(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, handle) = state.sessions.get_or_create(session_id(&headers).as_deref());
    let mut session = handle.lock().await;
    session.history.clear();
    tracing::info!(session = %id, "history cleared");
    let view = PageView {
        notice: Some(Notice::success("히스토리가 초기화되었습니다!")),
        ..base_view(&state, &session)
    };
    with_session(&id, Html(render::page(&view)))
}

/// POST /session/reset: end the session and start a fresh one.
async fn reset_session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(old) = session_id(&headers) {
        state.sessions.end(&old);
    }
    let (id, _) = state.sessions.get_or_create(None);
    tracing::debug!(active = state.sessions.len(), "session reset");
    with_session(&id, Redirect::to("/"))
}

/// GET /api/history: the displayed entries as JSON, most recent first. Read-only: without a
/// live session cookie the answer is `[]` and no session is started.
async fn history_json(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<Vec<InterpretationRecord>> {
    let Some(handle) = session_id(&headers).and_then(|id| state.sessions.get(&id)) else {
        return Json(Vec::new());
    };
    let session = handle.lock().await;
    Json(recent_history(&session))
}
