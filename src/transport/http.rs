//! The streamable HTTP endpoint.
//!
//! One logical `/mcp` endpoint with three request shapes plus a health
//! probe:
//!
//! - `POST /mcp` with `method: "initialize"` creates a session and
//!   returns its id in the `Mcp-Session-Id` response header.
//! - `POST /mcp` with an `Mcp-Session-Id` header dispatches a request
//!   on an existing session.
//! - `GET /mcp` attaches the session's server-sent event stream: an
//!   initial `connected` event, then periodic keepalive comments.
//! - `DELETE /mcp` terminates the session.
//! - `GET /health` reports status and the active session count.
//!
//! Origin validation runs before everything else; translation of
//! lifecycle outcomes into status codes is the only logic here.

use super::manager::SessionManager;
use super::origin::origin_allowed;
use super::session::StreamGuard;
use crate::config::Settings;
use crate::error::StyreError;
use crate::mcp::protocol::JsonRpcRequest;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Session id header exchanged on every session-scoped request.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Interval between keepalive comments on an attached stream.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Shared endpoint state.
#[derive(Clone)]
struct AppState {
    manager: Arc<SessionManager>,
    allowed_origins: Arc<Vec<String>>,
}

/// Build the transport router.
pub fn router(manager: Arc<SessionManager>, allowed_origins: Vec<String>) -> Router {
    let state = AppState {
        manager,
        allowed_origins: Arc::new(allowed_origins),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/mcp",
            post(handle_post).get(handle_get).delete(handle_delete),
        )
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            validate_origin,
        ))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve the transport until shutdown.
pub async fn serve(manager: Arc<SessionManager>, settings: &Settings) -> crate::error::Result<()> {
    let app = router(manager, settings.server.allowed_origins());
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(addr = %addr, "MCP HTTP transport listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Reject disallowed origins before any session logic runs.
async fn validate_origin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    if !origin_allowed(origin, &state.allowed_origins) {
        let e = StyreError::InvalidOrigin(origin.unwrap_or("<missing>").to_string());
        warn!("{}", e);
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Invalid origin"})),
        )
            .into_response();
    }

    next.run(request).await
}

/// POST /mcp - initialize a session or dispatch on an existing one.
async fn handle_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    if request.method == "initialize" {
        return match state.manager.initialize(request).await {
            Ok((session_id, response)) => {
                ([(SESSION_HEADER, session_id)], Json(response)).into_response()
            }
            Err(e) => internal_error(e),
        };
    }

    let Some(session_id) = session_header(&headers) else {
        return bad_request("Invalid or missing session ID");
    };

    match state.manager.dispatch(&session_id, request).await {
        Ok(response) => Json(response).into_response(),
        Err(StyreError::UnknownSession(_)) => bad_request("Invalid or missing session ID"),
        Err(e) => internal_error(e),
    }
}

/// GET /mcp - attach the session's notification stream.
async fn handle_get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session_id) = session_header(&headers) else {
        return bad_request("Invalid or missing session ID");
    };

    let guard = match state.manager.attach_stream(&session_id) {
        Ok(guard) => guard,
        Err(StyreError::UnknownSession(_)) => {
            return bad_request("Invalid or missing session ID");
        }
        Err(StyreError::StreamAttached(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "A notification stream is already attached"})),
            )
                .into_response();
        }
        Err(e) => return internal_error(e),
    };

    Sse::new(session_events(session_id, guard)).into_response()
}

/// The per-connection event stream: one `connected` event, then a
/// keepalive comment every [`KEEPALIVE_INTERVAL`] for as long as the
/// connection stays open. The guard rides in the stream state, so
/// closing the connection drops the timer and frees the stream slot
/// together - the timer can never outlive its stream.
fn session_events(
    session_id: String,
    guard: StreamGuard,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    let connected = Event::default().event("connected").data(
        json!({"type": "connected", "sessionId": session_id}).to_string(),
    );

    let ticks = interval_at(Instant::now() + KEEPALIVE_INTERVAL, KEEPALIVE_INTERVAL);
    let keepalives = stream::unfold((ticks, guard), |(mut ticks, guard)| async move {
        ticks.tick().await;
        Some((Ok(Event::default().comment("keepalive")), (ticks, guard)))
    });

    stream::once(async move { Ok(connected) }).chain(keepalives)
}

/// DELETE /mcp - terminate a session.
async fn handle_delete(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session_id) = session_header(&headers) else {
        return not_found();
    };

    match state.manager.terminate(&session_id) {
        Ok(()) => Json(json!({"success": true, "message": "Session terminated"})).into_response(),
        Err(_) => not_found(),
    }
}

/// GET /health - status probe.
async fn health(State(state): State<AppState>) -> Response {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "activeSessions": state.manager.active_sessions(),
    }))
    .into_response()
}

fn session_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Session not found"})),
    )
        .into_response()
}

fn internal_error(e: StyreError) -> Response {
    tracing::error!("Request handling failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Internal server error"})),
    )
        .into_response()
}
