//! Session lifecycle controller.
//!
//! Orchestrates the initialize handshake, per-request dispatch, stream
//! attachment and termination. This is the only component that mutates
//! the session store; the dispatcher behind it owns method semantics.

use super::session::{new_session_id, Session, SessionStore, StreamGuard};
use crate::error::{Result, StyreError};
use crate::mcp::protocol::{InitializeParams, JsonRpcRequest, JsonRpcResponse};
use crate::mcp::Dispatcher;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-session lifecycle: created by `initialize`, referenced by
/// `dispatch`/`attach_stream`, gone after `terminate`. A terminated id
/// behaves exactly like one that never existed.
pub struct SessionManager {
    store: SessionStore,
    dispatcher: Arc<dyn Dispatcher>,
}

impl SessionManager {
    /// Create a manager with an empty session store.
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            store: SessionStore::new(),
            dispatcher,
        }
    }

    /// Handle first contact: mint a session and run the handshake.
    ///
    /// Exactly one session is created per successful call. The returned
    /// id travels back to the client out-of-band (response header).
    pub async fn initialize(&self, request: JsonRpcRequest) -> Result<(String, JsonRpcResponse)> {
        let client = request
            .params
            .as_ref()
            .and_then(|params| serde_json::from_value::<InitializeParams>(params.clone()).ok())
            .and_then(|params| params.client_info)
            .map(|info| format!("{} {}", info.name, info.version));

        let session_id = new_session_id();
        self.store.insert(Session::new(session_id.clone(), client))?;

        info!(session_id = %session_id, "Session created");

        let response = self.dispatcher.dispatch(request).await;
        Ok((session_id, response))
    }

    /// Forward a request on an existing session, relaying the
    /// dispatcher's response verbatim.
    pub async fn dispatch(
        &self,
        session_id: &str,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse> {
        if self.store.get(session_id).is_none() {
            return Err(StyreError::UnknownSession(session_id.to_string()));
        }

        debug!(session_id = %session_id, method = %request.method, "Dispatching request");
        Ok(self.dispatcher.dispatch(request).await)
    }

    /// Bind the session's one notification stream slot.
    ///
    /// A second attach while a stream is live is rejected; the slot
    /// frees when the returned guard drops (connection close).
    pub fn attach_stream(&self, session_id: &str) -> Result<StreamGuard> {
        self.store.try_attach_stream(session_id)?;
        debug!(session_id = %session_id, "Notification stream attached");
        Ok(StreamGuard::new(self.store.clone(), session_id.to_string()))
    }

    /// Terminate a session. Unknown ids are an error so callers can
    /// distinguish "already gone" from "actually closed".
    pub fn terminate(&self, session_id: &str) -> Result<()> {
        match self.store.remove(session_id) {
            Some(_) => {
                info!(session_id = %session_id, "Session terminated");
                Ok(())
            }
            None => Err(StyreError::UnknownSession(session_id.to_string())),
        }
    }

    /// Snapshot of a session's state.
    pub fn session(&self, session_id: &str) -> Option<Session> {
        self.store.get(session_id)
    }

    /// Number of active sessions.
    pub fn active_sessions(&self) -> usize {
        self.store.len()
    }
}
