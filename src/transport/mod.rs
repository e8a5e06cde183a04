//! Session-oriented streamable HTTP transport.
//!
//! The stateful part of Styre. A client initializes a session over POST,
//! dispatches requests against it with the `Mcp-Session-Id` header,
//! optionally attaches one long-lived server-sent event stream for
//! liveness, and tears the session down with DELETE. All session state
//! lives in an in-memory [`SessionStore`] owned by the
//! [`SessionManager`]; nothing survives a restart.

mod http;
mod manager;
mod origin;
mod session;

pub use http::{router, serve, SESSION_HEADER};
pub use manager::SessionManager;
pub use origin::origin_allowed;
pub use session::{new_session_id, Session, SessionStore, StreamGuard};
