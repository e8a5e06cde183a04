//! Styre - MCP Server for Project Management
//!
//! A local-first MCP (Model Context Protocol) server that gives AI assistants
//! access to the filesystem and Jira.
//!
//! The name "Styre" comes from the Norwegian word for "steer" or "manage."
//!
//! # Overview
//!
//! Styre allows an AI assistant to:
//! - List and read files in the local workspace
//! - Browse Jira boards and issues
//! - Create Jira issues
//! - Fetch prompts for writing well-formed issues
//!
//! It speaks JSON-RPC 2.0 over two transports: stdio (for local process
//! integration) and streamable HTTP with session management and
//! server-sent keepalive events.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `mcp` - Protocol types, tool/prompt definitions, and the dispatcher
//! - `files` - Filesystem tool handlers
//! - `jira` - Jira REST client
//! - `transport` - Session-oriented HTTP transport (the stateful part)
//!
//! # Example
//!
//! ```rust,no_run
//! use styre::config::Settings;
//! use styre::mcp::McpServer;
//! use styre::transport::{self, SessionManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let server = Arc::new(McpServer::new(settings.clone()));
//!     let manager = Arc::new(SessionManager::new(server));
//!     transport::serve(manager, &settings).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod jira;
pub mod mcp;
pub mod transport;

pub use error::{Result, StyreError};
