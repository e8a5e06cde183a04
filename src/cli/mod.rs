//! CLI module for Styre.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Styre - MCP Server for Project Management
///
/// A local-first MCP server that gives AI assistants access to the
/// filesystem and Jira. The name "Styre" comes from the Norwegian word
/// for "steer" or "manage."
#[derive(Parser, Debug)]
#[command(name = "styre")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check configuration and Jira credentials
    Doctor,

    /// Start the streamable HTTP transport (sessions, SSE keepalive)
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start the MCP server on stdio for AI assistant integration (Claude, etc.)
    Mcp,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
