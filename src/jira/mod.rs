//! Jira integration for Styre.

mod client;

pub use client::JiraClient;
