//! Configuration module for Styre.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{GeneralSettings, JiraSettings, ServerSettings, Settings};
