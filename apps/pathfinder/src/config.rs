use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::profile::SavePolicy;

pub const DEFAULT_API_BASE: &str = "https://eduguide-tdl3.onrender.com";
pub const DEFAULT_SESSION_FILE: &str = ".pathfinder/session.json";

/// Client configuration loaded from environment variables. Every value has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub session_file: PathBuf,
    pub save_policy: SavePolicy,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            api_base: get("PATHFINDER_API_BASE", DEFAULT_API_BASE),
            session_file: PathBuf::from(get("PATHFINDER_SESSION_FILE", DEFAULT_SESSION_FILE)),
            save_policy: get("PATHFINDER_SAVE_POLICY", "section")
                .parse::<SavePolicy>()
                .context("PATHFINDER_SAVE_POLICY must be 'section' or 'merge'")?,
            search_debounce: Duration::from_millis(
                get("SEARCH_DEBOUNCE_MS", "220")
                    .parse::<u64>()
                    .context("SEARCH_DEBOUNCE_MS must be a whole number of milliseconds")?,
            ),
            request_timeout: Duration::from_secs(
                get("REQUEST_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            rust_log: get("RUST_LOG", "info"),
        })
    }
}
