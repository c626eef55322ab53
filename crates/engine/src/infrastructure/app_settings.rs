//! Engine runtime settings
//!
//! Read once at startup from the process environment (after `.env` files are
//! loaded). Every value has a default; a value that fails to parse falls back
//! to its default with a warning rather than aborting startup.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tablerelay_domain::MAX_SESSION_CODE_LENGTH;

/// Default listen port.
pub const DEFAULT_SERVER_PORT: u16 = 4134;

/// Buffer size for per-connection message channel.
pub const DEFAULT_CONNECTION_CHANNEL_BUFFER: usize = 256;

/// Characters per generated session code.
pub const DEFAULT_SESSION_CODE_LENGTH: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub server_host: String,
    pub server_port: u16,
    pub connection_channel_buffer: usize,
    pub session_code_length: usize,
    /// Promote a remaining member when the DM leaves. When off, the DM slot
    /// stays vacant until a member claims it.
    pub auto_reassign_dm: bool,
    /// `*` or a comma separated origin list; `None` disables CORS handling.
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: DEFAULT_SERVER_PORT,
            connection_channel_buffer: DEFAULT_CONNECTION_CHANNEL_BUFFER,
            session_code_length: DEFAULT_SESSION_CODE_LENGTH,
            auto_reassign_dm: true,
            cors_allowed_origins: None,
        }
    }
}

impl EngineSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let server_host = get("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = parse_or(
            "SERVER_PORT",
            get("SERVER_PORT").or_else(|| get("PORT")),
            defaults.server_port,
        );
        let connection_channel_buffer = parse_or(
            "CONNECTION_CHANNEL_BUFFER",
            get("CONNECTION_CHANNEL_BUFFER"),
            defaults.connection_channel_buffer,
        )
        .max(1);
        let session_code_length = parse_or(
            "SESSION_CODE_LENGTH",
            get("SESSION_CODE_LENGTH"),
            defaults.session_code_length,
        )
        .clamp(1, MAX_SESSION_CODE_LENGTH);
        let auto_reassign_dm = match get("AUTO_REASSIGN_DM") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Invalid AUTO_REASSIGN_DM, using default");
                defaults.auto_reassign_dm
            }),
            None => defaults.auto_reassign_dm,
        };

        Self {
            server_host,
            server_port,
            connection_channel_buffer,
            session_code_length,
            auto_reassign_dm,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        }
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy,
    T::Err: Display,
{
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!(key, value = %raw, error = %e, "Invalid setting, using default");
            default
        }),
        None => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
