//! Board configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Numeric values that fail to parse fall
//! back to their defaults; only the server URL is validated strictly.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::BoardError;

/// Default server endpoint.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:3000/ws";

/// Default notification lifetime in milliseconds.
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3_000;

/// Top-level board configuration.
///
/// Loaded once at startup via [`BoardConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// WebSocket endpoint of the event service (`ws://` or `wss://`).
    pub server_url: String,

    /// How long a notification stays in the feed.
    pub notification_ttl: Duration,

    /// Fixed delay between reconnect attempts. `None` disables reconnection.
    pub reconnect_delay: Option<Duration>,

    /// Capacity of the outbound command queue.
    pub command_buffer: usize,

    /// Capacity of the inbound client event queue.
    pub event_buffer: usize,

    /// Keyboard poll interval of the terminal UI.
    pub ui_tick: Duration,

    /// File the log lines are written to.
    pub log_file: PathBuf,

    /// Emit log lines as JSON.
    pub log_json: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            reconnect_delay: Some(Duration::from_millis(1_000)),
            command_buffer: 64,
            event_buffer: 256,
            ui_tick: Duration::from_millis(50),
            log_file: PathBuf::from("event-board.log"),
            log_json: false,
        }
    }
}

impl BoardConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidConfig`] if `EVENT_BOARD_URL` is set to
    /// something other than a `ws://` or `wss://` URL.
    pub fn from_env() -> Result<Self, BoardError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidConfig`] if the server URL is not a
    /// WebSocket URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server_url = lookup("EVENT_BOARD_URL").unwrap_or(defaults.server_url);
        validate_server_url(&server_url)?;

        let notification_ttl = Duration::from_millis(parse_or(
            &lookup,
            "NOTIFICATION_TTL_MS",
            DEFAULT_NOTIFICATION_TTL_MS,
        ));

        let reconnect_delay = match parse_or(&lookup, "RECONNECT_DELAY_MS", 1_000_u64) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        let command_buffer = parse_or(&lookup, "COMMAND_BUFFER", defaults.command_buffer).max(1);
        let event_buffer = parse_or(&lookup, "EVENT_BUFFER", defaults.event_buffer).max(1);
        let ui_tick = Duration::from_millis(parse_or(&lookup, "UI_TICK_MS", 50_u64).max(1));

        let log_file = lookup("LOG_FILE").map_or(defaults.log_file, PathBuf::from);
        let log_json = parse_bool_or(&lookup, "LOG_JSON", defaults.log_json);

        Ok(Self {
            server_url,
            notification_ttl,
            reconnect_delay,
            command_buffer,
            event_buffer,
            ui_tick,
            log_file,
            log_json,
        })
    }
}

fn validate_server_url(url: &str) -> Result<(), BoardError> {
    let rest = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
        .ok_or_else(|| BoardError::InvalidConfig {
            key: "EVENT_BOARD_URL",
            reason: format!("{url:?} is not a ws:// or wss:// URL"),
        })?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(BoardError::InvalidConfig {
            key: "EVENT_BOARD_URL",
            reason: format!("{url:?} has no host"),
        });
    }
    Ok(())
}

/// Parses a value as `T`, returning `default` on missing or invalid values.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<BoardConfig, BoardError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        BoardConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let Ok(config) = load(&[]) else {
            panic!("defaults must load");
        };
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.notification_ttl, Duration::from_secs(3));
    }

    #[test]
    fn overrides_are_applied() {
        let Ok(config) = load(&[
            ("EVENT_BOARD_URL", "wss://events.example.com/ws"),
            ("NOTIFICATION_TTL_MS", "500"),
            ("RECONNECT_DELAY_MS", "250"),
            ("LOG_JSON", "TRUE"),
            ("LOG_FILE", "/tmp/board.log"),
        ]) else {
            panic!("overrides must load");
        };
        assert_eq!(config.server_url, "wss://events.example.com/ws");
        assert_eq!(config.notification_ttl, Duration::from_millis(500));
        assert_eq!(config.reconnect_delay, Some(Duration::from_millis(250)));
        assert!(config.log_json);
        assert_eq!(config.log_file, PathBuf::from("/tmp/board.log"));
    }

    #[test]
    fn zero_reconnect_delay_disables_reconnection() {
        let Ok(config) = load(&[("RECONNECT_DELAY_MS", "0")]) else {
            panic!("config must load");
        };
        assert_eq!(config.reconnect_delay, None);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let Ok(config) = load(&[("COMMAND_BUFFER", "lots"), ("UI_TICK_MS", "-3")]) else {
            panic!("config must load");
        };
        assert_eq!(config.command_buffer, 64);
        assert_eq!(config.ui_tick, Duration::from_millis(50));
    }

    #[test]
    fn http_url_is_rejected() {
        let result = load(&[("EVENT_BOARD_URL", "https://events.example.com")]);
        assert!(matches!(
            result,
            Err(BoardError::InvalidConfig {
                key: "EVENT_BOARD_URL",
                ..
            })
        ));
    }

    #[test]
    fn url_without_host_is_rejected() {
        assert!(load(&[("EVENT_BOARD_URL", "ws:///ws")]).is_err());
    }
}
