use std::{env, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

/// Review-status API endpoint used when `ENDPOINT` is not set.
pub const DEFAULT_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Typed configuration, constructed once at startup and shared by reference.
///
/// Missing any of the three credentials is the only fatal error in the
/// program: `load` fails and the polling loop is never entered.
#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub practicum_token: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: ChatId,

    // Runtime constants
    pub endpoint: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Load from an arbitrary lookup. `load` reads the process environment;
    /// tests inject a map.
    pub fn load_with(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let practicum_token = required(&get, "PRACTICUM_TOKEN")?;
        let telegram_bot_token = required(&get, "TELEGRAM_TOKEN")?;

        let chat_raw = required(&get, "TELEGRAM_CHAT_ID")?;
        let telegram_chat_id = chat_raw
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| {
                Error::Config(format!(
                    "TELEGRAM_CHAT_ID must be a numeric chat id, got {chat_raw:?}"
                ))
            })?;

        let endpoint = get("ENDPOINT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let poll_interval =
            Duration::from_secs(env_u64(&get, "POLL_INTERVAL_SECS").unwrap_or(600));
        let request_timeout =
            Duration::from_secs(env_u64(&get, "REQUEST_TIMEOUT_SECS").unwrap_or(30));

        Ok(Self {
            practicum_token,
            telegram_bot_token,
            telegram_chat_id,
            endpoint,
            poll_interval,
            request_timeout,
        })
    }
}

fn required(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    get(key)
        .and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn env_u64(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    get(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
