/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the polling
/// loop can handle failures consistently (fatal config vs transient cycle).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Transport-level failure: DNS, timeout, connection reset.
    #[error("connection failure: {0}")]
    Connection(String),

    /// The status API answered with a non-200 code.
    #[error("bad response status {status} {reason}: {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("unexpected response shape: {0}")]
    TypeMismatch(String),

    #[error("required key missing from response: {0}")]
    EmptyResponse(String),

    #[error("homework record is missing `{0}`")]
    MissingField(&'static str),

    #[error("unknown homework status {0:?}")]
    UnknownStatus(String),

    #[error("delivery failure: {0}")]
    Delivery(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
