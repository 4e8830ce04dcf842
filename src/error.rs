use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("building http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("webhook url is not configured")]
    NoWebhook,
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned {status}")]
    Status { url: String, status: StatusCode },
    #[error("invalid url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("webhook request failed: {0}")]
    Webhook(#[source] reqwest::Error),
    #[error("webhook returned {status}: {body}")]
    Delivery { status: StatusCode, body: String },
    #[error("state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("state encoding: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
