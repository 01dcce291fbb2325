use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} timed out: {reason}")]
    Timeout { url: String, reason: String },

    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("too many redirects for {url}")]
    RedirectLoop { url: String },

    #[error("http error {status} for {url}")]
    Http {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("body of {url} too large ({size} bytes)")]
    BodyTooLarge { url: String, size: u64 },

    #[error("io error reading {url}: {reason}")]
    Io { url: String, reason: String },

    #[error("request to {url} failed: {reason}")]
    Unknown { url: String, reason: String },

    #[error("failed to build http client: {reason}")]
    Client { reason: String },
}

impl FetchError {
    /// The URL the failed request was issued for; `None` when no request was made.
    pub fn url(&self) -> Option<&str> {
        let url = match self {
            Self::InvalidUrl { url, .. }
            | Self::Timeout { url, .. }
            | Self::Connect { url, .. }
            | Self::RedirectLoop { url }
            | Self::Http { url, .. }
            | Self::BodyTooLarge { url, .. }
            | Self::Io { url, .. }
            | Self::Unknown { url, .. } => url,
            Self::Client { .. } => return None,
        };
        Some(url)
    }

    pub fn from_reqwest_error(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        let reason = err.to_string();

        if err.is_builder() {
            Self::InvalidUrl { url, reason }
        } else if err.is_timeout() {
            Self::Timeout { url, reason }
        } else if err.is_redirect() {
            Self::RedirectLoop { url }
        } else if let Some(status) = err.status() {
            Self::Http { url, status }
        } else if err.is_connect() || err.is_request() {
            // DNS, refused connections, TLS handshakes
            Self::Connect { url, reason }
        } else if err.is_body() || err.is_decode() {
            Self::Io { url, reason }
        } else {
            Self::Unknown { url, reason }
        }
    }
}
