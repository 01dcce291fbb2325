use crate::fetcher::{errors::FetchError, pipeline::process_response, types::PageResponse};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const MAX_REDIRECTS: usize = 10;
const USER_AGENT: &str = "hackerdigest/0.1 (+https://github.com/hackerdigest/hackerdigest)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A single-attempt GET. Anything other than a 2xx answer is an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static(
                        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    ),
                );
                headers
            })
            .build()
            .map_err(|e| FetchError::Client {
                reason: e.to_string(),
            })?;

        Ok(Self::with_client(client, timeout))
    }

    /// Use an already configured client; `timeout` still bounds every request.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        // Malformed URLs go straight to reqwest and surface as builder errors.
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest_error(url, e))?;

        if let Some(content_length) = response.content_length()
            && content_length > MAX_BODY_SIZE
        {
            return Err(FetchError::BodyTooLarge {
                url: url.to_string(),
                size: content_length,
            });
        }

        let final_url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            warn!(%status, "non-success status");
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        let body_bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest_error(url, e))?;

        // Content-Length may be missing or wrong
        if body_bytes.len() as u64 > MAX_BODY_SIZE {
            return Err(FetchError::BodyTooLarge {
                url: url.to_string(),
                size: body_bytes.len() as u64,
            });
        }

        debug!(
            %status,
            final_url = %final_url,
            size = body_bytes.len(),
            "fetched"
        );

        Ok(process_response(
            url,
            final_url,
            status,
            content_type,
            body_bytes,
        ))
    }
}
