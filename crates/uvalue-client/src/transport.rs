//! Bounded-timeout request execution and response decoding

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error as _;
use std::time::Duration;
use uvalue_core::error::{Result, UvalueError};

/// HTTP transport rooted at the API base
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base: String,
}

impl Transport {
    pub fn new(api_base: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let client = Client::builder().default_headers(headers).build().map_err(|e| {
            UvalueError::ConfigInvalid {
                key: "http_client".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            client,
            base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Parsed URL for an API path, for callers that add query pairs or segments
    pub fn parsed_url(&self, path: &str) -> Result<Url> {
        Url::parse(&self.url(path)).map_err(|e| UvalueError::ConfigInvalid {
            key: "api_base".to_string(),
            reason: format!("'{}' does not form a valid URL: {}", self.base, e),
        })
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn get_url(&self, url: Url) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        self.client.post(self.url(path)).json(body)
    }

    /// Send a request and read the whole body, all within `timeout`
    ///
    /// Non-2xx statuses become `HttpStatus` carrying the response body.
    pub async fn fetch_text(&self, request: RequestBuilder, timeout: Duration) -> Result<String> {
        let exchange = async {
            let response = request.send().await.map_err(|e| map_reqwest_error(e, timeout))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| map_reqwest_error(e, timeout))?;

            if !status.is_success() {
                return Err(UvalueError::HttpStatus { status: status.as_u16(), body });
            }
            Ok(body)
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(UvalueError::Timeout { after: timeout }),
        }
    }

    /// Send a request and decode a JSON body
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<T> {
        let body = self.fetch_text(request, timeout).await?;
        decode_json(&body)
    }

    /// Succeeds when `path` answers with any 2xx status
    pub async fn check(&self, path: &str, timeout: Duration) -> Result<()> {
        self.fetch_text(self.get(path), timeout).await.map(|_| ())
    }
}

pub fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| UvalueError::Decode {
        reason: format!("{} (body starts with {:?})", e, preview(body)),
    })
}

fn preview(body: &str) -> String {
    body.chars().take(80).collect()
}

fn map_reqwest_error(err: reqwest::Error, timeout: Duration) -> UvalueError {
    if err.is_timeout() {
        return UvalueError::Timeout { after: timeout };
    }
    if err.is_decode() {
        return UvalueError::Decode { reason: describe(&err) };
    }
    UvalueError::Network { reason: describe(&err) }
}

/// Error message including its source chain
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
