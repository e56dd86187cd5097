//! HTTP transport for invoke calls

use super::headers::HeaderList;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body and drop non-printable characters before logging
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Sends one JSON POST and returns the decoded JSON reply.
///
/// Implementations report network failures and unparseable bodies as errors.
/// A non-2xx status with a JSON body is still a reply: the server uses it to
/// carry `ok: false` envelopes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, headers: &HeaderList, body: &Value) -> Result<Value>;
}

/// reqwest-backed [`Transport`]
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("resource-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Reuse an existing reqwest client (connection pool, proxies, timeouts)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, headers: &HeaderList, body: &Value) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .body(serde_json::to_vec(body).context("Failed to encode request body")?)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("Invoke returned {} - {}", status, sanitize_for_log(&text));
        }

        serde_json::from_str(&text).with_context(|| {
            format!(
                "Failed to parse response JSON (HTTP {}): {}",
                status.as_u16(),
                sanitize_for_log(&text)
            )
        })
    }
}
