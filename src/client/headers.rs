//! Request headers
//!
//! Every call sends `Content-Type: application/json`, then `x-major-jwt` when a
//! token is configured, then whatever the [`HeaderProvider`] returns. Later
//! entries replace earlier ones with the same name (compared case-insensitively).

use anyhow::Result;
use async_trait::async_trait;

pub type HeaderList = Vec<(String, String)>;

pub const JWT_HEADER: &str = "x-major-jwt";

/// Supplies extra headers per call, e.g. a freshly minted auth token.
#[async_trait]
pub trait HeaderProvider: Send + Sync {
    async fn headers(&self) -> Result<HeaderList>;
}

/// Fixed set of extra headers
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(HeaderList);

impl StaticHeaders {
    pub fn new<K: Into<String>, V: Into<String>>(headers: impl IntoIterator<Item = (K, V)>) -> Self {
        Self(headers.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[async_trait]
impl HeaderProvider for StaticHeaders {
    async fn headers(&self) -> Result<HeaderList> {
        Ok(self.0.clone())
    }
}

pub fn base_headers(jwt: Option<&str>) -> HeaderList {
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    if let Some(token) = jwt {
        headers.push((JWT_HEADER.to_string(), token.to_string()));
    }
    headers
}

/// Merge `extra` into `headers`, replacing same-named entries in place
pub fn merge_headers(headers: &mut HeaderList, extra: HeaderList) {
    for (name, value) in extra {
        match headers.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(&name)) {
            Some(slot) => *slot = (name, value),
            None => headers.push((name, value)),
        }
    }
}
