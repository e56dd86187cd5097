//! Client binding configuration

use crate::error::{ResourceError, Result};
use crate::resource::WireLayout;
use serde::{Deserialize, Serialize};
use url::Url;

/// Which invoke route the server exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointVersion {
    #[default]
    V2,
    /// `/internal/apps/v1/...` route of older servers
    Legacy,
}

impl EndpointVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            EndpointVersion::V2 => "v2",
            EndpointVersion::Legacy => "legacy",
        }
    }
}

impl std::str::FromStr for EndpointVersion {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "v2" => Ok(EndpointVersion::V2),
            "legacy" | "v1" => Ok(EndpointVersion::Legacy),
            other => Err(ResourceError::InvalidConfig(format!("unknown endpoint version: {}", other))),
        }
    }
}

/// Where and as whom a [`super::ResourceClient`] invokes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub application_id: String,
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_jwt_token: Option<String>,
    #[serde(default)]
    pub endpoint: EndpointVersion,
    /// Overrides the kind's wire layout (older servers only read one of them)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<WireLayout>,
}

impl ClientConfig {
    pub fn new(base_url: &str, application_id: &str, resource_id: &str) -> Result<Self> {
        let config = Self {
            base_url: base_url.to_string(),
            application_id: application_id.to_string(),
            resource_id: resource_id.to_string(),
            major_jwt_token: None,
            endpoint: EndpointVersion::default(),
            layout: None,
        };
        config.normalized()
    }

    pub fn with_jwt(mut self, token: impl Into<String>) -> Self {
        self.major_jwt_token = Some(token.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: EndpointVersion) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_layout(mut self, layout: WireLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Validate and strip one trailing `/` from the base URL
    pub fn normalized(mut self) -> Result<Self> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ResourceError::InvalidConfig(format!("invalid base URL {}: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ResourceError::InvalidConfig(format!(
                "base URL must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.application_id.is_empty() {
            return Err(ResourceError::InvalidConfig("application id is empty".to_string()));
        }
        if self.resource_id.is_empty() {
            return Err(ResourceError::InvalidConfig("resource id is empty".to_string()));
        }

        if self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        Ok(self)
    }

    pub fn invoke_url(&self) -> String {
        let app = urlencoding::encode(&self.application_id);
        let resource = urlencoding::encode(&self.resource_id);
        match self.endpoint {
            EndpointVersion::V2 => format!("{}/v2/apps/{}/resources/{}/invoke", self.base_url, app, resource),
            EndpointVersion::Legacy => {
                format!("{}/internal/apps/v1/{}/resource/{}/invoke", self.base_url, app, resource)
            },
        }
    }
}
