//! Resource client
//!
//! A [`ResourceClient`] is bound to one resource of one kind. It encodes
//! payloads in the kind's wire layout, wraps them in the request envelope,
//! sends them through a [`Transport`] and decodes the response envelope.

use super::config::ClientConfig;
use super::headers::{base_headers, merge_headers, HeaderProvider};
use super::http::{HttpTransport, Transport};
use crate::error::{ResourceError, Result};
use crate::params::ExtractedParam;
use crate::protocol::{InvokeRequest, InvokeResponse};
use crate::resource::{build_payload_from_extracted_params, registry, Payload, ResourceKind, WireLayout};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct ResourceClient {
    config: ClientConfig,
    kind: ResourceKind,
    transport: Arc<dyn Transport>,
    header_provider: Option<Arc<dyn HeaderProvider>>,
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("kind", &self.kind)
            .field("invoke_url", &self.invoke_url())
            .field("header_provider", &self.header_provider.is_some())
            .finish()
    }
}

impl ResourceClient {
    /// Bind a client to `kind` using the default HTTP transport
    pub fn new(config: ClientConfig, kind: ResourceKind) -> Result<Self> {
        let config = config.normalized()?;
        let transport = HttpTransport::new().map_err(|e| ResourceError::InvalidConfig(format!("{:#}", e)))?;

        Ok(Self {
            config,
            kind,
            transport: Arc::new(transport),
            header_provider: None,
        })
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn with_header_provider(mut self, provider: impl HeaderProvider + 'static) -> Self {
        self.header_provider = Some(Arc::new(provider));
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn invoke_url(&self) -> String {
        self.config.invoke_url()
    }

    /// Layout payloads are encoded in: the config override, else the kind's own
    pub fn layout(&self) -> WireLayout {
        self.config
            .layout
            .unwrap_or_else(|| registry::default_layout(self.kind))
    }

    /// Send one payload.
    ///
    /// A server-reported failure comes back as `Ok(InvokeResponse::Failure)`.
    /// `Err(ResourceError::Invoke)` means no valid envelope was received.
    pub async fn send(&self, payload: &Payload, invocation_key: &str) -> Result<InvokeResponse> {
        if payload.kind() != self.kind {
            return Err(ResourceError::KindMismatch {
                expected: self.kind.as_str().to_string(),
                actual: payload.kind().as_str().to_string(),
            });
        }

        let layout = self.layout();
        let request = InvokeRequest::new(payload, layout, invocation_key)?;
        let body = serde_json::to_value(&request)?;
        let url = self.invoke_url();
        tracing::debug!(
            "send: kind={}, operation={:?}, layout={}, key={}",
            self.kind,
            payload.operation(),
            layout.as_str(),
            invocation_key
        );

        let response = self.exchange(&url, &body).await.map_err(|e| {
            tracing::error!("Invoke {} failed: {:#}", url, e);
            ResourceError::invoke(&e)
        })?;

        match &response {
            InvokeResponse::Success(success) => {
                let expected = registry::result_kind(self.kind);
                if success.result.kind() != expected {
                    tracing::warn!(
                        "Result kind {} does not match {} (expected {})",
                        success.result.kind(),
                        self.kind,
                        expected
                    );
                }
                tracing::debug!("Invoke {} succeeded, request_id={}", self.kind, success.request_id);
            },
            InvokeResponse::Failure(failure) => {
                tracing::debug!(
                    "Invoke {} reported failure, request_id={}, status={:?}",
                    self.kind,
                    failure.request_id,
                    failure.error.http_status
                );
            },
        }

        Ok(response)
    }

    /// Build a payload from extracted call parameters and send it
    pub async fn send_extracted(
        &self,
        method: &str,
        params: &[ExtractedParam],
        invocation_key: &str,
    ) -> Result<InvokeResponse> {
        let payload = build_payload_from_extracted_params(self.kind.as_str(), method, params)?;
        self.send(&payload, invocation_key).await
    }

    async fn exchange(&self, url: &str, body: &serde_json::Value) -> anyhow::Result<InvokeResponse> {
        let mut headers = base_headers(self.config.major_jwt_token.as_deref());
        if let Some(provider) = &self.header_provider {
            let extra = provider.headers().await.context("Failed to get request headers")?;
            merge_headers(&mut headers, extra);
        }

        let reply = self.transport.post_json(url, &headers, body).await?;
        serde_json::from_value(reply).context("Response is not a valid invoke envelope")
    }
}
