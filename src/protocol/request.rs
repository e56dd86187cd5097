//! Outbound request envelope

use crate::error::Result;
use crate::resource::{Payload, WireLayout};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every invoke call: `{ payload, invocationKey }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    pub payload: Value,
    /// Opaque idempotency/tracing key, sent verbatim
    pub invocation_key: String,
}

impl InvokeRequest {
    pub fn new(payload: &Payload, layout: WireLayout, invocation_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            payload: payload.to_wire(layout)?,
            invocation_key: invocation_key.into(),
        })
    }
}
