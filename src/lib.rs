//! Client-side resource invocation
//!
//! Builds the JSON payload for a call against an externally managed resource
//! (SQL and NoSQL databases, object storage, serverless functions, SaaS APIs),
//! wraps it in the invoke envelope, sends it and decodes the kind-tagged result.
//!
//! # Module Structure
//!
//! - [`params`] - coercion of string-encoded call parameters
//! - [`resource`] - resource kinds, payload builders, wire layouts, dynamic dispatch
//! - [`protocol`] - request/response envelopes and per-kind results
//! - [`client`] - [`ResourceClient`] and the transport seam
//! - [`error`] - [`ResourceError`]
//!
//! # Example
//!
//! ```no_run
//! use resource_client::{ClientConfig, ResourceClient, ResourceKind};
//! use resource_client::resource::builders::sql::build_postgres_invoke_payload;
//!
//! # async fn example() -> resource_client::Result<()> {
//! let config = ClientConfig::new("https://api.example.com", "app-1", "res-1")?;
//! let client = ResourceClient::new(config, ResourceKind::Postgres)?;
//! let payload = build_postgres_invoke_payload("SELECT now()", None, None);
//! let response = client.send(&payload, "invocation-1").await?;
//! println!("ok={}", response.is_ok());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod params;
pub mod protocol;
pub mod resource;

pub use client::{ClientConfig, EndpointVersion, HeaderProvider, HttpTransport, ResourceClient, StaticHeaders, Transport};
pub use error::{ResourceError, Result};
pub use params::{ExtractedParam, ValueType};
pub use protocol::{InvokeRequest, InvokeResponse, ResourceResult};
pub use resource::{
    build_payload_from_extracted_params, build_raw_invoke_payload, Category, Payload, ResourceKind, WireLayout,
};
