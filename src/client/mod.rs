//! Transport boundary
//!
//! - [`config`] - where a client sends its calls
//! - [`headers`] - header assembly and dynamic header providers
//! - [`http`] - the [`Transport`] seam and its reqwest implementation
//! - [`invoke`] - [`ResourceClient`], which ties a resource binding to a transport

pub mod config;
pub mod headers;
pub mod http;
pub mod invoke;

pub use config::{ClientConfig, EndpointVersion};
pub use headers::{HeaderList, HeaderProvider, StaticHeaders};
pub use http::{HttpTransport, Transport};
pub use invoke::ResourceClient;
