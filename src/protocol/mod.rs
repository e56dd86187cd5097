//! Invocation envelope protocol
//!
//! - [`request`] - `{ payload, invocationKey }` request body
//! - [`response`] - `ok`-discriminated response envelope
//! - [`results`] - kind-tagged success results

pub mod request;
pub mod response;
pub mod results;

pub use request::InvokeRequest;
pub use response::{InvokeError, InvokeFailure, InvokeResponse, InvokeSuccess};
pub use results::ResourceResult;
