//! Resource abstraction layer
//!
//! Turns "what to run against which resource" into the JSON payload the
//! invocation service expects.
//!
//! # Architecture
//!
//! - [`kind`] - Resource kinds (subtypes) and their categories
//! - [`registry`] - Per-kind metadata loaded from embedded JSON
//! - [`builders`] - Typed payload builders, one module per resource family
//! - [`payload`] - The canonical [`Payload`] model
//! - [`layout`] - Flat vs embedded wire encodings
//! - [`dispatch`] - Builds payloads from string-encoded call parameters
//!
//! # Kind Definitions
//!
//! Kind metadata is defined in `src/resources/kinds.json`: category, legal
//! operations, wire layout, result tag and default timeout per subtype.
//!
//! # Example
//!
//! ```
//! use resource_client::resource::builders::sql::build_postgres_invoke_payload;
//!
//! let payload = build_postgres_invoke_payload("SELECT 1", None, None);
//! let wire = payload.to_default_wire().unwrap();
//! assert_eq!(wire["subtype"], "postgresql");
//! ```

pub mod builders;
pub mod dispatch;
pub mod kind;
pub mod layout;
pub mod payload;
pub mod registry;

pub use builders::build_raw_invoke_payload;
pub use dispatch::build_payload_from_extracted_params;
pub use kind::{Category, ResourceKind};
pub use layout::WireLayout;
pub use payload::{Payload, RawPayload};
pub use registry::{get_registry, kind_def, KindDef};
