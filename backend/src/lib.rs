//! Course catalogue backend library.
//!
//! Hexagonal layout: `domain` holds entities, the access gate and the
//! services; `inbound` adapts HTTP onto the driving ports; `outbound`
//! implements the driven ports over PostgreSQL, memory and crypto crates.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
