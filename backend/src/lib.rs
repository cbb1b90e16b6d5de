//! Skill-exchange marketplace backend.
//!
//! Hexagonal layout: `domain` holds the entities, services, and ports;
//! `outbound` the store and token adapters; `api` the HTTP handlers; and
//! `server` the wiring that assembles them into an actix app.

pub mod api;
pub mod doc;
pub mod domain;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;

#[cfg(test)]
pub(crate) mod test_support;
