//! Infrastructure adapters for the billing core.
//!
//! This crate implements the ports defined in `carwash-core::application::ports`.
//! It contains all network I/O.
//!
//! - [`HttpGateway`]: the REST collaborator, over `reqwest`
//! - [`InMemoryGateway`]: an in-process collaborator enforcing the same
//!   constraints, with fault injection for tests and the offline demo

pub mod http;
pub mod memory;

// Re-export commonly used adapters
pub use http::{DEFAULT_BASE_URL, HttpConfig, HttpGateway};
pub use memory::{FailPoint, InMemoryGateway};
