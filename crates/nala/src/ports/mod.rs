//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with external systems (document store, provisioning API,
//! call SDK, identity provider).
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod repositories;
pub mod services;
pub mod session;

// Re-exports
pub use repositories::*;
pub use services::*;
pub use session::*;
