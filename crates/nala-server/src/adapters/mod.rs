//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod postgres;
pub mod relay_call;
pub mod retell;
pub mod session;

// Re-exports
pub use postgres::PgUserConfigRepository;
pub use relay_call::{CallSession, RelayCallClient};
pub use retell::RetellClient;
pub use session::StaticSessionStore;
