//! Service Ports
//!
//! External service interfaces: the provisioning HTTP API and the
//! real-time call client.

mod call_client;
mod provisioning;

pub use call_client::*;
pub use provisioning::*;
