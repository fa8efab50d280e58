//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! the document store, the provisioning API and the call client.

mod call_events;
mod dashboard;

pub use call_events::{spawn_call_event_adapter, status_for_event};
pub use dashboard::{DashboardController, ToggleOutcome};
