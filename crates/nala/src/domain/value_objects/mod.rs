//! Value Objects
//!
//! Immutable value types without identity.

mod agent_profile;
mod call_status;
mod llm_model;

pub use agent_profile::*;
pub use call_status::*;
pub use llm_model::*;
