//! Domain Entities
//!
//! Core domain models representing business concepts.

mod call;
mod user_config;

pub use call::*;
pub use user_config::*;
