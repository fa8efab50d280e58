//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod user_config_repository;

pub use user_config_repository::*;
