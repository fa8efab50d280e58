//! Domain Layer
//!
//! Pure domain logic without infrastructure dependencies.
//! Contains entities, value objects, the dashboard state and errors.

pub mod entities;
pub mod errors;
pub mod state;
pub mod value_objects;

// Re-exports for convenience
pub use entities::*;
pub use errors::*;
pub use state::*;
pub use value_objects::*;
