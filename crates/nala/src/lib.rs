//! Nala Domain Library
//!
//! Core domain types and interfaces for the Nala voice assistant dashboard.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (UserConfig, LlmRef, AgentRef, WebCall)
//!   - `value_objects/`: Immutable value types (LlmModel, CallStatus, AgentProfile)
//!   - `state`: Reducer-style dashboard state and its action set
//!   - `errors`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Configuration document store
//!   - `services/`: Provisioning API and real-time call client
//!   - `session`: Identity provider
//!
//! - **Application** (`application/`): The dashboard controller and the
//!   call-event adapter that drive the state machine
//!
//! # Usage
//!
//! ```rust,ignore
//! use nala::{DashboardController, UserConfig};
//! use nala::ports::{CallClient, ProvisioningService, UserConfigRepository};
//! ```

pub mod application;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-export commonly used types
pub use application::{spawn_call_event_adapter, DashboardController, ToggleOutcome};
pub use domain::{
    AgentProfile, AgentRef, CallStatus, ConfigPatch, DashboardAction, DashboardState, DomainError,
    LlmModel, LlmRef, Notification, NotificationLevel, ProvisioningPhase, StartCallParams,
    UserConfig, WebCall,
};
pub use ports::{
    CallClient, CallEvent, CallUpdate, CreateAgentRequest, CreateLlmRequest, CreateWebCallRequest,
    ProvisioningService, SessionStore, Utterance, UserConfigRepository, UserIdentity,
};
