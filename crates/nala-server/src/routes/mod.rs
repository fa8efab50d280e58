//! Nala API Routes
//!
//! - /dashboard - Dashboard state and configuration draft
//! - /dashboard/config/save - Provision LLM + agent and persist
//! - /dashboard/call - Voice call lifecycle and SDK event relay
//! - /dashboard/session - Sign-out

use axum::http::StatusCode;
use nala::DomainError;

pub mod dashboard;
pub mod swagger;

/// Map a domain error to a status and plain-text body
pub fn error_response(e: DomainError) -> (StatusCode, String) {
    let status = match &e {
        DomainError::ApiStatus { .. }
        | DomainError::Transport(_)
        | DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Repository(_) | DomainError::CallClient(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}
