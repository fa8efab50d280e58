//! Session Authentication (Bearer Token)
//!
//! Resolves the bearer token to a signed-in user through the SessionStore
//! and hands the identity to handlers as a request extension.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::AppState;

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => header[7..].trim().to_string(),
        Some(_) => {
            tracing::warn!("Invalid Authorization header format");
            return Err(StatusCode::UNAUTHORIZED);
        }
        None => {
            tracing::warn!("Missing Authorization header");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    match state.sessions.current_user(&token).await {
        Ok(Some(identity)) => {
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        Ok(None) => {
            tracing::warn!("Unknown session token attempted");
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(e) => {
            tracing::error!("Session store {} failed: {}", state.sessions.name(), e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
