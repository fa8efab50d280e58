//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    CallEventRequest,
    CallSessionView,
    CallStateResponse,
    // Dashboard models
    ConfigView,
    DashboardResponse,
    NotificationView,
    // Call models
    ToggleCallResponse,
    TranscriptLine,
    UpdateConfigRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Dashboard endpoints
        super::dashboard::get_dashboard,
        super::dashboard::update_config,
        super::dashboard::save_config,
        super::dashboard::sign_out,
        // Call endpoints
        super::dashboard::toggle_call,
        super::dashboard::get_call,
        super::dashboard::post_call_event,
    ),
    info(
        title = "Nala API",
        version = "0.1.0",
        description = "Voice assistant dashboard API\n\nConfigure the assistant's prompt and model, provision its LLM and agent, and run browser voice calls.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Dashboard", description = "Dashboard - Per-user assistant configuration"),
        (name = "Call", description = "Call - Web call lifecycle and SDK event relay"),
    ),
    components(
        schemas(
            // Dashboard
            ConfigView,
            UpdateConfigRequest,
            NotificationView,
            DashboardResponse,
            // Call
            ToggleCallResponse,
            CallSessionView,
            CallStateResponse,
            TranscriptLine,
            CallEventRequest,
        )
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_dashboard_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/dashboard",
            "/dashboard/config",
            "/dashboard/config/save",
            "/dashboard/call",
            "/dashboard/call/toggle",
            "/dashboard/call/events",
            "/dashboard/session",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
