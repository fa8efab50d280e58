//! Dashboard Routes - Configuration and Call Control
//!
//! HTTP handlers that delegate to the user's DashboardController.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use nala::UserIdentity;

use super::error_response;
use crate::models::{
    CallEventRequest, CallStateResponse, DashboardResponse, ToggleCallResponse,
    UpdateConfigRequest,
};
use crate::registry::DashboardHandle;
use crate::AppState;

async fn open_dashboard(
    state: &AppState,
    identity: &UserIdentity,
) -> Result<Arc<DashboardHandle>, (StatusCode, String)> {
    state.registry.open(identity).await.map_err(error_response)
}

/// Get the dashboard state
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Current dashboard state", body = DashboardResponse),
        (status = 401, description = "Not signed in"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let handle = open_dashboard(&state, &identity).await?;
    Ok(Json(DashboardResponse::from(&handle.controller.state())))
}

/// Edit the configuration draft
#[utoipa::path(
    put,
    path = "/dashboard/config",
    request_body = UpdateConfigRequest,
    responses(
        (status = 200, description = "Draft updated", body = DashboardResponse),
        (status = 400, description = "Unknown model"),
        (status = 401, description = "Not signed in")
    ),
    tag = "Dashboard"
)]
pub async fn update_config(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<UpdateConfigRequest>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let patch = payload.into_patch().map_err(error_response)?;

    let handle = open_dashboard(&state, &identity).await?;
    handle.controller.update_draft(&patch);

    Ok(Json(DashboardResponse::from(&handle.controller.state())))
}

/// Provision an LLM and agent for the draft, then persist it
#[utoipa::path(
    post,
    path = "/dashboard/config/save",
    request_body(content = UpdateConfigRequest, description = "Optional edits applied before saving"),
    responses(
        (status = 200, description = "Configuration saved", body = DashboardResponse),
        (status = 400, description = "Malformed body or unknown model"),
        (status = 401, description = "Not signed in"),
        (status = 502, description = "Provisioning API failed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn save_config(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    body: Bytes,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    // Only an empty body means "save the draft as is"
    let patch = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let request: UpdateConfigRequest = serde_json::from_slice(&body)
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e)))?;
        Some(request.into_patch().map_err(error_response)?)
    };

    let handle = open_dashboard(&state, &identity).await?;
    if let Some(patch) = patch.filter(|p| !p.is_empty()) {
        handle.controller.update_draft(&patch);
    }

    handle
        .controller
        .save_draft()
        .await
        .map_err(error_response)?;

    Ok(Json(DashboardResponse::from(&handle.controller.state())))
}

/// Start the call when idle, stop it when active
#[utoipa::path(
    post,
    path = "/dashboard/call/toggle",
    responses(
        (status = 200, description = "Call toggled (or no agent yet)", body = ToggleCallResponse),
        (status = 401, description = "Not signed in"),
        (status = 502, description = "Provisioning API failed")
    ),
    tag = "Call"
)]
pub async fn toggle_call(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> Result<Json<ToggleCallResponse>, (StatusCode, String)> {
    let handle = open_dashboard(&state, &identity).await?;
    let outcome = handle
        .controller
        .toggle_call()
        .await
        .map_err(error_response)?;

    Ok(Json(ToggleCallResponse::new(
        &outcome,
        &handle.controller.state(),
    )))
}

/// Call status and the session the page should join
#[utoipa::path(
    get,
    path = "/dashboard/call",
    responses(
        (status = 200, description = "Call state", body = CallStateResponse),
        (status = 401, description = "Not signed in")
    ),
    tag = "Call"
)]
pub async fn get_call(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> Result<Json<CallStateResponse>, (StatusCode, String)> {
    let handle = open_dashboard(&state, &identity).await?;

    Ok(Json(CallStateResponse {
        call_status: handle.controller.call_status().to_string(),
        session: handle.call_client.current_session().map(Into::into),
    }))
}

/// Relay an event from the page's call SDK
#[utoipa::path(
    post,
    path = "/dashboard/call/events",
    request_body = CallEventRequest,
    responses(
        (status = 202, description = "Event accepted"),
        (status = 401, description = "Not signed in")
    ),
    tag = "Call"
)]
pub async fn post_call_event(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<CallEventRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let handle = open_dashboard(&state, &identity).await?;
    handle.call_client.forward(payload.into());
    Ok(StatusCode::ACCEPTED)
}

/// Sign out and drop the dashboard session
#[utoipa::path(
    delete,
    path = "/dashboard/session",
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Not signed in")
    ),
    tag = "Dashboard"
)]
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> StatusCode {
    state.registry.close(&identity.user_id).await;
    StatusCode::NO_CONTENT
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/config", put(update_config))
        .route("/dashboard/config/save", post(save_config))
        .route("/dashboard/call", get(get_call))
        .route("/dashboard/call/toggle", post(toggle_call))
        .route("/dashboard/call/events", post(post_call_event))
        .route("/dashboard/session", delete(sign_out))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use nala::testing::{InMemoryUserConfigRepository, ScriptedProvisioning};
    use nala::AgentProfile;

    use crate::adapters::StaticSessionStore;
    use crate::registry::DashboardRegistry;
    use crate::{build_router, AppState};

    use super::*;

    const TOKEN: &str = "tok-alice";

    fn app_with(provisioning: ScriptedProvisioning) -> (Router, AppState, Arc<InMemoryUserConfigRepository>) {
        let repo = Arc::new(InMemoryUserConfigRepository::new());
        let registry = Arc::new(DashboardRegistry::new(
            repo.clone(),
            Arc::new(provisioning),
            AgentProfile::default(),
        ));
        let sessions = Arc::new(StaticSessionStore::new(HashMap::from([(
            TOKEN.to_string(),
            UserIdentity::new("alice"),
        )])));
        let state = AppState { registry, sessions };
        (build_router(state.clone()), state, repo)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn wait_for_status(app: &Router, expected: &str) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let (_, body) = send(app, Method::GET, "/dashboard/call", None).await;
                if body["call_status"] == expected {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("call status reached");
    }

    #[tokio::test]
    async fn test_requests_without_session_are_rejected() {
        let (app, _, _) = app_with(ScriptedProvisioning::succeeding());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let (app, _, _) = app_with(ScriptedProvisioning::succeeding());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .header(header::AUTHORIZATION, "Bearer tok-mallory")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_first_visit_shows_defaults() {
        let (app, _, _) = app_with(ScriptedProvisioning::succeeding());

        let (status, body) = send(&app, Method::GET, "/dashboard", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["config"]["general_prompt"],
            "You are a helpful assistant for our restaurant..."
        );
        assert_eq!(body["config"]["model"], "gpt-4o");
        assert_eq!(body["call_status"], "not-started");
        assert_eq!(body["provisioning"], "idle");
    }

    #[tokio::test]
    async fn test_edit_and_save_persists_document() {
        let (app, _, repo) = app_with(ScriptedProvisioning::succeeding());

        let (status, body) = send(
            &app,
            Method::PUT,
            "/dashboard/config",
            Some(json!({"general_prompt": "Take reservations.", "model": "gpt-3.5-turbo"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["model"], "gpt-3.5-turbo");
        assert_eq!(repo.write_count().await, 0);

        let (status, body) = send(&app, Method::POST, "/dashboard/config/save", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["agent_id"], "agent_test");
        assert_eq!(body["notification"]["level"], "success");

        let stored = repo.get("alice").await.unwrap();
        assert_eq!(stored.general_prompt, "Take reservations.");
        assert_eq!(stored.agent_data.unwrap().agent_id, "agent_test");
    }

    #[tokio::test]
    async fn test_invalid_model_is_bad_request() {
        let (app, _, _) = app_with(ScriptedProvisioning::succeeding());

        let (status, _) = send(
            &app,
            Method::PUT,
            "/dashboard/config",
            Some(json!({"model": "gpt-2"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_with_malformed_body_is_rejected_before_provisioning() {
        let (app, _, repo) = app_with(ScriptedProvisioning::succeeding());

        let (status, _) = send(
            &app,
            Method::POST,
            "/dashboard/config/save",
            Some(json!({"general_prompt": 42, "model": "gpt-3.5-turbo"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/dashboard/config/save",
            Some(json!({"model": "gpt-2"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(repo.write_count().await, 0);
        let (_, body) = send(&app, Method::GET, "/dashboard", None).await;
        assert_eq!(body["provisioning"], "idle");
    }

    #[tokio::test]
    async fn test_save_applies_body_before_provisioning() {
        let (app, _, repo) = app_with(ScriptedProvisioning::succeeding());

        let (status, body) = send(
            &app,
            Method::POST,
            "/dashboard/config/save",
            Some(json!({"begin_message": "Welcome back!", "model": "gpt-3.5-turbo"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["begin_message"], "Welcome back!");

        let stored = repo.get("alice").await.unwrap();
        assert_eq!(stored.begin_message, "Welcome back!");
        assert_eq!(stored.model, nala::LlmModel::Gpt35Turbo);
    }

    #[tokio::test]
    async fn test_failed_provisioning_is_bad_gateway_and_not_persisted() {
        let (app, _, repo) = app_with(ScriptedProvisioning::succeeding().fail_llm(500));

        let (status, _) = send(&app, Method::POST, "/dashboard/config/save", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(repo.write_count().await, 0);

        let (_, body) = send(&app, Method::GET, "/dashboard", None).await;
        assert_eq!(body["provisioning"], "failed");
        assert_eq!(body["notification"]["title"], "Error saving changes.");
    }

    #[tokio::test]
    async fn test_toggle_without_agent_reports_no_agent() {
        let (app, _, _) = app_with(ScriptedProvisioning::succeeding());

        let (status, body) = send(&app, Method::POST, "/dashboard/call/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "no_agent");
        assert_eq!(body["call_status"], "not-started");
    }

    #[tokio::test]
    async fn test_call_lifecycle_through_relay() {
        let (app, _, _) = app_with(ScriptedProvisioning::succeeding());
        send(&app, Method::POST, "/dashboard/config/save", None).await;

        let (_, body) = send(&app, Method::POST, "/dashboard/call/toggle", None).await;
        assert_eq!(body["outcome"], "started");
        assert_eq!(body["call_id"], "call_test");

        let (_, body) = send(&app, Method::GET, "/dashboard/call", None).await;
        assert_eq!(body["call_status"], "active");
        assert_eq!(body["session"]["access_token"], "token_test");
        assert_eq!(body["session"]["sample_rate"], 16000);

        let (status, _) = send(
            &app,
            Method::POST,
            "/dashboard/call/events",
            Some(json!({"type": "conversation_ended", "code": 1000, "reason": "normal"})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        wait_for_status(&app, "inactive").await;
        let (_, body) = send(&app, Method::GET, "/dashboard/call", None).await;
        assert!(body["session"].is_null());
    }

    #[tokio::test]
    async fn test_sign_out_drops_session() {
        let (app, state, _) = app_with(ScriptedProvisioning::succeeding());
        send(&app, Method::GET, "/dashboard", None).await;
        assert_eq!(state.registry.len().await, 1);

        let (status, _) = send(&app, Method::DELETE, "/dashboard/session", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_health_needs_no_session() {
        let (app, _, _) = app_with(ScriptedProvisioning::succeeding());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
