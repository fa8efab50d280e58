use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod auth;
mod config;
mod models;
mod registry;
mod routes;

use adapters::{PgUserConfigRepository, RetellClient, StaticSessionStore};
use config::AppConfig;
use nala::SessionStore;
use registry::DashboardRegistry;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<DashboardRegistry>,
    pub sessions: Arc<dyn SessionStore>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Nala API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Assemble the HTTP surface around an already-wired state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require a signed-in user)
    let protected_routes = Router::new()
        .merge(routes::dashboard::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🎙️ Nala API initializing...");

    let config = AppConfig::from_lookup(|key| secrets.get(key))
        .map_err(|e| shuttle_runtime::Error::Custom(anyhow::anyhow!(e)))?;
    tracing::info!("🔧 Configuration loaded: {:?}", config.retell);

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| {
            shuttle_runtime::Error::Custom(anyhow::anyhow!("Failed to run database migrations: {}", e))
        })?;

    tracing::info!("✅ Database migrations completed");

    let retell = RetellClient::new(&config.retell)
        .map_err(|e| shuttle_runtime::Error::Custom(anyhow::anyhow!(e)))?;
    tracing::info!("📞 Retell client ready ({})", config.retell.base_url);

    let sessions = StaticSessionStore::new(config.session_tokens);
    if sessions.is_empty() {
        tracing::warn!("⚠️  No NALA_SESSION_TOKENS set - every dashboard request will be rejected");
    } else {
        tracing::info!("🔐 Session authentication enabled");
    }

    let registry = Arc::new(DashboardRegistry::new(
        Arc::new(PgUserConfigRepository::new(pool)),
        Arc::new(retell),
        config.agent_profile,
    ));

    let state = AppState {
        registry,
        sessions: Arc::new(sessions),
    };

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Nala API ready");

    Ok(router.into())
}
