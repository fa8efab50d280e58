//! Dashboard registry
//!
//! One controller per signed-in user, created on the user's first
//! authenticated request and dropped on sign-out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use nala::{
    spawn_call_event_adapter, AgentProfile, DashboardController, DomainError, ProvisioningService,
    UserConfigRepository, UserIdentity,
};

use crate::adapters::RelayCallClient;

/// A live dashboard: controller, its call client and the event adapter task
pub struct DashboardHandle {
    pub controller: Arc<DashboardController>,
    pub call_client: Arc<RelayCallClient>,
    events_task: JoinHandle<()>,
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        self.events_task.abort();
    }
}

pub struct DashboardRegistry {
    repo: Arc<dyn UserConfigRepository>,
    provisioning: Arc<dyn ProvisioningService>,
    agent_profile: AgentProfile,
    dashboards: RwLock<HashMap<String, Arc<DashboardHandle>>>,
}

impl DashboardRegistry {
    pub fn new(
        repo: Arc<dyn UserConfigRepository>,
        provisioning: Arc<dyn ProvisioningService>,
        agent_profile: AgentProfile,
    ) -> Self {
        Self {
            repo,
            provisioning,
            agent_profile,
            dashboards: RwLock::new(HashMap::new()),
        }
    }

    /// Get the user's dashboard, starting a session if there is none
    pub async fn open(&self, identity: &UserIdentity) -> Result<Arc<DashboardHandle>, DomainError> {
        if let Some(handle) = self.dashboards.read().await.get(&identity.user_id) {
            return Ok(handle.clone());
        }

        let call_client = Arc::new(RelayCallClient::new());
        let controller = Arc::new(
            DashboardController::new(
                self.repo.clone(),
                self.provisioning.clone(),
                call_client.clone(),
            )
            .with_agent_profile(self.agent_profile.clone()),
        );
        let events_task = spawn_call_event_adapter(&controller);

        // Loads the stored config; on failure the handle is dropped and the
        // next request tries again
        controller.on_auth_state_changed(Some(identity.clone())).await?;

        let handle = Arc::new(DashboardHandle {
            controller,
            call_client,
            events_task,
        });

        let mut dashboards = self.dashboards.write().await;
        let handle = dashboards
            .entry(identity.user_id.clone())
            .or_insert(handle)
            .clone();
        tracing::info!("Dashboard session opened for {}", identity.user_id);

        Ok(handle)
    }

    /// End the user's session. Returns whether one existed.
    pub async fn close(&self, user_id: &str) -> bool {
        let removed = self.dashboards.write().await.remove(user_id);

        match removed {
            Some(handle) => {
                if let Err(e) = handle.controller.on_auth_state_changed(None).await {
                    tracing::error!("Failed to sign out {}: {}", user_id, e);
                }
                tracing::info!("Dashboard session closed for {}", user_id);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.dashboards.read().await.len()
    }
}
