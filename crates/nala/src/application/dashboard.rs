//! Dashboard Controller (Use Case)
//!
//! Owns the dashboard state and runs the two provisioning sequences:
//! save (create-llm → create-agent → persist) and call
//! (create-web-call → start, or stop).

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::domain::{
    AgentProfile, CallStatus, ConfigPatch, DashboardAction, DashboardState, DomainError,
    StartCallParams, UserConfig, WebCall,
};
use crate::ports::{
    CallClient, CallEvent, CreateAgentRequest, CreateLlmRequest, CreateWebCallRequest,
    ProvisioningService, UserConfigRepository, UserIdentity,
};

const ACTION_LOG_CAPACITY: usize = 64;

/// Result of [`DashboardController::toggle_call`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A web call was created and handed to the call client
    Started(WebCall),
    /// The active call was stopped
    Stopped,
    /// No agent has been provisioned yet; nothing was done
    NoAgent,
}

/// Application service for one signed-in dashboard
pub struct DashboardController {
    repo: Arc<dyn UserConfigRepository>,
    provisioning: Arc<dyn ProvisioningService>,
    call_client: Arc<dyn CallClient>,
    agent_profile: AgentProfile,
    user: watch::Sender<Option<UserIdentity>>,
    state: watch::Sender<DashboardState>,
    actions: broadcast::Sender<DashboardAction>,
}

impl DashboardController {
    pub fn new(
        repo: Arc<dyn UserConfigRepository>,
        provisioning: Arc<dyn ProvisioningService>,
        call_client: Arc<dyn CallClient>,
    ) -> Self {
        let (user, _) = watch::channel(None);
        let (state, _) = watch::channel(DashboardState::default());
        let (actions, _) = broadcast::channel(ACTION_LOG_CAPACITY);

        Self {
            repo,
            provisioning,
            call_client,
            agent_profile: AgentProfile::default(),
            user,
            state,
            actions,
        }
    }

    /// Override the metadata sent with create-agent
    pub fn with_agent_profile(mut self, profile: AgentProfile) -> Self {
        self.agent_profile = profile;
        self
    }

    // ============================================
    // State access
    // ============================================

    /// Snapshot of the current state
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn call_status(&self) -> CallStatus {
        self.state.borrow().call_status
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.user.borrow().clone()
    }

    /// Subscribe to every dispatched action, in dispatch order
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardAction> {
        self.actions.subscribe()
    }

    pub(crate) fn subscribe_call_events(&self) -> broadcast::Receiver<CallEvent> {
        self.call_client.subscribe()
    }

    pub(crate) fn dispatch(&self, action: DashboardAction) {
        debug!(action = action.name(), "Dispatching dashboard action");
        self.state.send_if_modified(|state| state.apply(&action));
        // No subscribers is fine
        let _ = self.actions.send(action);
    }

    // ============================================
    // Session
    // ============================================

    /// React to the identity provider's auth state
    ///
    /// Sign-in loads the user's stored config. Sign-out stops an active call,
    /// puts the form back to its defaults and clears provisioning feedback.
    pub async fn on_auth_state_changed(
        &self,
        identity: Option<UserIdentity>,
    ) -> Result<(), DomainError> {
        match identity {
            Some(identity) => {
                info!("User signed in: {}", identity.user_id);
                self.user.send_replace(Some(identity.clone()));
                self.load_config(&identity.user_id).await
            }
            None => {
                if let Some(previous) = self.user.send_replace(None) {
                    info!("User signed out: {}", previous.user_id);
                }
                if self.call_status().is_active() {
                    if let Err(e) = self.call_client.stop_call().await {
                        error!("Failed to stop call on sign-out: {}", e);
                    }
                    self.dispatch(DashboardAction::CallStatusChanged {
                        status: CallStatus::Inactive,
                    });
                }
                self.dispatch(DashboardAction::ConfigChanged {
                    config: UserConfig::default(),
                });
                self.state.send_if_modified(DashboardState::clear_feedback);
                Ok(())
            }
        }
    }

    // ============================================
    // Configuration
    // ============================================

    /// Load the stored config for a user
    ///
    /// A missing document is first use: the defaults stay in place.
    pub async fn load_config(&self, user_id: &str) -> Result<(), DomainError> {
        let stored = self.repo.find_by_user(user_id).await.map_err(|e| {
            error!("Failed to load configuration for {}: {}", user_id, e);
            e
        })?;

        match stored {
            Some(config) => {
                info!("Loaded configuration for {}", user_id);
                self.dispatch(DashboardAction::ConfigChanged {
                    config: config.without_orphan_agent(),
                });
            }
            None => {
                info!("No configuration stored for {}, using defaults", user_id);
            }
        }

        Ok(())
    }

    /// Edit the draft form fields without saving
    pub fn update_draft(&self, patch: &ConfigPatch) -> UserConfig {
        let config = patch.apply_to(&self.state.borrow().config);
        self.dispatch(DashboardAction::ConfigChanged {
            config: config.clone(),
        });
        config
    }

    /// Save the current draft
    pub async fn save_draft(&self) -> Result<UserConfig, DomainError> {
        let draft = self.state.borrow().config.clone();
        self.save_configuration(draft).await
    }

    /// Provision an LLM and an agent for `config`, then persist it
    ///
    /// Any failure aborts the sequence with one error notification. Nothing
    /// is persisted and already-created remote resources are not deleted.
    pub async fn save_configuration(&self, config: UserConfig) -> Result<UserConfig, DomainError> {
        let user = self.current_user().ok_or(DomainError::Unauthenticated)?;

        self.dispatch(DashboardAction::ConfigChanged {
            config: config.clone(),
        });
        self.dispatch(DashboardAction::ProvisioningStarted);

        match self.provision_and_persist(&user, &config).await {
            Ok(saved) => {
                if let (Some(llm), Some(agent)) = (saved.llm_data.clone(), saved.agent_data.clone())
                {
                    self.dispatch(DashboardAction::ProvisioningSucceeded { llm, agent });
                }
                info!("Configuration saved for {}", user.user_id);
                Ok(saved)
            }
            Err(e) => {
                error!("Error saving configuration for {}: {}", user.user_id, e);
                self.dispatch(DashboardAction::ProvisioningFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn provision_and_persist(
        &self,
        user: &UserIdentity,
        config: &UserConfig,
    ) -> Result<UserConfig, DomainError> {
        let llm = self
            .provisioning
            .create_llm(&CreateLlmRequest::from(config))
            .await?;
        info!(llm_id = %llm.llm_id, "LLM created");

        let agent_request = CreateAgentRequest::new(&llm, &self.agent_profile);
        let agent = match self.provisioning.create_agent(&agent_request).await {
            Ok(agent) => agent,
            Err(e) => {
                warn!(llm_id = %llm.llm_id, "Agent creation failed, LLM resource left orphaned");
                return Err(e);
            }
        };
        info!(agent_id = %agent.agent_id, "Agent created");

        let merged = config.with_references(llm, agent);
        self.repo.save(&user.user_id, &merged).await?;

        Ok(merged)
    }

    // ============================================
    // Call lifecycle
    // ============================================

    /// Start a call when idle, stop it when active
    ///
    /// The status only becomes `Active` once the call client accepted the
    /// start request; a failure leaves it unchanged.
    pub async fn toggle_call(&self) -> Result<ToggleOutcome, DomainError> {
        let snapshot = self.state();

        if snapshot.call_status.is_active() {
            self.call_client.stop_call().await.map_err(|e| {
                error!("Error stopping call: {}", e);
                e
            })?;
            self.dispatch(DashboardAction::CallStatusChanged {
                status: CallStatus::Inactive,
            });
            info!("Call stopped");
            return Ok(ToggleOutcome::Stopped);
        }

        let Some(agent) = snapshot.config.agent() else {
            warn!("Agent not created yet");
            return Ok(ToggleOutcome::NoAgent);
        };

        let web_call = self
            .provisioning
            .create_web_call(&CreateWebCallRequest::from(agent))
            .await
            .map_err(|e| {
                error!("Error starting call: {}", e);
                e
            })?;

        self.call_client
            .start_call(StartCallParams::from_web_call(web_call.clone()))
            .await
            .map_err(|e| {
                error!("Error starting call {}: {}", web_call.call_id, e);
                e
            })?;

        self.dispatch(DashboardAction::CallStatusChanged {
            status: CallStatus::Active,
        });
        info!(call_id = %web_call.call_id, "Call started");

        Ok(ToggleOutcome::Started(web_call))
    }
}
