//! In-memory fakes for the ports
//!
//! Available to this crate's tests and, through the `test-util` feature,
//! to downstream crates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};

use crate::domain::{AgentRef, DomainError, LlmRef, StartCallParams, UserConfig, WebCall};
use crate::ports::{
    CallClient, CallEvent, CreateAgentRequest, CreateLlmRequest, CreateWebCallRequest,
    ProvisioningService, UserConfigRepository,
};

// ============================================
// Document store
// ============================================

/// HashMap-backed document store that counts writes
#[derive(Default)]
pub struct InMemoryUserConfigRepository {
    documents: Mutex<HashMap<String, UserConfig>>,
    writes: AtomicUsize,
}

impl InMemoryUserConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without counting it as a write
    pub async fn insert(&self, user_id: &str, config: UserConfig) {
        self.documents
            .lock()
            .await
            .insert(user_id.to_string(), config);
    }

    pub async fn get(&self, user_id: &str) -> Option<UserConfig> {
        self.documents.lock().await.get(user_id).cloned()
    }

    pub async fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserConfigRepository for InMemoryUserConfigRepository {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<UserConfig>, DomainError> {
        Ok(self.get(user_id).await)
    }

    async fn save(&self, user_id: &str, config: &UserConfig) -> Result<(), DomainError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert(user_id, config.clone()).await;
        Ok(())
    }
}

// ============================================
// Provisioning API
// ============================================

/// A request received by [`ScriptedProvisioning`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningCall {
    CreateLlm(CreateLlmRequest),
    CreateAgent(CreateAgentRequest),
    CreateWebCall(CreateWebCallRequest),
}

/// Provisioning API with canned answers per endpoint
pub struct ScriptedProvisioning {
    llm: Result<LlmRef, DomainError>,
    agent: Result<AgentRef, DomainError>,
    web_call: Result<WebCall, DomainError>,
    calls: Mutex<Vec<ProvisioningCall>>,
}

impl ScriptedProvisioning {
    /// Every endpoint succeeds
    pub fn succeeding() -> Self {
        Self {
            llm: Ok(Self::llm_ref()),
            agent: Ok(Self::agent_ref()),
            web_call: Ok(Self::web_call()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn llm_ref() -> LlmRef {
        LlmRef {
            llm_id: "llm_test".to_string(),
            llm_websocket_url: "wss://api.example.com/llm-websocket/llm_test".to_string(),
        }
    }

    pub fn agent_ref() -> AgentRef {
        AgentRef {
            agent_id: "agent_test".to_string(),
        }
    }

    pub fn web_call() -> WebCall {
        WebCall {
            access_token: "token_test".to_string(),
            call_id: "call_test".to_string(),
        }
    }

    pub fn fail_llm(mut self, status: u16) -> Self {
        self.llm = Err(DomainError::api_status("create-retell-llm", status, ""));
        self
    }

    pub fn fail_agent(mut self, status: u16) -> Self {
        self.agent = Err(DomainError::api_status("create-agent", status, ""));
        self
    }

    pub fn fail_web_call(mut self, status: u16) -> Self {
        self.web_call = Err(DomainError::api_status("v2/create-web-call", status, ""));
        self
    }

    /// Requests received so far, in order
    pub async fn calls(&self) -> Vec<ProvisioningCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ProvisioningService for ScriptedProvisioning {
    async fn create_llm(&self, request: &CreateLlmRequest) -> Result<LlmRef, DomainError> {
        self.calls
            .lock()
            .await
            .push(ProvisioningCall::CreateLlm(request.clone()));
        self.llm.clone()
    }

    async fn create_agent(&self, request: &CreateAgentRequest) -> Result<AgentRef, DomainError> {
        self.calls
            .lock()
            .await
            .push(ProvisioningCall::CreateAgent(request.clone()));
        self.agent.clone()
    }

    async fn create_web_call(
        &self,
        request: &CreateWebCallRequest,
    ) -> Result<WebCall, DomainError> {
        self.calls
            .lock()
            .await
            .push(ProvisioningCall::CreateWebCall(request.clone()));
        self.web_call.clone()
    }
}

// ============================================
// Call client
// ============================================

/// Call client that records start/stop and lets tests emit events
pub struct FakeCallClient {
    events: broadcast::Sender<CallEvent>,
    started: Mutex<Vec<StartCallParams>>,
    stops: AtomicUsize,
    fail_start: bool,
}

impl Default for FakeCallClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCallClient {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            events,
            started: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
            fail_start: false,
        }
    }

    /// Reject every start request
    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Emit an event as the SDK would
    pub fn emit(&self, event: CallEvent) {
        let _ = self.events.send(event);
    }

    pub async fn started(&self) -> Vec<StartCallParams> {
        self.started.lock().await.clone()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallClient for FakeCallClient {
    async fn start_call(&self, params: StartCallParams) -> Result<(), DomainError> {
        if self.fail_start {
            return Err(DomainError::CallClient("microphone unavailable".to_string()));
        }
        self.started.lock().await.push(params);
        Ok(())
    }

    async fn stop_call(&self) -> Result<(), DomainError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.events.subscribe()
    }
}
