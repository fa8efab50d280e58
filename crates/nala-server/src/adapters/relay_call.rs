//! Relay call client
//!
//! The audio SDK runs in the dashboard page, not in this process. This
//! CallClient keeps the session the page should join and re-emits the SDK
//! events the page forwards back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, watch};

use nala::{CallClient, CallEvent, DomainError, StartCallParams};

const EVENT_CAPACITY: usize = 32;

/// Session credentials waiting to be picked up by the page
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CallSession {
    pub params: StartCallParams,
    pub issued_at: DateTime<Utc>,
}

/// CallClient that relays to the browser SDK
pub struct RelayCallClient {
    events: broadcast::Sender<CallEvent>,
    session: watch::Sender<Option<CallSession>>,
}

impl RelayCallClient {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (session, _) = watch::channel(None);
        Self { events, session }
    }

    /// Session the page should currently be connected to
    pub fn current_session(&self) -> Option<CallSession> {
        self.session.borrow().clone()
    }

    /// Accept an event forwarded by the page's SDK
    ///
    /// A conversation that ended or failed no longer has a joinable session.
    pub fn forward(&self, event: CallEvent) {
        if matches!(
            event,
            CallEvent::ConversationEnded { .. } | CallEvent::Error { .. }
        ) {
            self.session.send_replace(None);
        }

        if self.events.send(event).is_err() {
            tracing::debug!("No subscribers for forwarded call event");
        }
    }
}

impl Default for RelayCallClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallClient for RelayCallClient {
    async fn start_call(&self, params: StartCallParams) -> Result<(), DomainError> {
        let call_id = params.call_id.clone();
        let previous = self.session.send_replace(Some(CallSession {
            params,
            issued_at: Utc::now(),
        }));

        if let Some(previous) = previous {
            tracing::warn!(
                "Replacing pending call session {} with {}",
                previous.params.call_id,
                call_id
            );
        }
        tracing::info!("Call session {} handed to dashboard page", call_id);
        Ok(())
    }

    async fn stop_call(&self) -> Result<(), DomainError> {
        match self.session.send_replace(None) {
            Some(session) => tracing::info!("Call session {} withdrawn", session.params.call_id),
            None => tracing::debug!("Stop requested with no pending call session"),
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nala::WebCall;

    fn params() -> StartCallParams {
        StartCallParams::from_web_call(WebCall {
            access_token: "tok_1".into(),
            call_id: "call_1".into(),
        })
    }

    #[tokio::test]
    async fn test_start_and_stop_manage_session() {
        let relay = RelayCallClient::new();
        assert!(relay.current_session().is_none());

        relay.start_call(params()).await.unwrap();
        let session = relay.current_session().unwrap();
        assert_eq!(session.params.call_id, "call_1");
        assert_eq!(session.params.sample_rate, 16000);

        relay.stop_call().await.unwrap();
        assert!(relay.current_session().is_none());
    }

    #[tokio::test]
    async fn test_forwarded_events_reach_subscribers() {
        let relay = RelayCallClient::new();
        let mut events = relay.subscribe();
        relay.start_call(params()).await.unwrap();

        relay.forward(CallEvent::ConversationStarted);
        assert!(relay.current_session().is_some());

        relay.forward(CallEvent::ConversationEnded {
            code: 1000,
            reason: "normal".into(),
        });
        assert!(relay.current_session().is_none());

        assert_eq!(events.recv().await.unwrap(), CallEvent::ConversationStarted);
        assert!(matches!(
            events.recv().await.unwrap(),
            CallEvent::ConversationEnded { code: 1000, .. }
        ));
    }
}
