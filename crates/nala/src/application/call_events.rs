//! Call Client Event Adapter
//!
//! Maps call client events onto `CallStatusChanged` actions. Events are
//! applied as they arrive; nothing is buffered or replayed.

use std::sync::{Arc, Weak};

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::DashboardController;
use crate::domain::{CallStatus, DashboardAction};
use crate::ports::CallEvent;

/// Status an event moves the call to, if any
pub fn status_for_event(event: &CallEvent) -> Option<CallStatus> {
    match event {
        CallEvent::ConversationStarted => Some(CallStatus::Active),
        CallEvent::ConversationEnded { .. } | CallEvent::Error { .. } => Some(CallStatus::Inactive),
        CallEvent::Update(_) => None,
    }
}

impl DashboardController {
    /// Apply one call client event
    pub fn handle_call_event(&self, event: &CallEvent) {
        match event {
            CallEvent::ConversationStarted => info!("Conversation started"),
            CallEvent::ConversationEnded { code, reason } => {
                info!("Conversation ended with code: {}, reason: {}", code, reason)
            }
            CallEvent::Error { message } => error!("Call client error: {}", message),
            CallEvent::Update(update) => {
                for line in &update.transcript {
                    debug!("{}: {}", line.speaker, line.text);
                }
            }
        }

        if let Some(status) = status_for_event(event) {
            self.dispatch(DashboardAction::CallStatusChanged { status });
        }
    }
}

/// Subscribe once to the controller's call client and apply its events
///
/// The subscription is taken before this returns, so no event emitted after
/// the call is missed. The task holds only a weak reference and ends when the
/// controller is dropped or the event channel closes.
pub fn spawn_call_event_adapter(controller: &Arc<DashboardController>) -> JoinHandle<()> {
    let mut events = controller.subscribe_call_events();
    let controller: Weak<DashboardController> = Arc::downgrade(controller);

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match controller.upgrade() {
                    Some(controller) => controller.handle_call_event(&event),
                    None => break,
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Call event adapter lagged, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => {
                    debug!("Call event channel closed");
                    break;
                }
            }
        }
    })
}
