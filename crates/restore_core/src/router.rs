use panel_logging::panel_warn;

use crate::controller::schedule_flush;
use crate::{AppState, Effect, PanelError, RunToken};

/// Prefix for lines the job wrote to its error stream.
pub const ERROR_MARKER: &str = "[ERR] ";

/// One record from the progress stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub run_id: RunToken,
    /// `None` carries a message without a stage change.
    pub stage: Option<i32>,
    pub message: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionState {
    #[default]
    Connected,
    Failed,
}

/// Run-identity gate in front of the reducer and the log buffer.
///
/// The stream is subscribed once for the life of the process; only the
/// identity it filters against changes between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventRouter {
    subscription: SubscriptionState,
}

impl EventRouter {
    pub fn subscription(&self) -> SubscriptionState {
        self.subscription
    }

    /// Records a subscription failure; true the first time only.
    fn mark_failed(&mut self) -> bool {
        let first = self.subscription == SubscriptionState::Connected;
        self.subscription = SubscriptionState::Failed;
        first
    }
}

pub(crate) fn route_event(state: &mut AppState, event: ProgressEvent) -> Vec<Effect> {
    // Stale events are dropped without a trace.
    if !state.controller.accepts(&event.run_id) {
        return Vec::new();
    }

    let mut effects = Vec::new();
    if let Some(progress) = state.reducer.accept(event.stage) {
        effects.push(Effect::RenderProgress(progress));
    }
    if !event.message.is_empty() {
        let line = if event.is_error {
            format!("{ERROR_MARKER}{}", event.message)
        } else {
            event.message
        };
        if let Some(ticket) = state.logs.append(line) {
            effects.push(schedule_flush(ticket));
        }
    }
    effects
}

pub(crate) fn subscription_failed(state: &mut AppState, reason: String) -> Vec<Effect> {
    if !state.router.mark_failed() {
        return Vec::new();
    }
    let err = PanelError::StreamSubscription(reason);
    panel_warn!("{}", err);
    state.status = err.to_string();
    vec![Effect::SetStatus(state.status.clone())]
}
