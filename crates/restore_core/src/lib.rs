//! Restore panel core: run-correlated progress reconciliation as a pure state machine.
mod controller;
mod effect;
mod error;
mod log_buffer;
mod msg;
mod progress;
mod router;
mod state;
mod token;
mod update;
mod view_model;

pub use controller::{RunController, RunOutcome, RunPhase};
pub use effect::{Effect, JobOptions, JobRequest};
pub use error::PanelError;
pub use log_buffer::{FlushTicket, LogAggregator, LOG_CAPACITY, LOG_FLUSH_DELAY};
pub use msg::Msg;
pub use progress::{
    ProgressReducer, ProgressUiState, LABEL_DONE, LABEL_ERROR, LABEL_FINISHING, LABEL_STARTING,
    STAGE_COUNT,
};
pub use router::{EventRouter, ProgressEvent, SubscriptionState, ERROR_MARKER};
pub use state::AppState;
pub use token::RunToken;
pub use update::{display_name, update};
pub use view_model::AppViewModel;
