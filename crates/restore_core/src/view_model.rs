use std::path::PathBuf;

use crate::{JobOptions, ProgressUiState, RunOutcome, RunPhase, RunToken, SubscriptionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub phase: RunPhase,
    pub active_run: Option<RunToken>,
    pub outcome: Option<RunOutcome>,
    pub progress: ProgressUiState,
    pub log_lines: Vec<String>,
    pub pending_log_lines: usize,
    pub selection: Option<PathBuf>,
    pub output_preview: Option<PathBuf>,
    pub status: String,
    pub start_enabled: bool,
    pub options: JobOptions,
    pub subscription: SubscriptionState,
}
