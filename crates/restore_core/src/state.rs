use std::path::PathBuf;

use crate::view_model::AppViewModel;
use crate::{EventRouter, JobOptions, LogAggregator, ProgressReducer, RunController};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) controller: RunController,
    pub(crate) router: EventRouter,
    pub(crate) reducer: ProgressReducer,
    pub(crate) logs: LogAggregator,
    pub(crate) options: JobOptions,
    pub(crate) selection: Option<PathBuf>,
    pub(crate) preview: Option<PathBuf>,
    pub(crate) status: String,
    pub(crate) start_enabled: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            controller: RunController::default(),
            router: EventRouter::default(),
            reducer: ProgressReducer::default(),
            logs: LogAggregator::default(),
            options: JobOptions::default(),
            selection: None,
            preview: None,
            status: "Ready".to_string(),
            start_enabled: true,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.controller.phase(),
            active_run: self.controller.active_token().cloned(),
            outcome: self.controller.outcome().cloned(),
            progress: self.reducer.ui_state().clone(),
            log_lines: self.logs.committed().map(ToOwned::to_owned).collect(),
            pending_log_lines: self.logs.pending_len(),
            selection: self.selection.clone(),
            output_preview: self.preview.clone(),
            status: self.status.clone(),
            start_enabled: self.start_enabled,
            options: self.options.clone(),
            subscription: self.router.subscription(),
        }
    }

    pub fn controller(&self) -> &RunController {
        &self.controller
    }
}
