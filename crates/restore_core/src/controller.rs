use std::path::PathBuf;

use panel_logging::{panel_info, panel_warn};

use crate::progress::{LABEL_DONE, LABEL_ERROR};
use crate::{AppState, Effect, PanelError, RunToken, LOG_FLUSH_DELAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded(PathBuf),
    Failed(String),
}

/// Owner of the active run identity. Other components only compare against it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunController {
    active: Option<RunToken>,
    phase: RunPhase,
    outcome: Option<RunOutcome>,
}

impl RunController {
    pub fn active_token(&self) -> Option<&RunToken> {
        self.active.as_ref()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// True only for the active run while it has no outcome yet.
    pub fn accepts(&self, run_id: &RunToken) -> bool {
        self.is_running() && self.active.as_ref() == Some(run_id)
    }

    fn activate(&mut self) -> RunToken {
        let token = RunToken::create();
        if let Some(previous) = self.active.replace(token.clone()) {
            if self.phase == RunPhase::Running {
                panel_info!("run {} superseded by {}", previous, token);
            }
        }
        self.phase = RunPhase::Running;
        self.outcome = None;
        token
    }

    fn settle(&mut self, outcome: RunOutcome) {
        self.phase = match outcome {
            RunOutcome::Succeeded(_) => RunPhase::Succeeded,
            RunOutcome::Failed(_) => RunPhase::Failed,
        };
        self.outcome = Some(outcome);
    }
}

/// Starts a new run, superseding any active one.
pub(crate) fn start_run(state: &mut AppState) -> Result<Vec<Effect>, PanelError> {
    let input_path = state.selection.clone().ok_or(PanelError::Validation)?;

    let run_id = state.controller.activate();
    panel_logging::set_run_context(Some(run_id.as_str()));
    state.reducer.reset();
    state.logs.reset();
    let progress = state.reducer.force(Some(0), crate::progress::LABEL_STARTING);
    state.preview = None;
    state.start_enabled = false;
    state.status = "Running...".to_string();
    panel_info!("starting job for {:?}", input_path);

    Ok(vec![
        Effect::SetStartEnabled(false),
        Effect::SetPreview(None),
        Effect::RenderLog(String::new()),
        Effect::RenderProgress(progress),
        Effect::SetStatus(state.status.clone()),
        Effect::InvokeJob(state.options.request(run_id, input_path)),
    ])
}

/// Applies a job resolution if it belongs to the active, unsettled run.
pub(crate) fn resolve_run(
    state: &mut AppState,
    run_id: RunToken,
    result: Result<PathBuf, String>,
) -> Vec<Effect> {
    if !state.controller.accepts(&run_id) {
        return Vec::new();
    }

    let (progress, status, preview) = match result {
        Ok(output_path) => {
            panel_info!("job finished: {:?}", output_path);
            let progress = state.reducer.force(Some(100), LABEL_DONE);
            state.controller.settle(RunOutcome::Succeeded(output_path.clone()));
            (progress, LABEL_DONE.to_string(), Some(output_path))
        }
        Err(message) => {
            let err = PanelError::ExternalJob(message);
            panel_warn!("job failed: {}", err);
            let progress = state.reducer.force(None, LABEL_ERROR);
            let status = format!("{LABEL_ERROR}: {err}");
            state.controller.settle(RunOutcome::Failed(err.to_string()));
            (progress, status, None)
        }
    };

    let log_text = state.logs.force_flush();
    state.status = status;
    state.start_enabled = true;
    panel_logging::set_run_context(None);

    let mut effects = vec![
        Effect::RenderProgress(progress),
        Effect::RenderLog(log_text),
    ];
    if let Some(path) = preview {
        state.preview = Some(path.clone());
        effects.push(Effect::SetPreview(Some(path)));
    }
    effects.push(Effect::SetStatus(state.status.clone()));
    effects.push(Effect::SetStartEnabled(true));
    effects
}

/// Debounce timer entry point. Stale tickets are ignored.
pub(crate) fn flush_logs(state: &mut AppState, ticket: crate::FlushTicket) -> Vec<Effect> {
    match state.logs.flush_due(ticket) {
        Some(text) => vec![Effect::RenderLog(text)],
        None => Vec::new(),
    }
}

pub(crate) fn schedule_flush(ticket: crate::FlushTicket) -> Effect {
    Effect::ScheduleLogFlush {
        ticket,
        delay: LOG_FLUSH_DELAY,
    }
}
