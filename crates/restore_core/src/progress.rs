/// Number of coarse stages the job reports beyond the initial one.
pub const STAGE_COUNT: i32 = 4;

pub const LABEL_STARTING: &str = "Starting...";
pub const LABEL_FINISHING: &str = "Finishing...";
pub const LABEL_DONE: &str = "Done";
pub const LABEL_ERROR: &str = "Error";

/// What the progress bar shows. `percent` is `None` when the bar makes no claim
/// (the error state).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUiState {
    pub percent: Option<u8>,
    pub label: String,
}

impl ProgressUiState {
    pub fn new(percent: Option<u8>, label: impl Into<String>) -> Self {
        Self {
            percent,
            label: label.into(),
        }
    }

    pub fn starting() -> Self {
        Self::new(Some(0), LABEL_STARTING)
    }
}

impl Default for ProgressUiState {
    fn default() -> Self {
        Self::starting()
    }
}

/// Maps raw stage signals to progress bar states.
///
/// Only changes are reported: a repeated stage yields no update. A stage lower
/// than the previous one is still accepted, the bar follows whatever the job
/// reports last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressReducer {
    last_accepted_stage: Option<i32>,
    ui_state: ProgressUiState,
}

impl ProgressReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_accepted_stage = None;
        self.ui_state = ProgressUiState::starting();
    }

    /// Returns the new state, or `None` when nothing should be rendered.
    pub fn accept(&mut self, stage: Option<i32>) -> Option<ProgressUiState> {
        let stage = stage?;
        if self.last_accepted_stage == Some(stage) {
            return None;
        }
        self.last_accepted_stage = Some(stage);
        self.ui_state = stage_ui_state(stage);
        Some(self.ui_state.clone())
    }

    /// Overrides the displayed state without touching change detection.
    pub fn force(&mut self, percent: Option<u8>, label: impl Into<String>) -> ProgressUiState {
        self.ui_state = ProgressUiState::new(percent, label);
        self.ui_state.clone()
    }

    pub fn ui_state(&self) -> &ProgressUiState {
        &self.ui_state
    }

    pub fn last_accepted_stage(&self) -> Option<i32> {
        self.last_accepted_stage
    }
}

fn stage_ui_state(stage: i32) -> ProgressUiState {
    let clamped = stage.clamp(0, STAGE_COUNT);
    let percent = (clamped * 25) as u8;
    let label = if clamped <= 0 {
        LABEL_STARTING.to_string()
    } else if clamped >= STAGE_COUNT {
        LABEL_FINISHING.to_string()
    } else {
        format!("Stage {clamped}/{STAGE_COUNT}")
    };
    ProgressUiState::new(Some(percent), label)
}
