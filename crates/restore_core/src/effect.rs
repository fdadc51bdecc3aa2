use std::path::PathBuf;
use std::time::Duration;

use crate::{FlushTicket, ProgressUiState, RunToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the external job; its resolution comes back as `Msg::JobResolved`.
    InvokeJob(JobRequest),
    /// Arm the single debounce timer; it comes back as `Msg::LogFlushDue`.
    ScheduleLogFlush { ticket: FlushTicket, delay: Duration },
    RenderProgress(ProgressUiState),
    /// Full committed log text.
    RenderLog(String),
    /// Output preview; `None` clears it.
    SetPreview(Option<PathBuf>),
    SetStatus(String),
    SetStartEnabled(bool),
}

/// Parameters of one job invocation, correlated by `run_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub run_id: RunToken,
    pub input_path: PathBuf,
    pub output_folder: Option<PathBuf>,
    pub gpu: String,
    pub with_scratch: bool,
    pub hr: bool,
    pub python_executable: String,
}

/// User-adjustable job parameters carried from run to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOptions {
    pub output_folder: Option<PathBuf>,
    pub gpu: String,
    pub with_scratch: bool,
    pub hr: bool,
    pub python_executable: String,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            output_folder: None,
            gpu: "-1".to_string(),
            with_scratch: true,
            hr: false,
            python_executable: "python3".to_string(),
        }
    }
}

impl JobOptions {
    pub(crate) fn request(&self, run_id: RunToken, input_path: PathBuf) -> JobRequest {
        JobRequest {
            run_id,
            input_path,
            output_folder: self.output_folder.clone(),
            gpu: self.gpu.clone(),
            with_scratch: self.with_scratch,
            hr: self.hr,
            python_executable: self.python_executable.clone(),
        }
    }
}
