use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the event channel progress records are published on.
pub const PROGRESS_CHANNEL: &str = "modify_progress";

fn default_gpu() -> String {
    "-1".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

/// Job invocation as it crosses the front-end boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub run_id: String,
    pub input_path: String,
    #[serde(default)]
    pub output_folder: Option<String>,
    #[serde(default = "default_gpu")]
    pub gpu: String,
    #[serde(default)]
    pub with_scratch: bool,
    #[serde(default)]
    pub hr: bool,
    #[serde(default = "default_python", alias = "python")]
    pub python_executable: String,
}

impl JobRequest {
    pub fn new(run_id: impl Into<String>, input_path: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            input_path: input_path.into(),
            output_folder: None,
            gpu: default_gpu(),
            with_scratch: false,
            hr: false,
            python_executable: default_python(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOutput {
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub run_id: String,
    pub stage: Option<u8>,
    pub message: String,
    pub is_error: bool,
}

impl ProgressEvent {
    pub fn info(run_id: &str, stage: Option<u8>, message: impl Into<String>) -> Self {
        Self {
            run_id: run_id.to_string(),
            stage,
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(run_id: &str, stage: Option<u8>, message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::info(run_id, stage, message)
        }
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("run.py not found: {}", .0.display())]
    ScriptNotFound(PathBuf),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid input file path: {}", .0.display())]
    InvalidInput(PathBuf),
    #[error("Failed to start python: {0}")]
    Spawn(#[source] io::Error),
    #[error("Failed to capture python {0}")]
    Capture(&'static str),
    #[error("Process error: {0}")]
    Process(#[source] io::Error),
    #[error("Python exited with status: {0}")]
    ExitStatus(String),
    #[error("No output image found under {}", .0.display())]
    NoOutput(PathBuf),
    #[error("Task failed: {0}")]
    Task(String),
}

/// Record on the progress channel. A job's `JobCompleted` always follows
/// every `Progress` record it emitted.
#[derive(Debug)]
pub enum EngineEvent {
    Progress(ProgressEvent),
    JobCompleted {
        run_id: String,
        result: Result<JobOutput, JobError>,
    },
}

impl JobError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    #[error("channel {channel} already has a subscriber", channel = PROGRESS_CHANNEL)]
    AlreadySubscribed,
}
