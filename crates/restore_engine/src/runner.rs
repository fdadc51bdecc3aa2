use std::path::{Path, PathBuf};
use std::process::Stdio;

use panel_logging::{panel_debug, panel_info, panel_warn};
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::Command;

use crate::stage::{stage_from_line, FINAL_STAGE};
use crate::workspace::{
    pick_latest_file, prepare_single_image_folder, reset_stage_dirs, resolve_output_folder,
    FINAL_OUTPUT_DIR,
};
use crate::{EngineEvent, JobError, JobOutput, JobRequest, ProgressEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Folder holding the restoration script; relative output folders resolve against it.
    pub project_root: PathBuf,
    pub script: String,
    pub default_output_dir: String,
}

impl EngineSettings {
    pub fn with_root(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            script: "run.py".to_string(),
            default_output_dir: "output_gui".to_string(),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

pub struct ChannelProgressSink {
    tx: tokio::sync::mpsc::UnboundedSender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: tokio::sync::mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ProgressEvent) {
        let _ = self.tx.send(EngineEvent::Progress(event));
    }
}

#[async_trait::async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(
        &self,
        request: JobRequest,
        sink: &dyn ProgressSink,
    ) -> Result<JobOutput, JobError>;
}

/// Runs the restoration script as a child interpreter process.
#[derive(Debug, Clone)]
pub struct ProcessJobRunner {
    settings: EngineSettings,
}

impl ProcessJobRunner {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    fn build_command(
        &self,
        request: &JobRequest,
        input_folder: &Path,
        output_folder: &Path,
    ) -> Command {
        let root = &self.settings.project_root;
        let mut cmd = Command::new(&request.python_executable);
        cmd.current_dir(root);
        cmd.env("PYTHONUNBUFFERED", "1");
        cmd.arg("-u");
        cmd.arg(root.join(&self.settings.script));
        cmd.arg("--input_folder").arg(input_folder);
        cmd.arg("--output_folder").arg(output_folder);
        cmd.arg("--GPU").arg(&request.gpu);
        if request.with_scratch {
            cmd.arg("--with_scratch");
        }
        if request.hr {
            cmd.arg("--HR");
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }
}

#[async_trait::async_trait]
impl JobRunner for ProcessJobRunner {
    async fn run(
        &self,
        request: JobRequest,
        sink: &dyn ProgressSink,
    ) -> Result<JobOutput, JobError> {
        let run_id = request.run_id.as_str();
        sink.emit(ProgressEvent::info(run_id, Some(0), "Starting..."));

        let root = &self.settings.project_root;
        let output_folder = resolve_output_folder(
            root,
            request.output_folder.as_deref(),
            &self.settings.default_output_dir,
        )?;

        let input_path = PathBuf::from(&request.input_path);
        if !input_path.exists() {
            return Err(JobError::InputNotFound(input_path));
        }
        let input_folder = if input_path.is_dir() {
            input_path
        } else {
            prepare_single_image_folder(&input_path, &output_folder)?
        };

        reset_stage_dirs(&output_folder)?;
        let final_dir = output_folder.join(FINAL_OUTPUT_DIR);

        let script = root.join(&self.settings.script);
        if !script.exists() {
            return Err(JobError::ScriptNotFound(script));
        }

        let mut child = self
            .build_command(&request, &input_folder, &output_folder)
            .spawn()
            .map_err(JobError::Spawn)?;
        panel_info!(
            "spawned {} for run {} (input {:?})",
            request.python_executable,
            run_id,
            input_folder
        );
        let stdout = child.stdout.take().ok_or(JobError::Capture("stdout"))?;
        let stderr = child.stderr.take().ok_or(JobError::Capture("stderr"))?;

        let mut out_lines = Some(BufReader::new(stdout).lines());
        let mut err_lines = Some(BufReader::new(stderr).lines());
        let mut stage = Some(0);
        while out_lines.is_some() || err_lines.is_some() {
            let next = tokio::select! {
                line = next_line(&mut out_lines), if out_lines.is_some() => {
                    line.map(|text| (false, text))
                }
                line = next_line(&mut err_lines), if err_lines.is_some() => {
                    line.map(|text| (true, text))
                }
            };
            if let Some((is_error, line)) = next {
                if let Some(announced) = stage_from_line(&line) {
                    stage = Some(announced);
                }
                sink.emit(ProgressEvent {
                    run_id: run_id.to_string(),
                    stage,
                    message: line,
                    is_error,
                });
            }
        }

        let status = child.wait().await.map_err(JobError::Process)?;
        if !status.success() {
            let err = JobError::ExitStatus(status.to_string());
            sink.emit(ProgressEvent::error(run_id, stage, err.to_string()));
            return Err(err);
        }

        let latest = pick_latest_file(&final_dir)?.ok_or(JobError::NoOutput(final_dir))?;
        panel_debug!("run {} produced {:?}", run_id, latest);
        sink.emit(ProgressEvent::info(run_id, Some(FINAL_STAGE), "Done"));

        Ok(JobOutput {
            output_path: latest,
        })
    }
}

/// Reads the next line, closing the stream slot on EOF or a read error.
async fn next_line<R>(slot: &mut Option<Lines<BufReader<R>>>) -> Option<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let lines = slot.as_mut()?;
    match lines.next_line().await {
        Ok(Some(line)) => Some(line),
        Ok(None) => {
            *slot = None;
            None
        }
        Err(err) => {
            panel_warn!("stopped reading job output: {}", err);
            *slot = None;
            None
        }
    }
}
