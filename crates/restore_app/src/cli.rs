use std::path::PathBuf;

use clap::Parser;

use crate::platform::logging::LogDestination;
use crate::platform::settings::{PanelSettings, SETTINGS_FILENAME};

#[derive(Debug, Parser)]
#[command(
    name = "restore-panel",
    version,
    about = "Pick a photo, run the restoration job, watch it progress"
)]
pub struct Cli {
    /// Image (or folder of images) to restore.
    pub input: Option<String>,

    /// Start a run right away instead of waiting for the `run` command.
    #[arg(long)]
    pub run: bool,

    /// Exit after the first run reaches a terminal state.
    #[arg(long)]
    pub exit_on_finish: bool,

    /// Output folder; relative paths resolve against the project root.
    #[arg(long)]
    pub output_folder: Option<PathBuf>,

    /// GPU id passed to the job, `-1` for CPU.
    #[arg(long)]
    pub gpu: Option<String>,

    /// Interpreter used to run `run.py`.
    #[arg(long)]
    pub python: Option<String>,

    /// Folder containing `run.py`.
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    #[arg(long, overrides_with = "no_scratch")]
    pub with_scratch: bool,

    #[arg(long, overrides_with = "with_scratch")]
    pub no_scratch: bool,

    /// High-resolution mode.
    #[arg(long)]
    pub hr: bool,

    #[arg(long, default_value = SETTINGS_FILENAME)]
    pub settings: PathBuf,

    /// Persist the effective settings (file plus flags) before starting.
    #[arg(long)]
    pub save_settings: bool,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Flags win over the settings file.
    pub fn apply(&self, settings: &mut PanelSettings) {
        if let Some(folder) = &self.output_folder {
            settings.output_folder = Some(folder.clone());
        }
        if let Some(gpu) = &self.gpu {
            settings.gpu = gpu.clone();
        }
        if let Some(python) = &self.python {
            settings.python = python.clone();
        }
        if let Some(root) = &self.project_root {
            settings.project_root = Some(root.clone());
        }
        if self.with_scratch {
            settings.with_scratch = true;
        }
        if self.no_scratch {
            settings.with_scratch = false;
        }
        if self.hr {
            settings.hr = true;
        }
    }
}
