//! Restore engine: the external restoration job and its progress stream.
mod engine;
mod runner;
mod stage;
mod types;
mod workspace;

pub use engine::EngineHandle;
pub use runner::{ChannelProgressSink, EngineSettings, JobRunner, ProcessJobRunner, ProgressSink};
pub use stage::{stage_from_line, FINAL_STAGE};
pub use types::{
    EngineEvent, JobError, JobOutput, JobRequest, ProgressEvent, SubscribeError, PROGRESS_CHANNEL,
};
pub use workspace::{
    pick_latest_file, prepare_single_image_folder, reset_stage_dirs, resolve_output_folder,
    FINAL_OUTPUT_DIR, GUI_INPUT_DIR, STAGE_DIRS,
};
