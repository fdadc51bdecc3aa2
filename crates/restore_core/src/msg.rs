use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Result of the file picker. `None` or a blank path means the dialog was cancelled.
    InputSelected(Option<String>),
    /// Job defaults loaded from settings.
    Configure(crate::JobOptions),
    /// User toggled scratch removal.
    ScratchToggled(bool),
    /// User toggled high-resolution mode.
    HrToggled(bool),
    /// User asked for a run. Also accepted while a run is active.
    StartClicked,
    /// Event from the progress stream, for any run.
    Progress(crate::ProgressEvent),
    /// The debounce timer for a log flush fired.
    LogFlushDue(crate::FlushTicket),
    /// The job invocation for `run_id` returned.
    JobResolved {
        run_id: crate::RunToken,
        result: Result<PathBuf, String>,
    },
    /// The progress stream could not be established.
    SubscriptionFailed(String),
}
