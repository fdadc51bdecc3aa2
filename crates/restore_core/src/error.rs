use thiserror::Error;

/// Failures the panel reports to the user.
///
/// Stale events are not errors and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("Please choose an input file first.")]
    Validation,
    #[error("Progress stream unavailable: {0}")]
    StreamSubscription(String),
    #[error("{0}")]
    ExternalJob(String),
}
