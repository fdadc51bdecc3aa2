use std::sync::{Arc, Mutex};

use panel_logging::{panel_info, panel_warn};
use tokio::sync::mpsc;

use crate::runner::{ChannelProgressSink, EngineSettings, JobRunner, ProcessJobRunner};
use crate::{EngineEvent, JobError, JobOutput, JobRequest, SubscribeError};

/// Front door to the restoration job.
///
/// Every job publishes its progress on one shared channel. The channel has a
/// single long-lived subscriber; runs do not get their own streams.
#[derive(Clone)]
pub struct EngineHandle {
    runner: Arc<dyn JobRunner>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    event_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<EngineEvent>>>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_runner(Arc::new(ProcessJobRunner::new(settings)))
    }

    pub fn with_runner(runner: Arc<dyn JobRunner>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            runner,
            event_tx,
            event_rx: Arc::new(Mutex::new(Some(event_rx))),
        }
    }

    /// Hands out the progress stream. Succeeds once per handle.
    pub fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<EngineEvent>, SubscribeError> {
        let mut slot = self
            .event_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.take().ok_or(SubscribeError::AlreadySubscribed)
    }

    /// Runs one job to completion. Progress goes to the shared stream.
    pub async fn invoke(&self, request: JobRequest) -> Result<JobOutput, JobError> {
        panel_info!("invoke run_id={} input={}", request.run_id, request.input_path);
        let sink = ChannelProgressSink::new(self.event_tx.clone());
        self.runner.run(request, &sink).await
    }

    /// Like `invoke`, but a job that panics resolves as `JobError::Task`.
    pub async fn invoke_guarded(&self, request: JobRequest) -> Result<JobOutput, JobError> {
        let engine = self.clone();
        match tokio::spawn(async move { engine.invoke(request).await }).await {
            Ok(result) => result,
            Err(join_err) => Err(JobError::Task(join_err.to_string())),
        }
    }

    /// Runs a job in the background and publishes its result on the stream as
    /// `JobCompleted`, behind every progress record the job emitted.
    pub fn spawn_job(&self, request: JobRequest) {
        let engine = self.clone();
        tokio::spawn(async move {
            let run_id = request.run_id.clone();
            let result = engine.invoke_guarded(request).await;
            if let Err(err) = &result {
                panel_warn!("run {} failed: {}", run_id, err);
            }
            let _ = engine
                .event_tx
                .send(EngineEvent::JobCompleted { run_id, result });
        });
    }
}
