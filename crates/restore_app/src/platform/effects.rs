use std::io::{self, Write};

use panel_logging::{panel_debug, panel_info, panel_warn};
use restore_core::{Effect, JobRequest, Msg, ProgressEvent, RunToken};
use restore_engine::{EngineEvent, EngineHandle, JobError, JobOutput};
use tokio::sync::mpsc;

use super::app::Input;
use super::render::TerminalRenderer;

/// Carries out the effects `update` asks for.
///
/// Jobs and timers run as tasks on the runtime; whatever they produce comes
/// back to the loop as `Input::Core` messages. With a live progress stream a
/// job's result arrives on that stream, after the job's own output.
pub struct EffectRunner<W: Write> {
    engine: EngineHandle,
    input_tx: mpsc::UnboundedSender<Input>,
    renderer: TerminalRenderer<W>,
    stream_connected: bool,
}

impl<W: Write> EffectRunner<W> {
    pub fn new(
        engine: EngineHandle,
        input_tx: mpsc::UnboundedSender<Input>,
        renderer: TerminalRenderer<W>,
        stream_connected: bool,
    ) -> Self {
        Self {
            engine,
            input_tx,
            renderer,
            stream_connected,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if let Err(err) = self.apply(effect) {
                panel_warn!("Terminal write failed: {}", err);
            }
        }
    }

    pub fn notice(&mut self, text: &str) {
        if let Err(err) = self.renderer.status(text) {
            panel_warn!("Terminal write failed: {}", err);
        }
    }

    pub fn into_renderer(self) -> TerminalRenderer<W> {
        self.renderer
    }

    fn apply(&mut self, effect: Effect) -> io::Result<()> {
        match effect {
            Effect::InvokeJob(request) => {
                self.invoke(request);
                Ok(())
            }
            Effect::ScheduleLogFlush { ticket, delay } => {
                let input_tx = self.input_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = input_tx.send(Input::Core(Msg::LogFlushDue(ticket)));
                });
                Ok(())
            }
            Effect::RenderProgress(state) => self.renderer.progress(&state),
            Effect::RenderLog(text) => self.renderer.log(&text),
            Effect::SetPreview(path) => self.renderer.preview(path.as_deref()),
            Effect::SetStatus(text) => self.renderer.status(&text),
            Effect::SetStartEnabled(enabled) => {
                panel_debug!("start enabled={}", enabled);
                Ok(())
            }
        }
    }

    /// Every invocation resolves exactly once, a panicking job included.
    fn invoke(&self, request: JobRequest) {
        let wire = to_engine_request(request);
        panel_info!("InvokeJob run_id={} input={}", wire.run_id, wire.input_path);
        if self.stream_connected {
            self.engine.spawn_job(wire);
            return;
        }

        let engine = self.engine.clone();
        let input_tx = self.input_tx.clone();
        tokio::spawn(async move {
            let run_id = wire.run_id.clone();
            let result = engine.invoke_guarded(wire).await;
            let _ = input_tx.send(Input::Core(resolution(run_id, result)));
        });
    }
}

fn resolution(run_id: String, result: Result<JobOutput, JobError>) -> Msg {
    Msg::JobResolved {
        run_id: RunToken::from_wire(run_id),
        result: result
            .map(|output| output.output_path)
            .map_err(|err| err.to_string()),
    }
}

/// Stream records become core messages; a completion becomes the run's resolution.
pub fn to_core_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(record) => Msg::Progress(to_core_event(record)),
        EngineEvent::JobCompleted { run_id, result } => resolution(run_id, result),
    }
}

pub fn to_engine_request(request: JobRequest) -> restore_engine::JobRequest {
    restore_engine::JobRequest {
        run_id: request.run_id.as_str().to_string(),
        input_path: request.input_path.to_string_lossy().into_owned(),
        output_folder: request
            .output_folder
            .map(|folder| folder.to_string_lossy().into_owned()),
        gpu: request.gpu,
        with_scratch: request.with_scratch,
        hr: request.hr,
        python_executable: request.python_executable,
    }
}

pub fn to_core_event(event: restore_engine::ProgressEvent) -> ProgressEvent {
    ProgressEvent {
        run_id: RunToken::from_wire(event.run_id),
        stage: event.stage.map(i32::from),
        message: event.message,
        is_error: event.is_error,
    }
}
