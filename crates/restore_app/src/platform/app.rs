use std::io::{self, Write};

use panel_logging::{panel_error, panel_info, panel_warn};
use restore_core::{update, AppState, Msg, RunOutcome, RunPhase};
use restore_engine::{EngineEvent, EngineHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::console::{parse_command, Command, HELP};
use super::effects::{to_core_msg, EffectRunner};
use super::render::TerminalRenderer;
use super::settings::PanelSettings;
use crate::cli::Cli;

/// Everything the panel loop reacts to.
#[derive(Debug)]
pub enum Input {
    Core(Msg),
    /// Text for the user that does not go through the core.
    Notice(String),
    Quit,
    /// Stdin reached end of file.
    ConsoleClosed,
}

pub async fn run_app(cli: &Cli, settings: PanelSettings) -> anyhow::Result<()> {
    let engine = EngineHandle::new(settings.engine_settings());
    let (input_tx, input_rx) = mpsc::unbounded_channel();

    let mut initial = vec![Msg::Configure(settings.job_options())];
    if cli.input.is_some() {
        initial.push(Msg::InputSelected(cli.input.clone()));
    }
    if cli.run {
        initial.push(Msg::StartClicked);
    }

    spawn_console(input_tx.clone());
    let renderer = TerminalRenderer::new(io::stdout());
    print_banner();

    let (state, _) = drive(
        engine,
        input_tx,
        input_rx,
        renderer,
        initial,
        cli.exit_on_finish,
    )
    .await;

    match state.controller().outcome() {
        Some(RunOutcome::Failed(reason)) if cli.exit_on_finish => {
            anyhow::bail!("restoration failed: {reason}")
        }
        _ => Ok(()),
    }
}

fn print_banner() {
    println!("restore-panel ready; {HELP}");
}

/// Runs the panel loop until the user quits, or until the first run settles
/// when `exit_on_finish` is set. Returns the final state and the writer.
pub async fn drive<W: Write>(
    engine: EngineHandle,
    input_tx: mpsc::UnboundedSender<Input>,
    mut input_rx: mpsc::UnboundedReceiver<Input>,
    renderer: TerminalRenderer<W>,
    initial: Vec<Msg>,
    exit_on_finish: bool,
) -> (AppState, W) {
    let stream_connected = match engine.subscribe() {
        Ok(events) => {
            forward_events(events, input_tx.clone());
            true
        }
        Err(err) => {
            panel_error!("Progress subscription failed: {}", err);
            let _ = input_tx.send(Input::Core(Msg::SubscriptionFailed(err.to_string())));
            false
        }
    };
    for msg in initial {
        let _ = input_tx.send(Input::Core(msg));
    }

    let mut runner = EffectRunner::new(engine, input_tx, renderer, stream_connected);
    let mut state = AppState::new();
    let mut console_closed = false;

    while let Some(input) = input_rx.recv().await {
        match input {
            Input::Core(msg) => {
                let (next, effects) = update(std::mem::take(&mut state), msg);
                state = next;
                runner.enqueue(effects);
            }
            Input::Notice(text) => runner.notice(&text),
            Input::Quit => break,
            Input::ConsoleClosed => console_closed = true,
        }

        let phase = state.controller().phase();
        let settled = matches!(phase, RunPhase::Succeeded | RunPhase::Failed);
        if (exit_on_finish && settled) || (console_closed && phase != RunPhase::Running) {
            break;
        }
    }

    panel_info!("Panel loop ended in phase {:?}", state.controller().phase());
    (state, runner.into_renderer().into_inner())
}

/// Sole producer of stream messages, so a run's resolution keeps its place
/// behind the run's output.
fn forward_events(
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    input_tx: mpsc::UnboundedSender<Input>,
) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if input_tx.send(Input::Core(to_core_msg(event))).is_err() {
                break;
            }
        }
    });
}

fn spawn_console(input_tx: mpsc::UnboundedSender<Input>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let input = match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(None) => continue,
                    Ok(Some(Command::Quit)) => Input::Quit,
                    Ok(Some(Command::Help)) => Input::Notice(HELP.to_string()),
                    Ok(Some(command)) => match command.to_msg() {
                        Some(msg) => Input::Core(msg),
                        None => continue,
                    },
                    Err(text) => Input::Notice(text),
                },
                Ok(None) => Input::ConsoleClosed,
                Err(err) => {
                    panel_warn!("Reading stdin failed: {}", err);
                    Input::ConsoleClosed
                }
            };
            let done = matches!(input, Input::Quit | Input::ConsoleClosed);
            if input_tx.send(input).is_err() || done {
                break;
            }
        }
    });
}
