use std::path::PathBuf;
use std::sync::Once;

use pretty_assertions::assert_eq;
use restore_core::{
    update, AppState, Effect, FlushTicket, JobRequest, Msg, ProgressEvent, ProgressUiState,
    RunOutcome, RunPhase, RunToken, LOG_CAPACITY, LOG_FLUSH_DELAY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn select(state: AppState, path: &str) -> AppState {
    update(state, Msg::InputSelected(Some(path.to_string()))).0
}

fn start(state: AppState) -> (AppState, RunToken, Vec<Effect>) {
    let (state, effects) = update(state, Msg::StartClicked);
    let token = job_request(&effects).run_id.clone();
    (state, token, effects)
}

fn job_request(effects: &[Effect]) -> &JobRequest {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::InvokeJob(request) => Some(request),
            _ => None,
        })
        .expect("invoke effect")
}

fn event(run_id: &RunToken, stage: Option<i32>, message: &str) -> Msg {
    Msg::Progress(ProgressEvent {
        run_id: run_id.clone(),
        stage,
        message: message.to_string(),
        is_error: false,
    })
}

fn progress_renders(effects: &[Effect]) -> Vec<ProgressUiState> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::RenderProgress(progress) => Some(progress.clone()),
            _ => None,
        })
        .collect()
}

fn flush_ticket(effects: &[Effect]) -> Option<FlushTicket> {
    effects.iter().find_map(|effect| match effect {
        Effect::ScheduleLogFlush { ticket, delay } => {
            assert_eq!(*delay, LOG_FLUSH_DELAY);
            Some(*ticket)
        }
        _ => None,
    })
}

#[test]
fn start_without_selection_is_rejected_without_state_change() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = update(state, Msg::StartClicked);
    let view = next.view();

    assert_eq!(view.phase, RunPhase::Idle);
    assert!(view.active_run.is_none());
    assert!(view.start_enabled);
    assert_eq!(
        effects,
        vec![Effect::SetStatus(
            "Please choose an input file first.".to_string()
        )]
    );
}

#[test]
fn start_resets_ui_and_invokes_job_with_token() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (state, token, effects) = start(state);

    assert_eq!(
        effects,
        vec![
            Effect::SetStartEnabled(false),
            Effect::SetPreview(None),
            Effect::RenderLog(String::new()),
            Effect::RenderProgress(ProgressUiState::new(Some(0), "Starting...")),
            Effect::SetStatus("Running...".to_string()),
            Effect::InvokeJob(JobRequest {
                run_id: token.clone(),
                input_path: PathBuf::from("/photos/photo.jpg"),
                output_folder: None,
                gpu: "-1".to_string(),
                with_scratch: true,
                hr: false,
                python_executable: "python3".to_string(),
            }),
        ]
    );
    let view = state.view();
    assert_eq!(view.phase, RunPhase::Running);
    assert_eq!(view.active_run, Some(token));
    assert!(!view.start_enabled);
}

#[test]
fn full_run_renders_distinct_stages_and_ends_done() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (mut state, token, _) = start(state);

    let mut renders = Vec::new();
    for stage in [0, 2, 2, 4] {
        let (next, effects) = update(state, event(&token, Some(stage), ""));
        renders.extend(progress_renders(&effects));
        state = next;
    }
    assert_eq!(
        renders,
        vec![
            ProgressUiState::new(Some(0), "Starting..."),
            ProgressUiState::new(Some(50), "Stage 2/4"),
            ProgressUiState::new(Some(100), "Finishing..."),
        ]
    );

    let (state, effects) = update(
        state,
        Msg::JobResolved {
            run_id: token,
            result: Ok(PathBuf::from("/out/photo_mod.jpg")),
        },
    );
    let view = state.view();
    assert_eq!(view.progress, ProgressUiState::new(Some(100), "Done"));
    assert_eq!(view.phase, RunPhase::Succeeded);
    assert_eq!(view.output_preview, Some(PathBuf::from("/out/photo_mod.jpg")));
    assert_eq!(
        restore_core::display_name(view.output_preview.as_deref().unwrap()),
        "photo_mod.jpg"
    );
    assert!(view.start_enabled);
    assert!(effects.contains(&Effect::SetPreview(Some(PathBuf::from("/out/photo_mod.jpg")))));
    assert!(effects.contains(&Effect::SetStartEnabled(true)));
}

#[test]
fn superseded_run_events_are_ignored() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (state, first, _) = start(state);
    let (state, second, _) = start(state);
    assert_ne!(first, second);

    let before = state.view();
    let (state, effects) = update(state, event(&first, Some(3), "late line"));
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);

    let (state, effects) = update(state, event(&second, Some(1), ""));
    assert_eq!(
        progress_renders(&effects),
        vec![ProgressUiState::new(Some(25), "Stage 1/4")]
    );
    assert_eq!(state.view().progress.percent, Some(25));
}

#[test]
fn superseded_run_resolution_does_not_touch_new_run() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (state, first, _) = start(state);
    let (state, second, _) = start(state);

    let before = state.view();
    let (state, effects) = update(
        state,
        Msg::JobResolved {
            run_id: first.clone(),
            result: Ok(PathBuf::from("/out/old.jpg")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);

    let (state, _) = update(
        state,
        Msg::JobResolved {
            run_id: first,
            result: Err("boom".to_string()),
        },
    );
    let view = state.view();
    assert_eq!(view.phase, RunPhase::Running);
    assert_eq!(view.active_run, Some(second));
    assert!(!view.start_enabled);
}

#[test]
fn events_with_no_active_run_are_ignored() {
    init_logging();
    let state = AppState::new();
    let before = state.view();

    let (state, effects) = update(
        state,
        event(&RunToken::from_wire("unknown"), Some(2), "stray"),
    );

    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
}

#[test]
fn failure_forces_error_state_and_flushes_logs() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (state, token, _) = start(state);
    let (state, _) = update(state, event(&token, Some(1), "Running Stage 1"));
    let (state, _) = update(
        state,
        Msg::Progress(ProgressEvent {
            run_id: token.clone(),
            stage: Some(1),
            message: "Traceback".to_string(),
            is_error: true,
        }),
    );
    assert_eq!(state.view().pending_log_lines, 2);

    let (state, effects) = update(
        state,
        Msg::JobResolved {
            run_id: token,
            result: Err("Python exited with status: exit status: 1".to_string()),
        },
    );

    let view = state.view();
    assert_eq!(view.phase, RunPhase::Failed);
    assert_eq!(view.progress, ProgressUiState::new(None, "Error"));
    assert_eq!(
        view.outcome,
        Some(RunOutcome::Failed(
            "Python exited with status: exit status: 1".to_string()
        ))
    );
    assert_eq!(
        view.status,
        "Error: Python exited with status: exit status: 1"
    );
    assert_eq!(view.log_lines, vec!["Running Stage 1", "[ERR] Traceback"]);
    assert_eq!(view.pending_log_lines, 0);
    assert!(view.output_preview.is_none());
    assert!(view.start_enabled);
    assert!(effects.contains(&Effect::RenderLog(
        "Running Stage 1\n[ERR] Traceback".to_string()
    )));
}

#[test]
fn settled_run_ignores_further_events_and_resolutions() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (state, token, _) = start(state);
    assert_eq!(panel_logging::run_context(), token.as_str());
    let (state, _) = update(
        state,
        Msg::JobResolved {
            run_id: token.clone(),
            result: Ok(PathBuf::from("/out/photo_mod.jpg")),
        },
    );
    let settled = state.view();
    assert_eq!(panel_logging::run_context(), "-");

    let (state, effects) = update(state, event(&token, Some(2), "straggler"));
    assert!(effects.is_empty());
    let (state, effects) = update(
        state,
        Msg::JobResolved {
            run_id: token,
            result: Err("late failure".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view(), settled);
}

#[test]
fn burst_of_log_lines_is_batched_and_bounded() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (mut state, token, _) = start(state);

    let mut tickets = Vec::new();
    for i in 0..500 {
        let (next, effects) = update(state, event(&token, None, &format!("line {i}")));
        tickets.extend(flush_ticket(&effects));
        state = next;
    }
    assert_eq!(tickets.len(), 1);

    let (state, effects) = update(state, Msg::LogFlushDue(tickets[0]));
    assert_eq!(effects.len(), 1);
    let view = state.view();
    assert_eq!(view.log_lines.len(), LOG_CAPACITY);
    assert_eq!(view.log_lines.first().map(String::as_str), Some("line 100"));
    assert_eq!(view.log_lines.last().map(String::as_str), Some("line 499"));
}

#[test]
fn flush_timer_from_previous_run_is_inert() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (state, first, _) = start(state);
    let (state, effects) = update(state, event(&first, None, "old"));
    let stale_ticket = flush_ticket(&effects).expect("flush scheduled");

    let (state, second, _) = start(state);
    let (state, effects) = update(state, event(&second, None, "new"));
    let fresh_ticket = flush_ticket(&effects).expect("fresh flush scheduled");

    let (state, effects) = update(state, Msg::LogFlushDue(stale_ticket));
    assert!(effects.is_empty());
    assert_eq!(state.view().pending_log_lines, 1);

    let (state, effects) = update(state, Msg::LogFlushDue(fresh_ticket));
    assert_eq!(effects, vec![Effect::RenderLog("new".to_string())]);
    assert_eq!(state.view().log_lines, vec!["new"]);
}

#[test]
fn restart_after_success_clears_previous_output() {
    init_logging();
    let state = select(AppState::new(), "/photos/photo.jpg");
    let (state, token, _) = start(state);
    let (state, _) = update(state, event(&token, None, "done soon"));
    let (state, _) = update(
        state,
        Msg::JobResolved {
            run_id: token,
            result: Ok(PathBuf::from("/out/photo_mod.jpg")),
        },
    );

    let (state, _, effects) = start(state);
    let view = state.view();
    assert!(effects.contains(&Effect::SetPreview(None)));
    assert!(view.output_preview.is_none());
    assert!(view.log_lines.is_empty());
    assert!(view.outcome.is_none());
    assert_eq!(view.progress, ProgressUiState::new(Some(0), "Starting..."));
}

#[test]
fn subscription_failure_is_reported_once() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::SubscriptionFailed("already subscribed".to_string()),
    );
    assert_eq!(
        effects,
        vec![Effect::SetStatus(
            "Progress stream unavailable: already subscribed".to_string()
        )]
    );

    let (state, effects) = update(state, Msg::SubscriptionFailed("again".to_string()));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().status,
        "Progress stream unavailable: already subscribed"
    );
}
