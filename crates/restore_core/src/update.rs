use std::path::{Path, PathBuf};

use panel_logging::panel_info;

use crate::controller::{flush_logs, resolve_run, start_run};
use crate::router::{route_event, subscription_failed};
use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputSelected(selected) => {
            // A cancelled dialog keeps whatever was selected before.
            let Some(path) = selected.map(|raw| raw.trim().to_owned()).filter(|p| !p.is_empty())
            else {
                return (state, Vec::new());
            };
            let path = PathBuf::from(path);
            state.status = format!("Selected: {}", display_name(&path));
            panel_info!("input selected: {:?}", path);
            state.selection = Some(path);
            vec![Effect::SetStatus(state.status.clone())]
        }
        Msg::Configure(options) => {
            state.options = options;
            Vec::new()
        }
        Msg::ScratchToggled(on) => {
            state.options.with_scratch = on;
            Vec::new()
        }
        Msg::HrToggled(on) => {
            state.options.hr = on;
            Vec::new()
        }
        Msg::StartClicked => match start_run(&mut state) {
            Ok(effects) => effects,
            Err(err) => {
                state.status = err.to_string();
                vec![Effect::SetStatus(state.status.clone())]
            }
        },
        Msg::Progress(event) => route_event(&mut state, event),
        Msg::LogFlushDue(ticket) => flush_logs(&mut state, ticket),
        Msg::JobResolved { run_id, result } => resolve_run(&mut state, run_id, result),
        Msg::SubscriptionFailed(reason) => subscription_failed(&mut state, reason),
    };

    (state, effects)
}

/// File name for status and preview lines, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
