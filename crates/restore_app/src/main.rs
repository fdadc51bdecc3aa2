mod cli;
mod platform;

use std::time::Duration;

use clap::Parser;
use panel_logging::panel_info;

use crate::cli::Cli;
use crate::platform::{app, logging, settings};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    let mut panel_settings = settings::load_settings(&cli.settings);
    cli.apply(&mut panel_settings);
    if cli.save_settings {
        settings::save_settings(&cli.settings, &panel_settings)?;
    }
    panel_info!("Starting restore-panel with {:?}", panel_settings);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(app::run_app(&cli, panel_settings));
    // A stdin read may still be parked on a blocking thread.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}
