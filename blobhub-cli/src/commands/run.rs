//! Run command - start the hub and the render loop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use blobhub::app::{AppConfig, HubApp};
use blobhub::config::{config_file_path, ConfigFile};
use blobhub::log::init_logging;
use tracing::info;

use crate::error::CliError;
use crate::tui_app::{run_headless, run_tui};
use crate::ui::dashboard::print_session_summary;

/// Arguments for the run command.
#[derive(Debug)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub sources: Option<usize>,
    pub headless: bool,
    pub duration: Option<u64>,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let config_path = args.config.unwrap_or_else(config_file_path);
    let file = ConfigFile::load(&config_path)?;

    let headless = args.headless || !atty::is(atty::Stream::Stdout);
    let _log_guard = init_logging(&file.logging, headless)?;
    info!(
        version = blobhub::VERSION,
        config = %config_path.display(),
        headless,
        "BlobHub starting"
    );

    let mut config = AppConfig::from_config_file(&file);
    if let Some(sources) = args.sources {
        config = config.with_simulated_sources(sources);
    }

    let mut app = HubApp::start(config)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let limit = args.duration.map(Duration::from_secs);
    let result = if headless {
        run_headless(&app, shutdown, limit)
    } else {
        run_tui(&app, shutdown, limit)
    };

    app.shutdown();
    print_session_summary(&app.status());
    result
}
