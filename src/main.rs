//! charney - centered diverging contour maps of climate-model differences
//!
//! This is the main entry point for the charney application.

use std::process::ExitCode;
use tracing::{debug, info};

use charney::pipeline;
use charney::{init_tracing, log_error, Config};

fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            log_error(&e, "Configuration error");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log_level);
    info!("Starting charney v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    if let Err(e) = config.validate() {
        log_error(&e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    if let Ok(json) = serde_json::to_string(&config) {
        debug!(config = %json, "Resolved configuration");
    }

    match pipeline::run(&config) {
        Ok(summary) => {
            info!(
                output = %summary.output.display(),
                midpoint = summary.midpoint,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error(&e, "Failed to produce figure");
            ExitCode::FAILURE
        }
    }
}
