//! Logging utilities for charney.
//!
//! This module provides structured logging helpers so that a run leaves a
//! searchable trace of what was loaded, how it was transformed and where the
//! figure went.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::grid::FieldStats;

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    // A second initialization (tests, embedding) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration = start_time.elapsed();
    let duration_ms = duration.as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation failed"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let operation_id = generate_operation_id();

    debug!(
        operation = operation,
        operation_id = %operation_id,
        "Starting operation"
    );

    let result = f();

    info!(
        operation = operation,
        operation_id = %operation_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log summary statistics of a field
pub fn log_field_stats(label: &str, shape: (usize, usize), stats: &FieldStats) {
    match (stats.min, stats.max, stats.mean) {
        (Some(min), Some(max), Some(mean)) => info!(
            field = label,
            rows = shape.0,
            cols = shape.1,
            min = min,
            max = max,
            mean = mean,
            missing = stats.missing,
            total = stats.total,
            "Field statistics"
        ),
        _ => warn!(
            field = label,
            rows = shape.0,
            cols = shape.1,
            total = stats.total,
            "Field has no present values"
        ),
    }
}

/// Log an error with context
pub fn log_error(error: &crate::error::CharneyError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Generate a unique operation ID
pub fn generate_operation_id() -> String {
    Uuid::new_v4().to_string()
}
