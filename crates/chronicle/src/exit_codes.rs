//! Exit codes for the CLI

use chronicle_core::error::PipelineError;
use chronicle_core::ChronicleError;

/// Success
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// Validation error
pub const VALIDATION_ERROR: i32 = 5;

/// Changelog could not be written
pub const WRITE_ERROR: i32 = 6;

/// User cancelled
pub const CANCELLED: i32 = 130;

/// Exit code for an error returned by a command
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(dialoguer::Error::IO(e)) = err.downcast_ref::<dialoguer::Error>() {
        if e.kind() == std::io::ErrorKind::Interrupted {
            return CANCELLED;
        }
    }

    match err.downcast_ref::<ChronicleError>() {
        Some(e) => for_chronicle_error(e),
        None => ERROR,
    }
}

fn for_chronicle_error(err: &ChronicleError) -> i32 {
    if err.is_config() {
        return CONFIG_ERROR;
    }

    match err {
        ChronicleError::Git(_) => GIT_ERROR,
        ChronicleError::Version(_) => VERSION_ERROR,
        ChronicleError::Changelog(_) => WRITE_ERROR,
        ChronicleError::Pipeline(PipelineError::StageFailed { source, .. }) => {
            for_chronicle_error(source)
        }
        _ => ERROR,
    }
}
