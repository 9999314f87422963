use shortlink_storage::{ErrorKind, StorageError};
use std::error::Error as _;
use tracing::{error, warn};

/// Logs a failure with its structured context and prints a short message
/// for the user.
pub fn report(err: &anyhow::Error) {
    match err.downcast_ref::<StorageError>() {
        Some(storage_err) => log_storage_failure(storage_err),
        None => error!(error = %format!("{err:#}"), "command failed"),
    }
    eprintln!("error: {}", user_message(err));
}

fn log_storage_failure(err: &StorageError) {
    let alias = err.alias().unwrap_or_default();
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::AlreadyExists => warn!(
            operation = %err.operation(),
            kind = %err.kind(),
            backend = %err.backend(),
            alias,
            "storage rejected request"
        ),
        ErrorKind::Internal => error!(
            operation = %err.operation(),
            kind = %err.kind(),
            backend = %err.backend(),
            alias,
            error = %cause_chain(err),
            "storage failure"
        ),
    }
}

/// The one-line message shown on stderr.
pub fn user_message(err: &anyhow::Error) -> String {
    let Some(storage_err) = err.downcast_ref::<StorageError>() else {
        return format!("{err:#}");
    };

    let alias = storage_err.alias().unwrap_or_default();
    match storage_err.kind() {
        ErrorKind::NotFound => format!("alias '{alias}' not found"),
        ErrorKind::AlreadyExists => format!("alias '{alias}' already exists"),
        ErrorKind::Internal => format!("{err:#}"),
    }
}

/// Renders the error followed by each of its sources, `: `-separated.
pub fn cause_chain(err: &StorageError) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
