use tracing_subscriber::EnvFilter;

/// Structured logging macro for server lifecycle events
#[macro_export]
macro_rules! server_info {
    ($($arg:tt)*) => {
        tracing::info!(category = "server", $($arg)*)
    };
}

/// Structured logging macro for server lifecycle events with fields
#[macro_export]
macro_rules! server_info_with_fields {
    ($($field:ident = $value:expr),*; $($arg:tt)*) => {
        tracing::info!(category = "server", $($field = $value,)* $($arg)*)
    };
}

/// Structured logging macro for backup runs with fields
#[macro_export]
macro_rules! backup_info_with_fields {
    ($($field:ident = $value:expr),*; $($arg:tt)*) => {
        tracing::info!(category = "backup", $($field = $value,)* $($arg)*)
    };
}

/// Structured logging macro for failed backups with fields
#[macro_export]
macro_rules! backup_error_with_fields {
    ($($field:ident = $value:expr),*; $($arg:tt)*) => {
        tracing::error!(category = "backup", $($field = $value,)* $($arg)*)
    };
}

/// Structured logging macro for storage uploads with fields
#[macro_export]
macro_rules! storage_info_with_fields {
    ($($field:ident = $value:expr),*; $($arg:tt)*) => {
        tracing::info!(category = "storage", $($field = $value,)* $($arg)*)
    };
}

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Already installed when embedded or under test.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
